//! Application state for the case intake server

use std::sync::Arc;

use crate::config::IntakeConfig;
use crate::error::{Error, Result};
use crate::pipeline::CasePipeline;
use crate::providers::Services;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    /// Configuration
    config: IntakeConfig,
    /// Pipeline over the shared clients, when they could be built
    backend: Backend,
}

/// Outcome of building the service clients at startup
enum Backend {
    Ready { pipeline: CasePipeline, services: Services },
    MissingSettings(Vec<String>),
    Failed(String),
}

impl AppState {
    /// Create state from configuration, building the Azure clients once
    pub fn new(config: IntakeConfig) -> Self {
        tracing::info!("Initializing case intake state...");

        let services = match &config.azure {
            Ok(settings) => Services::azure(settings, &config).map_err(|e| {
                tracing::error!("Failed to initialize Azure clients: {}", e);
                Backend::Failed(e.to_string())
            }),
            Err(missing) => {
                tracing::warn!("{}", missing);
                Err(Backend::MissingSettings(missing.0.clone()))
            }
        };

        match services {
            Ok(services) => Self::with_services(config, services),
            Err(backend) => Self::from_backend(config, backend),
        }
    }

    /// Create state over already constructed services
    pub fn with_services(config: IntakeConfig, services: Services) -> Self {
        let backend = Backend::ready(services, &config);
        Self::from_backend(config, backend)
    }

    fn from_backend(config: IntakeConfig, backend: Backend) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, backend }),
        }
    }

    /// Get configuration
    pub fn config(&self) -> &IntakeConfig {
        &self.inner.config
    }

    /// Get the case pipeline, or the reason requests cannot be served
    pub fn pipeline(&self) -> Result<&CasePipeline> {
        match &self.inner.backend {
            Backend::Ready { pipeline, .. } => Ok(pipeline),
            Backend::MissingSettings(missing) => Err(Error::MissingSettings(missing.clone())),
            Backend::Failed(reason) => Err(Error::Internal(format!("Azure clients unavailable: {}", reason))),
        }
    }

    /// Get the shared service clients, if they were built
    pub fn services(&self) -> Option<&Services> {
        match &self.inner.backend {
            Backend::Ready { services, .. } => Some(services),
            _ => None,
        }
    }

    /// Ready once the clients were built
    pub fn is_ready(&self) -> bool {
        matches!(self.inner.backend, Backend::Ready { .. })
    }
}

impl Backend {
    fn ready(services: Services, config: &IntakeConfig) -> Self {
        Backend::Ready {
            pipeline: CasePipeline::new(services.clone(), config),
            services,
        }
    }
}
