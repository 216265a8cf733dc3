//! Provider abstractions for object storage, OCR, chat completion and case storage
//!
//! The pipeline only talks to these traits; the Azure implementations live in
//! [`azure`].

pub mod azure;
pub mod blob_store;
pub mod case_store;
pub mod llm;
pub mod ocr;

pub use blob_store::BlobStore;
pub use case_store::CaseStore;
pub use llm::{ChatProvider, ChatRequest};
pub use ocr::{OcrPage, OcrProvider, OcrResult};

use std::sync::Arc;

use crate::config::{AzureSettings, IntakeConfig};
use crate::error::Result;

/// The four service clients, built once and shared across requests
#[derive(Clone)]
pub struct Services {
    pub blob_store: Arc<dyn BlobStore>,
    pub ocr: Arc<dyn OcrProvider>,
    pub chat: Arc<dyn ChatProvider>,
    pub case_store: Arc<dyn CaseStore>,
}

impl Services {
    /// Build the Azure-backed clients
    pub fn azure(settings: &AzureSettings, config: &IntakeConfig) -> Result<Self> {
        azure::connect(settings, config)
    }

    /// Check the storage providers, returning `(name, reachable)` pairs
    pub async fn health(&self) -> Vec<(String, bool)> {
        let (blob, store) = tokio::join!(
            self.blob_store.health_check(),
            self.case_store.health_check()
        );
        vec![
            (self.blob_store.name().to_string(), blob.unwrap_or(false)),
            (self.case_store.name().to_string(), store.unwrap_or(false)),
        ]
    }
}
