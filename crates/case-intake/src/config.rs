//! Configuration for the case intake service
//!
//! Azure connection settings are required and come from the environment with
//! no defaults. Everything else has a default that can be overridden through
//! an optional environment variable.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Main service configuration
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// Server configuration
    pub server: ServerConfig,
    /// Processing configuration
    pub processing: ProcessingConfig,
    /// LLM call configuration
    pub llm: LlmConfig,
    /// OCR configuration
    pub ocr: OcrConfig,
    /// Azure settings, or the names of the settings that are missing
    pub azure: std::result::Result<AzureSettings, MissingSettings>,
}

impl IntakeConfig {
    /// Load configuration from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut server = ServerConfig::default();
        if let Some(host) = non_empty(&lookup, "CASE_INTAKE_HOST") {
            server.host = host;
        }
        if let Some(port) = parse_var(&lookup, "CASE_INTAKE_PORT").or_else(|| parse_var(&lookup, "PORT")) {
            server.port = port;
        }
        if let Some(size) = parse_var(&lookup, "CASE_INTAKE_MAX_UPLOAD_BYTES") {
            server.max_upload_size = size;
        }
        if let Some(cors) = parse_var(&lookup, "CASE_INTAKE_ENABLE_CORS") {
            server.enable_cors = cors;
        }

        let mut processing = ProcessingConfig::default();
        if let Some(workers) = parse_var(&lookup, "OCR_MAX_WORKERS") {
            processing.max_ocr_workers = workers;
        }
        if let Some(interval) = parse_var(&lookup, "OCR_POLL_INTERVAL_MS") {
            processing.ocr_poll_interval_ms = interval;
        }
        if let Some(polls) = parse_var(&lookup, "OCR_MAX_POLLS") {
            processing.ocr_max_polls = polls;
        }
        if let Some(timeout) = parse_var(&lookup, "HTTP_TIMEOUT_SECS") {
            processing.request_timeout_secs = timeout;
        }

        let mut llm = LlmConfig::default();
        if let Some(deployment) = non_empty(&lookup, "AZURE_OPENAI_DEPLOYMENT") {
            llm.deployment = deployment;
        }

        let mut ocr = OcrConfig::default();
        if let Some(model_id) = non_empty(&lookup, "DOC_INT_MODEL_ID") {
            ocr.model_id = model_id;
        }
        if let Some(api_version) = non_empty(&lookup, "DOC_INT_API_VERSION") {
            ocr.api_version = api_version;
        }

        Self {
            server,
            processing,
            llm,
            ocr,
            azure: AzureSettings::from_lookup(&lookup),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 100MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            enable_cors: true,
            max_upload_size: 100 * 1024 * 1024, // 100MB
        }
    }
}

/// Processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Upper bound on concurrent OCR calls per request
    pub max_ocr_workers: usize,
    /// Delay between OCR status polls when the service sends no Retry-After
    pub ocr_poll_interval_ms: u64,
    /// Maximum number of status polls per analysis
    pub ocr_max_polls: u32,
    /// Timeout for a single outbound HTTP request in seconds
    pub request_timeout_secs: u64,
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            max_ocr_workers: 4,
            ocr_poll_interval_ms: 1000,
            ocr_max_polls: 120,
            request_timeout_secs: 120,
        }
    }
}

/// Chat completion settings for the two model calls
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Azure OpenAI deployment name
    pub deployment: String,
    /// Temperature for entity extraction
    pub entity_temperature: f32,
    /// Token limit for entity extraction
    pub entity_max_tokens: u32,
    /// Temperature for summary generation
    pub summary_temperature: f32,
    /// Token limit for summary generation
    pub summary_max_tokens: u32,
    /// Characters of OCR text included in the summary prompt
    pub ocr_excerpt_chars: usize,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            deployment: "gpt-4o-mini".to_string(),
            entity_temperature: 0.0,
            entity_max_tokens: 400,
            summary_temperature: 0.2,
            summary_max_tokens: 500,
            ocr_excerpt_chars: 2000,
        }
    }
}

/// Document Intelligence settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OcrConfig {
    /// Analysis model
    pub model_id: String,
    /// REST API version
    pub api_version: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            model_id: "prebuilt-layout".to_string(),
            api_version: "2024-11-30".to_string(),
        }
    }
}

/// Names of the required settings, in the order they are reported
pub const REQUIRED_SETTINGS: [&str; 10] = [
    "BLOB_CONN_STR",
    "BLOB_CONTAINER_NAME",
    "DOC_INT_KEY",
    "DOC_INT_ENDPOINT",
    "AZURE_API_ENDPOINT",
    "AZURE_API_KEY",
    "AZURE_API_VERSION",
    "COSMOS_CONN_STR",
    "COSMOS_DB_NAME",
    "COSMOS_CONTAINER_NAME",
];

/// Required Azure connection settings
#[derive(Clone)]
pub struct AzureSettings {
    /// Storage account connection string
    pub blob_conn_str: String,
    /// Blob container holding case files
    pub blob_container_name: String,
    /// Document Intelligence key
    pub doc_int_key: String,
    /// Document Intelligence endpoint
    pub doc_int_endpoint: String,
    /// Azure OpenAI endpoint
    pub openai_endpoint: String,
    /// Azure OpenAI key
    pub openai_key: String,
    /// Azure OpenAI API version
    pub openai_api_version: String,
    /// Cosmos DB connection string
    pub cosmos_conn_str: String,
    /// Cosmos DB database
    pub cosmos_db_name: String,
    /// Cosmos DB container
    pub cosmos_container_name: String,
}

// Keys and connection strings stay out of logs.
impl std::fmt::Debug for AzureSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureSettings")
            .field("blob_container_name", &self.blob_container_name)
            .field("doc_int_endpoint", &self.doc_int_endpoint)
            .field("openai_endpoint", &self.openai_endpoint)
            .field("openai_api_version", &self.openai_api_version)
            .field("cosmos_db_name", &self.cosmos_db_name)
            .field("cosmos_container_name", &self.cosmos_container_name)
            .finish_non_exhaustive()
    }
}

/// Required settings that were absent or empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingSettings(pub Vec<String>);

impl std::fmt::Display for MissingSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Missing required environment variables: {}", self.0.join(", "))
    }
}

impl From<MissingSettings> for crate::error::Error {
    fn from(missing: MissingSettings) -> Self {
        crate::error::Error::MissingSettings(missing.0)
    }
}

impl AzureSettings {
    /// Read settings through a lookup, collecting every missing name
    pub fn from_lookup<F>(lookup: F) -> std::result::Result<Self, MissingSettings>
    where
        F: Fn(&str) -> Option<String>,
    {
        let values: Vec<Option<String>> = REQUIRED_SETTINGS
            .iter()
            .map(|key| non_empty(&lookup, key))
            .collect();

        let missing: Vec<String> = REQUIRED_SETTINGS
            .iter()
            .zip(&values)
            .filter(|(_, value)| value.is_none())
            .map(|(key, _)| key.to_string())
            .collect();

        if !missing.is_empty() {
            return Err(MissingSettings(missing));
        }

        let mut values = values.into_iter().flatten();
        let mut next = || values.next().unwrap_or_default();

        Ok(Self {
            blob_conn_str: next(),
            blob_container_name: next(),
            doc_int_key: next(),
            doc_int_endpoint: next(),
            openai_endpoint: next(),
            openai_key: next(),
            openai_api_version: next(),
            cosmos_conn_str: next(),
            cosmos_db_name: next(),
            cosmos_container_name: next(),
        })
    }
}

fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key).filter(|value| !value.trim().is_empty())
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Option<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let raw = non_empty(lookup, key)?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}
