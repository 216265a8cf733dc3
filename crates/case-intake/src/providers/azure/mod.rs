//! Azure provider implementations
//!
//! Provides the case pipeline's external services using:
//! - Azure Blob Storage for case files (SDK)
//! - Azure AI Document Intelligence for OCR (REST)
//! - Azure OpenAI for entity extraction and summaries (REST)
//! - Azure Cosmos DB for case records (SDK)
//!
//! The two REST clients share one `reqwest::Client`.

mod blob_store;
mod connection;
mod cosmos;
mod document_intelligence;
mod openai;

pub use blob_store::AzureBlobStore;
pub use cosmos::CosmosCaseStore;
pub use document_intelligence::DocumentIntelligenceClient;
pub use openai::AzureOpenAiClient;

use std::sync::Arc;
use std::time::Duration;

use crate::config::{AzureSettings, IntakeConfig};
use crate::error::{Error, Result};
use crate::providers::Services;

/// Construct every Azure client from the settings
pub fn connect(settings: &AzureSettings, config: &IntakeConfig) -> Result<Services> {
    let client = http_client(Duration::from_secs(config.processing.request_timeout_secs))?;

    let blob_store = AzureBlobStore::new(
        &settings.blob_conn_str,
        settings.blob_container_name.clone(),
    )?;

    let ocr = DocumentIntelligenceClient::new(
        client.clone(),
        &settings.doc_int_endpoint,
        settings.doc_int_key.clone(),
        &config.ocr,
        &config.processing,
    );

    let chat = AzureOpenAiClient::new(
        client,
        &settings.openai_endpoint,
        settings.openai_key.clone(),
        settings.openai_api_version.clone(),
        config.llm.deployment.clone(),
    );

    let case_store = CosmosCaseStore::new(
        &settings.cosmos_conn_str,
        settings.cosmos_db_name.clone(),
        settings.cosmos_container_name.clone(),
    )?;

    tracing::info!(
        "Azure clients initialized (container: {}, deployment: {}, cosmos: {}/{})",
        settings.blob_container_name,
        config.llm.deployment,
        settings.cosmos_db_name,
        settings.cosmos_container_name
    );

    Ok(Services {
        blob_store: Arc::new(blob_store),
        ocr: Arc::new(ocr),
        chat: Arc::new(chat),
        case_store: Arc::new(case_store),
    })
}

/// Shared HTTP client for outbound service calls
fn http_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("case-intake/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| Error::Internal(format!("Failed to build HTTP client: {}", e)))
}
