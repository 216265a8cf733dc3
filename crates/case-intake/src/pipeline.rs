//! End-to-end case processing
//!
//! Uploads → blob scan → OCR → entity extraction → summary → persist.

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

use crate::config::{IntakeConfig, LlmConfig};
use crate::error::{Error, Result};
use crate::generation::{parse_model_json, PromptBuilder};
use crate::generation::prompt::{ENTITY_SYSTEM_PROMPT, SUMMARY_SYSTEM_PROMPT};
use crate::intake::{blob_path, sanitize_upload_name, CaseRequest};
use crate::processing::{join_texts, OcrPool};
use crate::providers::{BlobStore, CaseStore, ChatProvider, ChatRequest, Services};
use crate::types::{Attachment, CaseContext, CaseDocument, ExtractedEntities, SummaryResult};

/// Runs one case through every processing step
pub struct CasePipeline {
    blob_store: Arc<dyn BlobStore>,
    ocr_pool: OcrPool,
    chat: Arc<dyn ChatProvider>,
    case_store: Arc<dyn CaseStore>,
    llm: LlmConfig,
}

impl CasePipeline {
    /// Create a pipeline over the given providers
    pub fn new(services: Services, config: &IntakeConfig) -> Self {
        Self {
            blob_store: services.blob_store,
            ocr_pool: OcrPool::new(services.ocr, config.processing.max_ocr_workers),
            chat: services.chat,
            case_store: services.case_store,
            llm: config.llm.clone(),
        }
    }

    /// Process a case and return the summary
    pub async fn run(&self, request: CaseRequest) -> Result<SummaryResult> {
        let start = Instant::now();
        let case_id = request.case_id.as_str();
        tracing::info!("Processing case_id: {}", case_id);

        self.store_uploads(case_id, &request.uploads).await?;

        let attachments = self.load_attachments(case_id).await?;
        if attachments.is_empty() {
            return Err(Error::NoAttachments(case_id.to_string()));
        }
        tracing::info!("Processing {} attachment(s)", attachments.len());

        let texts = self.ocr_pool.extract_all(&attachments).await;
        let ocr_text = join_texts(&texts);
        tracing::info!("OCR completed. Extracted {} characters", ocr_text.chars().count());

        let entities = self.extract_entities(&request.context, &ocr_text).await?;
        let summary = self.summarize(case_id, &entities, &ocr_text).await?;

        let document = CaseDocument::new(case_id, ocr_text, entities, summary.clone());
        self.case_store.upsert(&document).await?;
        tracing::info!(
            "Stored case record {} in {} ({:.1}s total)",
            document.id,
            self.case_store.name(),
            start.elapsed().as_secs_f64()
        );

        Ok(summary)
    }

    /// Write uploaded files under the case prefix, replacing existing objects
    async fn store_uploads(&self, case_id: &str, uploads: &[Attachment]) -> Result<()> {
        if uploads.is_empty() {
            return Ok(());
        }
        tracing::info!("[UPLOAD] Received {} file(s)", uploads.len());

        for upload in uploads {
            let path = blob_path(case_id, &sanitize_upload_name(&upload.file_name));
            self.blob_store.upload(&path, upload.bytes.clone(), true).await?;
            tracing::info!("[UPLOAD] Stored file -> {}", path);
        }
        Ok(())
    }

    /// Download every object under `{case_id}/`, in listing order
    async fn load_attachments(&self, case_id: &str) -> Result<Vec<Attachment>> {
        let prefix = format!("{}/", case_id);
        tracing::info!(
            "[BLOB SCAN] Scanning {} for prefix '{}'",
            self.blob_store.name(),
            prefix
        );

        let names = self.blob_store.list(&prefix).await?;
        tracing::info!("[BLOB COUNT] Found {} blob(s)", names.len());

        let mut attachments = Vec::with_capacity(names.len());
        for name in names {
            let attachment = Attachment::from_object(&name, self.blob_store.download(&name).await?);
            tracing::info!("Processing file: {} ({} bytes)", name, attachment.size());
            attachments.push(attachment);
        }
        Ok(attachments)
    }

    async fn extract_entities(&self, context: &CaseContext, ocr_text: &str) -> Result<ExtractedEntities> {
        tracing::info!("Calling {} ({}) for entity extraction", self.chat.name(), self.chat.model());

        let raw = self
            .chat
            .complete(ChatRequest {
                system: ENTITY_SYSTEM_PROMPT.to_string(),
                user: PromptBuilder::entity_prompt(context, ocr_text),
                temperature: self.llm.entity_temperature,
                max_tokens: self.llm.entity_max_tokens,
            })
            .await?;

        parse_model_json(&raw).map_err(|raw_output| Error::InvalidModelOutput { raw_output })
    }

    async fn summarize(&self, case_id: &str, entities: &Value, ocr_text: &str) -> Result<SummaryResult> {
        tracing::info!("Generating investigation summary for {}", case_id);

        let raw = self
            .chat
            .complete(ChatRequest {
                system: SUMMARY_SYSTEM_PROMPT.to_string(),
                user: PromptBuilder::summary_prompt(case_id, entities, ocr_text, self.llm.ocr_excerpt_chars),
                temperature: self.llm.summary_temperature,
                max_tokens: self.llm.summary_max_tokens,
            })
            .await?;

        parse_model_json(&raw)
            .map_err(|cleaned| Error::llm(format!("Summary is not valid JSON: {}", cleaned)))
    }
}
