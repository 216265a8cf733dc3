//! Azure AI Document Intelligence client for OCR
//!
//! Submits the raw document to an analysis model (layout by default) and
//! polls the returned operation until the analysis finishes.

use async_trait::async_trait;
use reqwest::{header, StatusCode};
use serde::Deserialize;
use std::time::Duration;

use crate::config::{OcrConfig, ProcessingConfig};
use crate::error::{Error, Result};
use crate::providers::ocr::{OcrPage, OcrProvider, OcrResult};

const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";

/// Document Intelligence client
pub struct DocumentIntelligenceClient {
    client: reqwest::Client,
    endpoint: String,
    key: String,
    model_id: String,
    api_version: String,
    poll_interval: Duration,
    max_polls: u32,
}

impl DocumentIntelligenceClient {
    /// Create a new client
    ///
    /// # Arguments
    /// * `client` - Shared HTTP client
    /// * `endpoint` - Resource endpoint, e.g. `https://name.cognitiveservices.azure.com/`
    /// * `key` - Resource key
    pub fn new(
        client: reqwest::Client,
        endpoint: &str,
        key: String,
        ocr: &OcrConfig,
        processing: &ProcessingConfig,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            key,
            model_id: ocr.model_id.clone(),
            api_version: ocr.api_version.clone(),
            poll_interval: Duration::from_millis(processing.ocr_poll_interval_ms),
            max_polls: processing.ocr_max_polls.max(1),
        }
    }

    /// URL that starts an analysis
    fn analyze_url(&self) -> String {
        format!(
            "{}/documentintelligence/documentModels/{}:analyze?api-version={}",
            self.endpoint, self.model_id, self.api_version
        )
    }

    /// Poll the operation until it leaves the running states
    async fn wait_for_result(&self, operation_url: &str) -> Result<AnalyzeResult> {
        for attempt in 1..=self.max_polls {
            let response = self
                .client
                .get(operation_url)
                .header(KEY_HEADER, &self.key)
                .send()
                .await
                .map_err(|e| Error::ocr(format!("Polling analysis failed: {}", e)))?;

            if !response.status().is_success() {
                let status = response.status();
                let body = response.text().await.unwrap_or_default();
                return Err(Error::ocr(format!("Analysis poll failed ({}): {}", status, body)));
            }

            let delay = retry_after(response.headers()).unwrap_or(self.poll_interval);

            let operation: AnalyzeOperation = response
                .json()
                .await
                .map_err(|e| Error::ocr(format!("Failed to parse analysis status: {}", e)))?;

            match operation.status.as_str() {
                "succeeded" => {
                    return operation
                        .analyze_result
                        .ok_or_else(|| Error::ocr("Analysis succeeded without a result"));
                }
                "failed" | "canceled" => {
                    let detail = operation
                        .error
                        .map(|e| format!("{}: {}", e.code, e.message))
                        .unwrap_or_else(|| operation.status.clone());
                    return Err(Error::ocr(format!("Analysis {}", detail)));
                }
                status => {
                    tracing::debug!("Analysis {} (poll {}/{})", status, attempt, self.max_polls);
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(Error::ocr(format!(
            "Analysis did not finish after {} polls",
            self.max_polls
        )))
    }
}

#[async_trait]
impl OcrProvider for DocumentIntelligenceClient {
    async fn analyze(&self, data: &[u8]) -> Result<OcrResult> {
        let response = self
            .client
            .post(self.analyze_url())
            .header(KEY_HEADER, &self.key)
            .header(header::CONTENT_TYPE, "application/octet-stream")
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| Error::ocr(format!("Analyze request failed: {}", e)))?;

        if response.status() != StatusCode::ACCEPTED && !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::ocr(format!("Analyze request rejected ({}): {}", status, body)));
        }

        let operation_url = response
            .headers()
            .get("operation-location")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| Error::ocr("Analyze response has no Operation-Location header"))?;

        let result = self.wait_for_result(&operation_url).await?;
        Ok(result.into())
    }

    fn name(&self) -> &str {
        "document-intelligence"
    }
}

fn retry_after(headers: &header::HeaderMap) -> Option<Duration> {
    headers
        .get(header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(Duration::from_secs)
}

// ============================================================================
// API Response types
// ============================================================================

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnalyzeOperation {
    status: String,
    analyze_result: Option<AnalyzeResult>,
    error: Option<ServiceError>,
}

#[derive(Deserialize)]
struct ServiceError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Deserialize, Default)]
struct AnalyzeResult {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Page {
    page_number: Option<u32>,
    #[serde(default)]
    lines: Vec<Line>,
}

#[derive(Deserialize)]
struct Line {
    content: String,
}

impl From<AnalyzeResult> for OcrResult {
    fn from(result: AnalyzeResult) -> Self {
        let pages = result
            .pages
            .into_iter()
            .enumerate()
            .map(|(i, page)| OcrPage {
                page_number: page.page_number.unwrap_or((i + 1) as u32),
                lines: page.lines.into_iter().map(|l| l.content).collect(),
            })
            .collect();
        OcrResult { pages }
    }
}
