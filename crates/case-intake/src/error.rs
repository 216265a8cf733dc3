//! Error types for the case intake service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Result type alias for intake operations
pub type Result<T> = std::result::Result<T, Error>;

/// Case intake errors
#[derive(Debug, Error)]
pub enum Error {
    /// Required environment settings are absent
    #[error("Missing required environment variables: {}", .0.join(", "))]
    MissingSettings(Vec<String>),

    /// Request carried no case identifier
    #[error("case_id is required")]
    MissingCaseId,

    /// Nothing stored (or uploaded) for the case
    #[error("No attachments found in Blob for case {0}")]
    NoAttachments(String),

    /// Entity extraction returned something that is not JSON
    #[error("Invalid JSON returned by model")]
    InvalidModelOutput { raw_output: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Object storage error
    #[error("Blob storage error: {0}")]
    Storage(String),

    /// OCR service error
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Language model error
    #[error("LLM error: {0}")]
    Llm(String),

    /// Document database error
    #[error("Case store error: {0}")]
    CaseStore(String),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP request error
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage(message.into())
    }

    /// Create an OCR error
    pub fn ocr(message: impl Into<String>) -> Self {
        Self::Ocr(message.into())
    }

    /// Create an LLM error
    pub fn llm(message: impl Into<String>) -> Self {
        Self::Llm(message.into())
    }

    /// Create a case store error
    pub fn case_store(message: impl Into<String>) -> Self {
        Self::CaseStore(message.into())
    }

    /// HTTP status this error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            Error::MissingCaseId => StatusCode::BAD_REQUEST,
            Error::NoAttachments(_) => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match &self {
            Error::MissingSettings(missing) => {
                tracing::error!("{}", self);
                json!({
                    "error": self.to_string(),
                    "missing": missing,
                })
            }
            Error::MissingCaseId => json!({ "error": self.to_string() }),
            Error::NoAttachments(case_id) => {
                tracing::warn!("No attachments found for case {}", case_id);
                json!({ "error": self.to_string() })
            }
            Error::InvalidModelOutput { raw_output } => {
                tracing::error!("Invalid JSON from model: {}", raw_output);
                json!({
                    "error": self.to_string(),
                    "raw_output": raw_output,
                })
            }
            other => {
                tracing::error!(error = ?other, "Unexpected error: {}", other);
                json!({
                    "error": "Internal server error",
                    "message": other.to_string(),
                })
            }
        };

        (status, Json(body)).into_response()
    }
}
