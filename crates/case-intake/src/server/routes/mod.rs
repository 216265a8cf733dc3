//! API routes for the case intake server

pub mod cases;

use axum::{extract::DefaultBodyLimit, extract::State, routing::get, Json, Router};
use serde_json::json;

use crate::server::state::AppState;

/// Path of the case processing endpoint under `/api`
pub const CASE_ROUTE: &str = "/githubrepodocs";

/// Build all API routes
pub fn api_routes(max_upload_size: usize) -> Router<AppState> {
    Router::new()
        // Case processing - body limit sized for attachments
        .route(
            CASE_ROUTE,
            get(cases::process_case)
                .post(cases::process_case)
                .layer(DefaultBodyLimit::max(max_upload_size)),
        )
        // Info
        .route("/info", get(info))
}

/// API info endpoint
async fn info(State(state): State<AppState>) -> Json<serde_json::Value> {
    let config = state.config();
    let missing = match &config.azure {
        Ok(_) => Vec::new(),
        Err(missing) => missing.0.clone(),
    };

    Json(json!({
        "name": "case-intake",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Fraud case intake: attachment OCR, entity extraction and investigation summaries",
        "endpoints": {
            "GET|POST /api/githubrepodocs": "Process a case (case_id in query or body, optional multipart files)",
            "GET /api/info": "Service information",
            "GET /health": "Liveness check",
            "GET /ready": "Readiness check"
        },
        "ready": state.is_ready(),
        "missing_settings": missing,
        "models": {
            "ocr": config.ocr.model_id,
            "chat_deployment": config.llm.deployment
        },
        "limits": {
            "max_upload_bytes": config.server.max_upload_size,
            "max_ocr_workers": config.processing.max_ocr_workers
        }
    }))
}
