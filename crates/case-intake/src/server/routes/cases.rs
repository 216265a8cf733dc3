//! Case processing endpoint

use axum::{
    extract::{FromRequest, Multipart, Query, Request, State},
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::{Error, Result};
use crate::intake::{
    context_from_json, query_case_id, read_multipart, resolve_case_id, CaseRequest, MultipartBody,
};
use crate::server::state::AppState;

/// GET|POST /api/githubrepodocs - Process a case and return its summary
pub async fn process_case(
    State(state): State<AppState>,
    Query(params): Query<Vec<(String, String)>>,
    request: Request,
) -> Result<Response> {
    let pipeline = state.pipeline()?;

    let case_request = decode_request(&state, query_case_id(&params), request).await?;
    let summary = pipeline.run(case_request).await?;

    let body = serde_json::to_string_pretty(&summary)?;
    Ok(([(header::CONTENT_TYPE, "application/json")], body).into_response())
}

/// Build a [`CaseRequest`] from a multipart form or a (possibly JSON) body
async fn decode_request(
    state: &AppState,
    query_id: Option<&str>,
    request: Request,
) -> Result<CaseRequest> {
    if is_multipart(&request) {
        let form = match Multipart::from_request(request, state).await {
            Ok(multipart) => read_multipart(multipart).await,
            Err(e) => {
                tracing::debug!("Ignoring malformed multipart request: {}", e);
                MultipartBody::default()
            }
        };

        let case_id = query_id
            .map(str::to_string)
            .or(form.case_id)
            .ok_or(Error::MissingCaseId)?;

        let mut case_request = CaseRequest::new(case_id).with_uploads(form.uploads);
        if let Some(context) = form.context {
            case_request = case_request.with_context(context);
        }
        return Ok(case_request);
    }

    let body = axum::body::to_bytes(request.into_body(), state.config().server.max_upload_size)
        .await
        .map_err(|e| Error::Internal(format!("Failed to read request body: {}", e)))?;

    let case_id = resolve_case_id(query_id, &body).ok_or(Error::MissingCaseId)?;
    let mut case_request = CaseRequest::new(case_id);
    if let Some(context) = context_from_json(&body) {
        case_request = case_request.with_context(context);
    }
    Ok(case_request)
}

fn is_multipart(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with("multipart/form-data"))
        .unwrap_or(false)
}
