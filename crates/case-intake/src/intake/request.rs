//! Case request model and the rules for reading it from a request

use serde_json::Value;

use crate::types::{Attachment, CaseContext};

/// Everything the pipeline needs for one case
#[derive(Debug, Clone)]
pub struct CaseRequest {
    /// Case identifier, also the blob prefix
    pub case_id: String,
    /// Files uploaded with the request, stored before the case is read back
    pub uploads: Vec<Attachment>,
    /// Alert metadata for the entity prompt
    pub context: CaseContext,
}

impl CaseRequest {
    /// Request for `case_id` with no uploads and the default context
    pub fn new(case_id: impl Into<String>) -> Self {
        Self {
            case_id: case_id.into(),
            uploads: Vec::new(),
            context: CaseContext::default(),
        }
    }

    /// Attach uploaded files
    pub fn with_uploads(mut self, uploads: Vec<Attachment>) -> Self {
        self.uploads = uploads;
        self
    }

    /// Override the case context
    pub fn with_context(mut self, context: CaseContext) -> Self {
        self.context = context;
        self
    }
}

/// First non-empty `case_id` among the query parameters
pub fn query_case_id(params: &[(String, String)]) -> Option<&str> {
    params
        .iter()
        .find(|(key, value)| key == "case_id" && !value.is_empty())
        .map(|(_, value)| value.as_str())
}

/// Resolve the case id: the query value wins, then a top-level `case_id`
/// in a JSON object body. Empty values count as absent.
pub fn resolve_case_id(query: Option<&str>, body: &[u8]) -> Option<String> {
    if let Some(id) = query.filter(|id| !id.is_empty()) {
        return Some(id.to_string());
    }

    json_object(body)?
        .get("case_id")
        .and_then(case_id_value)
}

/// `case_context` object from a JSON body, if present and well-formed
pub fn context_from_json(body: &[u8]) -> Option<CaseContext> {
    let context = json_object(body)?.get("case_context")?.clone();
    match serde_json::from_value(context) {
        Ok(context) => Some(context),
        Err(e) => {
            tracing::warn!("Ignoring malformed case_context: {}", e);
            None
        }
    }
}

/// Normalise Windows separators in an upload's file name
pub fn sanitize_upload_name(name: &str) -> String {
    name.replace('\\', "/")
}

/// Object name an upload is stored under
pub fn blob_path(case_id: &str, file_name: &str) -> String {
    format!("{}/{}", case_id, file_name)
}

fn json_object(body: &[u8]) -> Option<serde_json::Map<String, Value>> {
    if body.is_empty() {
        return None;
    }
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Some(map),
        Ok(_) => {
            tracing::debug!("Request body is JSON but not an object");
            None
        }
        Err(e) => {
            tracing::debug!("Request body is not JSON: {}", e);
            None
        }
    }
}

fn case_id_value(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_wins_over_body() {
        let body = br#"{"case_id": "FROM-BODY"}"#;
        assert_eq!(resolve_case_id(Some("FROM-QUERY"), body).as_deref(), Some("FROM-QUERY"));
        assert_eq!(resolve_case_id(None, body).as_deref(), Some("FROM-BODY"));
    }

    #[test]
    fn test_repeated_query_parameter() {
        let params = |pairs: &[(&str, &str)]| -> Vec<(String, String)> {
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
        };

        let repeated = params(&[("case_id", "A"), ("case_id", "B")]);
        assert_eq!(query_case_id(&repeated), Some("A"));

        let leading_empty = params(&[("debug", "1"), ("case_id", ""), ("case_id", "B")]);
        assert_eq!(query_case_id(&leading_empty), Some("B"));

        assert_eq!(query_case_id(&params(&[("case", "A")])), None);
    }

    #[test]
    fn test_empty_query_falls_back_to_body() {
        let body = br#"{"case_id": "CASE-3"}"#;
        assert_eq!(resolve_case_id(Some(""), body).as_deref(), Some("CASE-3"));
    }

    #[test]
    fn test_unusable_bodies_yield_none() {
        assert_eq!(resolve_case_id(None, b""), None);
        assert_eq!(resolve_case_id(None, b"case_id=CASE-1"), None);
        assert_eq!(resolve_case_id(None, b"[\"CASE-1\"]"), None);
        assert_eq!(resolve_case_id(None, br#"{"case_id": ""}"#), None);
        assert_eq!(resolve_case_id(None, br#"{"case_id": null}"#), None);
        assert_eq!(resolve_case_id(None, br#"{"caseId": "CASE-1"}"#), None);
    }

    #[test]
    fn test_numeric_case_id_is_rendered() {
        assert_eq!(resolve_case_id(None, br#"{"case_id": 1042}"#).as_deref(), Some("1042"));
    }

    #[test]
    fn test_context_override() {
        let body = br#"{"case_id": "C", "case_context": {"priority": "Low", "customer": {"name": "Meera Iyer"}}}"#;
        let context = context_from_json(body).unwrap();
        assert_eq!(context.priority, "Low");
        assert_eq!(context.customer.name, "Meera Iyer");
        // Unspecified fields keep the sample values
        assert_eq!(context.case_type, CaseContext::default().case_type);

        assert!(context_from_json(br#"{"case_id": "C"}"#).is_none());
        assert!(context_from_json(br#"{"case_context": "high"}"#).is_none());
    }

    #[test]
    fn test_upload_paths() {
        assert_eq!(sanitize_upload_name(r"scans\page1.png"), "scans/page1.png");
        assert_eq!(sanitize_upload_name("loan.pdf"), "loan.pdf");
        assert_eq!(
            blob_path("CASE-1", &sanitize_upload_name(r"a\b\c.pdf")),
            "CASE-1/a/b/c.pdf"
        );
    }

    #[test]
    fn test_request_builder() {
        let request = CaseRequest::new("CASE-8")
            .with_uploads(vec![Attachment::new("a.pdf", vec![1u8])]);
        assert_eq!(request.case_id, "CASE-8");
        assert_eq!(request.uploads.len(), 1);
        assert_eq!(request.context, CaseContext::default());
    }
}
