//! Cleanup of "strict JSON" model output
//!
//! Models asked for strict JSON still tend to wrap it in a markdown fence.
//! Only fences are tolerated; any other surrounding prose fails parsing.

use serde_json::Value;

/// Trim the output and, if it opens with a fence, drop every fence marker
pub fn strip_code_fences(raw: &str) -> String {
    let cleaned = raw.trim();
    if cleaned.starts_with("```") {
        cleaned
            .replace("```json", "")
            .replace("```", "")
            .trim()
            .to_string()
    } else {
        cleaned.to_string()
    }
}

/// Parse model output as JSON after fence stripping.
///
/// On failure the cleaned text is returned so callers can report it.
pub fn parse_model_json(raw: &str) -> std::result::Result<Value, String> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str(&cleaned).map_err(|e| {
        tracing::debug!("Model output is not JSON ({}): {}", e, cleaned);
        cleaned
    })
}
