//! Persisted case record

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Entities parsed from the extraction model's output. Any valid JSON is kept as-is.
pub type ExtractedEntities = serde_json::Value;

/// Summary parsed from the summary model's output. Its fields are asserted only by the prompt.
pub type SummaryResult = serde_json::Value;

/// Record written to the document database, one per processed request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseDocument {
    /// `{case_id}-{NN}`; not collision-safe, re-runs create new records
    pub id: String,
    /// Case identifier from the request
    pub case_id: String,
    /// Naive UTC ISO-8601 timestamp
    pub timestamp: String,
    /// Concatenated OCR text of every attachment
    pub ocr_text: String,
    /// Output of the entity extraction call
    pub extracted_entities: ExtractedEntities,
    /// Output of the summary call
    pub summary_result: SummaryResult,
}

impl CaseDocument {
    /// Build a new record with a random two-digit id suffix and the current time
    pub fn new(
        case_id: impl Into<String>,
        ocr_text: String,
        extracted_entities: ExtractedEntities,
        summary_result: SummaryResult,
    ) -> Self {
        let case_id = case_id.into();
        let suffix: u8 = rand::thread_rng().gen_range(10..=99);

        Self {
            id: format!("{}-{}", case_id, suffix),
            case_id,
            timestamp: Utc::now()
                .naive_utc()
                .format("%Y-%m-%dT%H:%M:%S%.6f")
                .to_string(),
            ocr_text,
            extracted_entities,
            summary_result,
        }
    }
}
