//! Prompt templates for entity extraction and case summaries

use serde_json::Value;

use crate::types::CaseContext;

/// System message for the entity extraction call
pub const ENTITY_SYSTEM_PROMPT: &str = "You extract structured fraud investigation entities.";

/// System message for the summary call
pub const SUMMARY_SYSTEM_PROMPT: &str = "You produce fraud investigation summaries.";

/// Entities the extraction prompt asks for
pub const ENTITY_FIELDS: [&str; 5] = [
    "Applicant Name",
    "Customer ID",
    "Branch Code",
    "Requested Amount",
    "Sanctioned Amount",
];

/// Prompt builder for the two model calls
pub struct PromptBuilder;

impl PromptBuilder {
    /// Build the entity extraction prompt from the case context and OCR text
    pub fn entity_prompt(context: &CaseContext, ocr_text: &str) -> String {
        format!(
            r#"Extract ONLY the following entities. Return STRICT JSON.
{fields}

CASE:
{case}

EMAIL:
{email}

DOCUMENT TEXT:
{ocr_text}
"#,
            fields = ENTITY_FIELDS.join("\n"),
            case = Self::case_block(context),
            email = Self::email_block(context),
            ocr_text = ocr_text
        )
    }

    fn case_block(context: &CaseContext) -> String {
        let customer = &context.customer;
        format!(
            "Case Type: {}\nFraud Category: {}\nPriority: {}\nCustomer Name: {}\nCustomer ID: {}\nAccount Type: {}",
            context.case_type,
            context.fraud_category,
            context.priority,
            customer.name,
            customer.customer_id,
            customer.account_type
        )
    }

    fn email_block(context: &CaseContext) -> String {
        let email = &context.email;
        format!(
            "From: {}\nSubject: {}\nReceived On: {}\n{}",
            email.from, email.subject, email.received_on, email.description
        )
    }

    /// Build the summary prompt from the case id, extracted entities and an OCR excerpt
    pub fn summary_prompt(case_id: &str, entities: &Value, ocr_text: &str, excerpt_chars: usize) -> String {
        let entities = serde_json::to_string_pretty(entities).unwrap_or_else(|_| entities.to_string());

        format!(
            r#"You are a senior bank fraud investigation officer.
Using ONLY the data below, generate a clear investigation summary.
CASE ID: {case_id}
EXTRACTED ENTITIES: {entities}
OCR DOCUMENT TEXT: {excerpt}

Return STRICT JSON with:
- case_id
- summary (3-4 sentences)
- key_findings (bullet list)
- risk_level (LOW / MEDIUM / HIGH)
- recommended_action (single sentence)
No markdown. No explanations.
"#,
            case_id = case_id,
            entities = entities,
            excerpt = Self::excerpt(ocr_text, excerpt_chars)
        )
    }

    /// First `max_chars` characters of `text`
    pub fn excerpt(text: &str, max_chars: usize) -> &str {
        match text.char_indices().nth(max_chars) {
            Some((idx, _)) => &text[..idx],
            None => text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entity_prompt_contents() {
        let prompt = PromptBuilder::entity_prompt(&CaseContext::default(), "Applicant: Anil Sharma");
        assert!(prompt.starts_with("Extract ONLY the following entities. Return STRICT JSON."));
        for field in ENTITY_FIELDS {
            assert!(prompt.contains(field));
        }
        assert!(prompt.contains("exceeds the sanctioned amount"));
        assert!(prompt.contains("DOCUMENT TEXT:\nApplicant: Anil Sharma"));
    }

    #[test]
    fn test_entity_prompt_renders_whole_context() {
        let prompt = PromptBuilder::entity_prompt(&CaseContext::default(), "");
        assert!(prompt.contains(
            "CASE:\nCase Type: Application Fraud\nFraud Category: Amount Fraud\nPriority: High\n\
             Customer Name: Anil Sharma\nCustomer ID: CUST-774512\nAccount Type: Retail Loan\n\nEMAIL:\n"
        ));
        assert!(prompt.contains(
            "EMAIL:\nFrom: alerts@bankcore.com\nSubject: Excess Loan Amount Credited\n\
             Received On: 2026-02-08T10:15:00Z\nSystem controls detected"
        ));
    }

    #[test]
    fn test_summary_prompt_pretty_prints_entities() {
        let entities = json!({"Applicant Name": "Anil Sharma"});
        let prompt = PromptBuilder::summary_prompt("CASE-9", &entities, "text", 2000);
        assert!(prompt.contains("CASE ID: CASE-9"));
        assert!(prompt.contains("{\n  \"Applicant Name\": \"Anil Sharma\"\n}"));
        assert!(prompt.contains("OCR DOCUMENT TEXT: text\n"));
        assert!(prompt.contains("- risk_level (LOW / MEDIUM / HIGH)"));
    }

    #[test]
    fn test_excerpt_counts_characters() {
        assert_eq!(PromptBuilder::excerpt("abcdef", 3), "abc");
        assert_eq!(PromptBuilder::excerpt("ab", 3), "ab");
        assert_eq!(PromptBuilder::excerpt("₹₹₹₹", 2), "₹₹");
        assert_eq!(PromptBuilder::excerpt("", 2000), "");
    }

    #[test]
    fn test_summary_prompt_clips_ocr_text() {
        let long = "x".repeat(2500);
        let prompt = PromptBuilder::summary_prompt("C", &json!({}), &long, 2000);
        assert!(prompt.contains(&"x".repeat(2000)));
        assert!(!prompt.contains(&"x".repeat(2001)));
    }
}
