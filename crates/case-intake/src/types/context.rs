//! Case metadata embedded in the entity extraction prompt

use serde::{Deserialize, Serialize};

/// Alert and customer metadata describing the case.
///
/// Requests may supply their own context; otherwise the built-in sample
/// alert is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaseContext {
    pub case_type: String,
    pub fraud_category: String,
    pub priority: String,
    pub email: EmailInfo,
    pub customer: CustomerInfo,
}

/// Alert email that opened the case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EmailInfo {
    pub from: String,
    pub subject: String,
    pub description: String,
    pub received_on: String,
}

/// Customer the case concerns
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomerInfo {
    pub name: String,
    pub customer_id: String,
    pub account_type: String,
}

impl Default for CaseContext {
    fn default() -> Self {
        Self {
            case_type: "Application Fraud".to_string(),
            fraud_category: "Amount Fraud".to_string(),
            priority: "High".to_string(),
            email: EmailInfo::default(),
            customer: CustomerInfo::default(),
        }
    }
}

impl Default for EmailInfo {
    fn default() -> Self {
        Self {
            from: "alerts@bankcore.com".to_string(),
            subject: "Excess Loan Amount Credited".to_string(),
            description: "System controls detected that the loan amount credited \
                exceeds the sanctioned amount. Preliminary review indicates \
                possible amount manipulation during disbursement."
                .to_string(),
            received_on: "2026-02-08T10:15:00Z".to_string(),
        }
    }
}

impl Default for CustomerInfo {
    fn default() -> Self {
        Self {
            name: "Anil Sharma".to_string(),
            customer_id: "CUST-774512".to_string(),
            account_type: "Retail Loan".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_override_keeps_defaults() {
        let ctx: CaseContext = serde_json::from_str(
            r#"{"email": {"description": "Duplicate disbursement flagged"}}"#,
        )
        .unwrap();
        assert_eq!(ctx.email.description, "Duplicate disbursement flagged");
        assert_eq!(ctx.email.from, "alerts@bankcore.com");
        assert_eq!(ctx.customer.customer_id, "CUST-774512");
        assert_eq!(ctx.case_type, "Application Fraud");
    }
}
