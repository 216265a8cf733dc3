//! Cosmos DB connection string parsing
//!
//! `AccountEndpoint=https://{account}.documents.azure.com:443/;AccountKey=...;`
//! Account keys are base64 and may end with `=`, so only the first `=` of a
//! segment splits.

use crate::error::{Error, Result};

/// Cosmos DB account name and master key from a connection string
#[derive(Clone)]
pub struct CosmosAccount {
    /// Account name, the first label of the endpoint host
    pub name: String,
    /// Base64 master key
    pub key: String,
}

impl CosmosAccount {
    /// Parse a Cosmos DB connection string
    pub fn from_connection_string(raw: &str) -> Result<Self> {
        let mut endpoint = None;
        let mut key = None;

        for segment in raw.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (name, value) = segment.split_once('=').ok_or_else(|| {
                Error::Config("Malformed Cosmos connection string segment".to_string())
            })?;
            match name.trim().to_ascii_lowercase().as_str() {
                "accountendpoint" => endpoint = Some(value.trim()),
                "accountkey" => key = Some(value.trim()),
                _ => {}
            }
        }

        let endpoint = endpoint
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Config("Cosmos connection string is missing AccountEndpoint".to_string()))?;
        let key = key
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::Config("Cosmos connection string is missing AccountKey".to_string()))?;

        Ok(Self {
            name: account_from_endpoint(endpoint)?,
            key: key.to_string(),
        })
    }
}

fn account_from_endpoint(endpoint: &str) -> Result<String> {
    let host = endpoint
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(endpoint)
        .split(['/', ':'])
        .next()
        .unwrap_or_default();

    match host.split_once('.') {
        Some((account, domain)) if !account.is_empty() => {
            if domain != "documents.azure.com" {
                tracing::warn!("Cosmos endpoint {} is not a public cloud endpoint", host);
            }
            Ok(account.to_string())
        }
        _ => Err(Error::Config(format!("Cannot derive Cosmos account from endpoint {}", endpoint))),
    }
}
