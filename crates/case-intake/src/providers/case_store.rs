//! Case record store trait

use async_trait::async_trait;

use crate::error::Result;
use crate::types::CaseDocument;

/// Trait for persisting processed cases
///
/// Implementations:
/// - `CosmosCaseStore`: Azure Cosmos DB (SQL API)
#[async_trait]
pub trait CaseStore: Send + Sync {
    /// Insert or replace the record with the same `id`
    async fn upsert(&self, document: &CaseDocument) -> Result<()>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
