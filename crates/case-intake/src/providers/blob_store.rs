//! Object storage provider trait

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::Result;

/// Trait for case file storage
///
/// Implementations:
/// - `AzureBlobStore`: Azure Blob Storage container
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Write an object, replacing any existing object at `path` when `overwrite` is set
    async fn upload(&self, path: &str, data: Bytes, overwrite: bool) -> Result<()>;

    /// List object names starting with `prefix`, in listing order
    async fn list(&self, prefix: &str) -> Result<Vec<String>>;

    /// Download an object fully into memory
    async fn download(&self, name: &str) -> Result<Bytes>;

    /// Check if the provider is reachable
    async fn health_check(&self) -> Result<bool>;

    /// Get provider name for logging
    fn name(&self) -> &str;
}
