//! Azure Blob Storage case file store
//!
//! Uses the Azure storage SDK container client. Credentials (account key or
//! SAS) come from the storage connection string.

use async_trait::async_trait;
use azure_storage::{CloudLocation, ConnectionString};
use azure_storage_blobs::prelude::{ClientBuilder, ContainerClient};
use bytes::Bytes;
use futures_util::StreamExt;

use crate::error::{Error, Result};
use crate::providers::blob_store::BlobStore;

const PUBLIC_ENDPOINT_SUFFIX: &str = "core.windows.net";

/// Azure Blob Storage container
pub struct AzureBlobStore {
    client: ContainerClient,
    container: String,
}

impl AzureBlobStore {
    /// Create a store for `container` from a storage connection string
    pub fn new(connection_string: &str, container: String) -> Result<Self> {
        let conn = ConnectionString::new(connection_string)
            .map_err(|e| Error::Config(format!("Invalid storage connection string: {}", e)))?;
        let credentials = conn
            .storage_credentials()
            .map_err(|e| Error::Config(format!("Invalid storage credentials: {}", e)))?;

        let location = BlobLocation::resolve(conn.account_name, conn.blob_endpoint, conn.endpoint_suffix)?;
        let builder = match location.uri {
            Some(uri) => ClientBuilder::with_location(
                CloudLocation::Custom {
                    account: location.account,
                    uri,
                },
                credentials,
            ),
            None => ClientBuilder::new(location.account, credentials),
        };

        Ok(Self {
            client: builder.container_client(container.clone()),
            container,
        })
    }
}

/// Account name plus the blob endpoint when it is not the public default
#[derive(Debug, PartialEq)]
struct BlobLocation {
    account: String,
    uri: Option<String>,
}

impl BlobLocation {
    fn resolve(
        account_name: Option<&str>,
        blob_endpoint: Option<&str>,
        endpoint_suffix: Option<&str>,
    ) -> Result<Self> {
        let account = account_name
            .filter(|a| !a.is_empty())
            .map(str::to_string)
            .or_else(|| blob_endpoint.and_then(account_from_endpoint))
            .ok_or_else(|| {
                Error::Config("Storage connection string needs AccountName or BlobEndpoint".to_string())
            })?;

        let uri = match (blob_endpoint, endpoint_suffix) {
            (Some(endpoint), _) => Some(endpoint.trim_end_matches('/').to_string()),
            (None, Some(suffix)) if suffix != PUBLIC_ENDPOINT_SUFFIX => {
                Some(format!("https://{}.blob.{}", account, suffix))
            }
            _ => None,
        };

        Ok(Self { account, uri })
    }
}

fn account_from_endpoint(endpoint: &str) -> Option<String> {
    let host = endpoint.split_once("://").map(|(_, rest)| rest).unwrap_or(endpoint);
    host.split(['.', '/', ':'])
        .next()
        .filter(|label| !label.is_empty())
        .map(str::to_string)
}

#[async_trait]
impl BlobStore for AzureBlobStore {
    async fn upload(&self, path: &str, data: Bytes, overwrite: bool) -> Result<()> {
        let blob = self.client.blob_client(path);

        if !overwrite {
            let exists = blob
                .exists()
                .await
                .map_err(|e| Error::storage(format!("Checking {} failed: {}", path, e)))?;
            if exists {
                return Err(Error::storage(format!("Blob already exists: {}", path)));
            }
        }

        let content_type = mime_guess::from_path(path)
            .first_or_octet_stream()
            .to_string();

        blob.put_block_blob(data)
            .content_type(content_type)
            .await
            .map_err(|e| Error::storage(format!("Upload of {} failed: {}", path, e)))?;

        Ok(())
    }

    async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut pages = self
            .client
            .list_blobs()
            .prefix(prefix.to_string())
            .into_stream();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| {
                Error::storage(format!("Listing {}/{} failed: {}", self.container, prefix, e))
            })?;
            names.extend(page.blobs.blobs().map(|blob| blob.name.clone()));
        }

        Ok(names)
    }

    async fn download(&self, name: &str) -> Result<Bytes> {
        self.client
            .blob_client(name)
            .get_content()
            .await
            .map(Bytes::from)
            .map_err(|e| Error::storage(format!("Download of {} failed: {}", name, e)))
    }

    async fn health_check(&self) -> Result<bool> {
        self.client
            .exists()
            .await
            .map_err(|e| Error::storage(format!("Container check failed: {}", e)))
    }

    fn name(&self) -> &str {
        "azure-blob"
    }
}
