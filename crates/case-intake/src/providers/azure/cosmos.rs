//! Azure Cosmos DB (SQL API) case store
//!
//! Upserts case records through the Cosmos SDK collection client. The
//! container's partition key path is read once and the partition key value
//! is taken from each document. Only the first path of a hierarchical
//! partition key is used.

use async_trait::async_trait;
use azure_data_cosmos::prelude::{AuthorizationToken, CollectionClient, CosmosClient, CosmosEntity};
use serde::{Serialize, Serializer};
use serde_json::Value;
use tokio::sync::OnceCell;

use super::connection::CosmosAccount;
use crate::error::{Error, Result};
use crate::providers::case_store::CaseStore;
use crate::types::CaseDocument;

/// Cosmos DB container holding case records
pub struct CosmosCaseStore {
    collection: CollectionClient,
    container: String,
    partition_key_path: OnceCell<Option<String>>,
}

impl CosmosCaseStore {
    /// Create a store from a Cosmos connection string
    pub fn new(connection_string: &str, database: String, container: String) -> Result<Self> {
        let account = CosmosAccount::from_connection_string(connection_string)?;
        let token = AuthorizationToken::primary_key(account.key.as_str())
            .map_err(|e| Error::Config(format!("Invalid Cosmos account key: {}", e)))?;

        let collection = CosmosClient::new(account.name, token)
            .database_client(database)
            .collection_client(container.clone());

        Ok(Self {
            collection,
            container,
            partition_key_path: OnceCell::new(),
        })
    }

    /// Read the container definition as JSON
    async fn read_collection(&self) -> Result<Value> {
        let response = self
            .collection
            .get_collection()
            .await
            .map_err(|e| Error::case_store(format!("Reading container {} failed: {}", self.container, e)))?;

        serde_json::to_value(&response.collection).map_err(Error::from)
    }

    async fn partition_key_path(&self) -> Result<Option<&str>> {
        let path = self
            .partition_key_path
            .get_or_try_init(|| async {
                let path = partition_key_path_of(&self.read_collection().await?);
                tracing::info!(
                    "Cosmos container {} partition key: {}",
                    self.container,
                    path.as_deref().unwrap_or("<none>")
                );
                Ok::<_, Error>(path)
            })
            .await?;
        Ok(path.as_deref())
    }
}

/// First partition key path of a container definition
fn partition_key_path_of(collection: &Value) -> Option<String> {
    collection
        .get("partitionKey")?
        .get("paths")?
        .as_array()?
        .first()?
        .as_str()
        .map(str::to_string)
}

/// Partition key value of a document.
///
/// A document without a value at the path gets the undefined key `{}`.
fn partition_key_for(document: &Value, path: Option<&str>) -> Value {
    path.and_then(|path| {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .try_fold(document, |current, segment| current.get(segment))
    })
    .cloned()
    .unwrap_or_else(|| Value::Object(Default::default()))
}

/// Case document paired with its partition key
struct CaseRecord {
    body: Value,
    partition_key: Value,
}

impl Serialize for CaseRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.body.serialize(serializer)
    }
}

impl CosmosEntity for CaseRecord {
    type Entity = Value;

    fn partition_key(&self) -> Self::Entity {
        self.partition_key.clone()
    }
}

#[async_trait]
impl CaseStore for CosmosCaseStore {
    async fn upsert(&self, document: &CaseDocument) -> Result<()> {
        let body = serde_json::to_value(document)?;
        let path = self.partition_key_path().await?;
        let record = CaseRecord {
            partition_key: partition_key_for(&body, path),
            body,
        };

        self.collection
            .create_document(record)
            .is_upsert(true)
            .await
            .map_err(|e| Error::case_store(format!("Upsert of {} failed: {}", document.id, e)))?;

        Ok(())
    }

    async fn health_check(&self) -> Result<bool> {
        self.read_collection().await.map(|_| true)
    }

    fn name(&self) -> &str {
        "cosmos"
    }
}
