use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use super::{memory_store::MemoryStore, mongodb_store::MongoDBStore};
use crate::config::StoreConfig;

/// Failures surfaced by a store backend. Never retried by the caller.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{backend} store unavailable: {message}")]
    Unavailable {
        backend: &'static str,
        message: String,
    },
    #[error("stored document in '{collection}' could not be decoded: {message}")]
    Corrupt { collection: String, message: String },
}

impl StoreError {
    pub fn unavailable(backend: &'static str, message: impl Into<String>) -> Self {
        StoreError::Unavailable {
            backend,
            message: message.into(),
        }
    }

    pub fn corrupt(collection: &str, message: impl Into<String>) -> Self {
        StoreError::Corrupt {
            collection: collection.to_string(),
            message: message.into(),
        }
    }
}

/// A schema-flexible document store addressed by collection name and document id.
///
/// Documents are JSON objects. The backend keys them by `id`; the body may
/// repeat that id as an ordinary field.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError>;

    /// Inserts or fully replaces the document stored under `id`.
    async fn set(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError>;

    /// Removes the document. Removing a missing document is not an error.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// All documents whose top-level `field` equals `value`.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError>;

    async fn list_all(&self, collection: &str) -> Result<Vec<Value>, StoreError>;

    fn backend_name(&self) -> &'static str;
}

/// Creates the store backend selected in the configuration.
pub async fn create_store(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config {
        StoreConfig::MongoDB(mongo_config) => {
            let store = MongoDBStore::new(mongo_config).await?;
            info!("Successfully created MongoDB store.");
            Ok(Arc::new(store))
        }
        StoreConfig::Memory => {
            info!("Using in-memory document store; data is lost on restart.");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}
