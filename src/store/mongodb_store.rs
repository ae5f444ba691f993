use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, to_document, Bson, Document};
use mongodb::options::{ClientOptions, ReplaceOptions};
use mongodb::{Client, Collection, Cursor, Database, IndexModel};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use super::{DocumentStore, StoreError};
use crate::models::{OwnedRecord, Session, Todo};

const BACKEND: &str = "mongodb";

/// The config struct for MongoDB connections.
/// Contains the URI and database name.
#[derive(Deserialize, Serialize, JsonSchema, Debug, Clone)]
pub struct MongoDBConfig {
    pub uri: String,
    pub database: String,
}

/// A `DocumentStore` backed by one MongoDB database, one MongoDB collection per
/// store collection. The document id is kept in `_id`.
pub struct MongoDBStore {
    database: Database,
}

fn unavailable(e: mongodb::error::Error) -> StoreError {
    StoreError::unavailable(BACKEND, e.to_string())
}

impl MongoDBStore {
    /// Connects, checks the server answers, and sets up the owner indexes used by listing.
    pub async fn new(config: &MongoDBConfig) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB database '{}'", config.database);

        let mut client_options = ClientOptions::parse(&config.uri)
            .await
            .map_err(|e| StoreError::unavailable(BACKEND, format!("invalid URI: {}", e)))?;
        client_options.app_name = Some("Pomodoro-API".to_string());

        let client = Client::with_options(client_options).map_err(unavailable)?;
        let database = client.database(&config.database);

        database
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(unavailable)?;
        info!("MongoDB connection established successfully.");

        let store = Self { database };
        store.ensure_owner_index::<Todo>().await?;
        store.ensure_owner_index::<Session>().await?;
        Ok(store)
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }

    async fn ensure_owner_index<T: OwnedRecord>(&self) -> Result<(), StoreError> {
        let mut keys = Document::new();
        keys.insert(T::OWNER_FIELD, 1);
        let index = IndexModel::builder().keys(keys).build();
        self.collection(T::COLLECTION)
            .create_index(index, None)
            .await
            .map_err(|e| {
                StoreError::unavailable(
                    BACKEND,
                    format!("failed to create index on {}.{}: {}", T::COLLECTION, T::OWNER_FIELD, e),
                )
            })?;
        debug!("Owner index ready on '{}'", T::COLLECTION);
        Ok(())
    }

    /// Builds the stored BSON document: the JSON body plus `_id`.
    fn value_to_doc(collection: &str, id: &str, value: &Value) -> Result<Document, StoreError> {
        let mut document = to_document(value)
            .map_err(|e| StoreError::corrupt(collection, e.to_string()))?;
        document.insert("_id", id);
        Ok(document)
    }

    /// Converts a stored BSON document back to its JSON body, dropping `_id`.
    fn doc_to_value(mut document: Document) -> Value {
        document.remove("_id");
        Bson::Document(document).into_relaxed_extjson()
    }

    async fn collect(cursor: Cursor<Document>) -> Result<Vec<Value>, StoreError> {
        let documents: Vec<Document> = cursor.try_collect().await.map_err(unavailable)?;
        Ok(documents.into_iter().map(Self::doc_to_value).collect())
    }
}

#[async_trait]
impl DocumentStore for MongoDBStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>, StoreError> {
        let document = self
            .collection(collection)
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(unavailable)?;
        Ok(document.map(Self::doc_to_value))
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> Result<(), StoreError> {
        let document = Self::value_to_doc(collection, id, &document)?;
        let options = ReplaceOptions::builder().upsert(true).build();
        self.collection(collection)
            .replace_one(doc! { "_id": id }, document, options)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        self.collection(collection)
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(unavailable)?;
        Ok(())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> Result<Vec<Value>, StoreError> {
        let mut filter = Document::new();
        filter.insert(field, value);
        let cursor = self
            .collection(collection)
            .find(filter, None)
            .await
            .map_err(unavailable)?;
        Self::collect(cursor).await
    }

    async fn list_all(&self, collection: &str) -> Result<Vec<Value>, StoreError> {
        let cursor = self
            .collection(collection)
            .find(None, None)
            .await
            .map_err(unavailable)?;
        Self::collect(cursor).await
    }

    fn backend_name(&self) -> &'static str {
        BACKEND
    }
}
