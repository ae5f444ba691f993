use std::marker::PhantomData;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::{decode, encode};
use crate::models::{new_record_id, Identity, OwnedRecord};
use crate::store::{DocumentStore, StoreError};

#[derive(Debug, Error)]
pub enum AccessError {
    /// The record does not exist or belongs to someone else. Both cases are
    /// reported the same way.
    #[error("{resource} not found")]
    NotFound { resource: &'static str },
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The records of type `T` visible to one identity.
pub struct OwnedCollection<'a, T> {
    store: &'a dyn DocumentStore,
    identity: &'a Identity,
    _record: PhantomData<T>,
}

impl<'a, T: OwnedRecord> OwnedCollection<'a, T> {
    pub fn new(store: &'a dyn DocumentStore, identity: &'a Identity) -> Self {
        OwnedCollection {
            store,
            identity,
            _record: PhantomData,
        }
    }

    fn not_found() -> AccessError {
        AccessError::NotFound {
            resource: T::RESOURCE,
        }
    }

    /// Stores `record` as a new record owned by the caller. The id and owner it
    /// arrived with are both replaced, so a create can never overwrite an
    /// existing record.
    pub async fn create(&self, mut record: T) -> Result<T, AccessError> {
        let id = new_record_id();
        record.set_id(id.clone());
        record.set_owner_id(self.identity.id.clone());
        self.store
            .set(T::COLLECTION, &id, encode(T::COLLECTION, &record)?)
            .await?;
        debug!("Created {} '{}' for uid '{}'", T::RESOURCE, id, self.identity.id);
        Ok(record)
    }

    pub async fn list(&self) -> Result<Vec<T>, AccessError> {
        let documents = self
            .store
            .find_by_field(T::COLLECTION, T::OWNER_FIELD, &self.identity.id)
            .await?;
        let records = documents
            .into_iter()
            .map(|document| decode(T::COLLECTION, document))
            .collect::<Result<Vec<T>, StoreError>>()?;
        Ok(records)
    }

    /// Replaces the caller's record `record_id`. The stored id and owner always
    /// come from the path and the identity, never from the body.
    pub async fn update(&self, record_id: &str, mut record: T) -> Result<T, AccessError> {
        self.fetch_owned(record_id).await?;
        record.set_id(record_id.to_string());
        record.set_owner_id(self.identity.id.clone());
        self.store
            .set(T::COLLECTION, record_id, encode(T::COLLECTION, &record)?)
            .await?;
        Ok(record)
    }

    pub async fn delete(&self, record_id: &str) -> Result<(), AccessError> {
        self.fetch_owned(record_id).await?;
        self.store.delete(T::COLLECTION, record_id).await?;
        debug!("Deleted {} '{}' for uid '{}'", T::RESOURCE, record_id, self.identity.id);
        Ok(())
    }

    /// Loads `record_id` if it exists and is owned by the caller.
    pub async fn fetch_owned(&self, record_id: &str) -> Result<T, AccessError> {
        let document = self
            .store
            .get(T::COLLECTION, record_id)
            .await?
            .ok_or_else(Self::not_found)?;

        // Checked on the raw document so a foreign record is never decoded.
        let owner = document.get(T::OWNER_FIELD).and_then(Value::as_str);
        if owner != Some(self.identity.id.as_str()) {
            debug!(
                "uid '{}' asked for {} '{}' it does not own",
                self.identity.id,
                T::RESOURCE,
                record_id
            );
            return Err(Self::not_found());
        }

        Ok(decode(T::COLLECTION, document)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Session, SessionKind, Todo};
    use crate::store::MemoryStore;
    use async_trait::async_trait;
    use chrono::Utc;

    fn identity(id: &str) -> Identity {
        Identity::new(id, None, None, None)
    }

    #[tokio::test]
    async fn test_create_overrides_client_owner() {
        let store = MemoryStore::new();
        let u1 = identity("u1");
        let todos = OwnedCollection::<Todo>::new(&store, &u1);

        let mut todo = Todo::new("Write report");
        todo.owner_id = "someone-else".to_string();
        let created = todos.create(todo).await.expect("create should succeed");

        assert_eq!(created.owner_id, "u1");
        let listed = todos.list().await.expect("list should succeed");
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_create_ignores_client_id_of_existing_record() {
        let store = MemoryStore::new();
        let (u1, u2) = (identity("u1"), identity("u2"));
        let todos_u1 = OwnedCollection::<Todo>::new(&store, &u1);
        let original = todos_u1.create(Todo::new("Mine")).await.unwrap();

        let mut stolen = Todo::new("stolen");
        stolen.id = original.id.clone();
        let created = OwnedCollection::<Todo>::new(&store, &u2)
            .create(stolen)
            .await
            .unwrap();

        assert_ne!(created.id, original.id);
        assert_eq!(todos_u1.list().await.unwrap(), vec![original]);
        assert_eq!(store.count(Todo::COLLECTION).await, 2);
    }

    #[tokio::test]
    async fn test_new_todo_is_private_to_its_owner() {
        let store = MemoryStore::new();
        let (u1, u2) = (identity("u1"), identity("u2"));
        let todos_u1 = OwnedCollection::<Todo>::new(&store, &u1);
        let todos_u2 = OwnedCollection::<Todo>::new(&store, &u2);

        let created = todos_u1.create(Todo::new("Write report")).await.unwrap();

        let listed = todos_u1.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].owner_id, "u1");
        assert!(!listed[0].completed);
        assert_eq!(listed[0].pomodoros_completed, 0);

        assert!(todos_u2.list().await.unwrap().is_empty());

        let mut hijack = Todo::new("Mine now");
        hijack.completed = true;
        let res = todos_u2.update(&created.id, hijack).await;
        assert!(matches!(res, Err(AccessError::NotFound { resource: "Todo" })));
    }

    #[tokio::test]
    async fn test_foreign_delete_is_not_found_and_leaves_record() {
        let store = MemoryStore::new();
        let (u1, u2) = (identity("u1"), identity("u2"));
        let created = OwnedCollection::<Todo>::new(&store, &u1)
            .create(Todo::new("Keep me"))
            .await
            .unwrap();

        let res = OwnedCollection::<Todo>::new(&store, &u2)
            .delete(&created.id)
            .await;
        assert!(matches!(res, Err(AccessError::NotFound { .. })));
        assert_eq!(store.count(Todo::COLLECTION).await, 1);
    }

    #[tokio::test]
    async fn test_missing_and_foreign_records_fail_identically() {
        let store = MemoryStore::new();
        let (u1, u2) = (identity("u1"), identity("u2"));
        let created = OwnedCollection::<Todo>::new(&store, &u1)
            .create(Todo::new("Hidden"))
            .await
            .unwrap();
        let todos_u2 = OwnedCollection::<Todo>::new(&store, &u2);

        let foreign = todos_u2.fetch_owned(&created.id).await.unwrap_err();
        let missing = todos_u2.fetch_owned("does-not-exist").await.unwrap_err();
        assert_eq!(foreign.to_string(), missing.to_string());
    }

    #[tokio::test]
    async fn test_update_pins_id_and_owner() {
        let store = MemoryStore::new();
        let u1 = identity("u1");
        let todos = OwnedCollection::<Todo>::new(&store, &u1);
        let created = todos.create(Todo::new("Draft")).await.unwrap();

        let mut body = Todo::new("Draft v2");
        body.id = "other-id".to_string();
        body.owner_id = "u2".to_string();
        body.completed = true;
        let updated = todos.update(&created.id, body).await.unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.owner_id, "u1");
        let listed = todos.list().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Draft v2");
        assert!(listed[0].completed);
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let store = MemoryStore::new();
        let u1 = identity("u1");
        let sessions = OwnedCollection::<Session>::new(&store, &u1);
        let created = sessions
            .create(Session {
                id: "s1".to_string(),
                owner_id: String::new(),
                date: "2024-05-01".to_string(),
                duration: 25,
                kind: SessionKind::Work,
                preset: "classic".to_string(),
                timestamp: Utc::now(),
            })
            .await
            .unwrap();

        sessions.delete(&created.id).await.expect("owner may delete");
        assert!(sessions.list().await.unwrap().is_empty());
        assert!(matches!(
            sessions.delete(&created.id).await,
            Err(AccessError::NotFound { resource: "Session" })
        ));
    }

    struct DownStore;

    #[async_trait]
    impl DocumentStore for DownStore {
        async fn get(&self, _c: &str, _id: &str) -> Result<Option<Value>, StoreError> {
            Err(StoreError::unavailable("down", "connection refused"))
        }
        async fn set(&self, _c: &str, _id: &str, _d: Value) -> Result<(), StoreError> {
            Err(StoreError::unavailable("down", "connection refused"))
        }
        async fn delete(&self, _c: &str, _id: &str) -> Result<(), StoreError> {
            Err(StoreError::unavailable("down", "connection refused"))
        }
        async fn find_by_field(&self, _c: &str, _f: &str, _v: &str) -> Result<Vec<Value>, StoreError> {
            Err(StoreError::unavailable("down", "connection refused"))
        }
        async fn list_all(&self, _c: &str) -> Result<Vec<Value>, StoreError> {
            Err(StoreError::unavailable("down", "connection refused"))
        }
        fn backend_name(&self) -> &'static str {
            "down"
        }
    }

    #[tokio::test]
    async fn test_store_failures_propagate() {
        let u1 = identity("u1");
        let todos = OwnedCollection::<Todo>::new(&DownStore, &u1);

        assert!(matches!(
            todos.list().await,
            Err(AccessError::Store(StoreError::Unavailable { .. }))
        ));
        assert!(matches!(
            todos.update("t1", Todo::new("x")).await,
            Err(AccessError::Store(StoreError::Unavailable { .. }))
        ));
    }
}
