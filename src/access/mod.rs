//! Ownership-scoped access to the document store.
//!
//! Every read and write of a user's records goes through this module, which
//! pins the owner to the caller's verified identity.

pub mod owned;
pub mod settings;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::store::StoreError;

pub use owned::{AccessError, OwnedCollection};
pub use settings::SettingsAccess;

pub(crate) fn encode<T: Serialize>(collection: &str, record: &T) -> Result<Value, StoreError> {
    serde_json::to_value(record).map_err(|e| StoreError::corrupt(collection, e.to_string()))
}

pub(crate) fn decode<T: DeserializeOwned>(collection: &str, document: Value) -> Result<T, StoreError> {
    serde_json::from_value(document).map_err(|e| StoreError::corrupt(collection, e.to_string()))
}
