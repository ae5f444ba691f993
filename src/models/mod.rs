pub mod identity;
pub mod session;
pub mod settings;
pub mod status;
pub mod todo;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use identity::{Identity, MaybeIdentity};
pub use session::{Session, SessionKind};
pub use settings::{Preset, Settings};
pub use status::{StatusCheck, StatusCheckCreate};
pub use todo::Todo;

/// A persisted entity that belongs to exactly one identity.
///
/// The owner is stored under `OWNER_FIELD` so that listing can use a single
/// equality filter on the store.
pub trait OwnedRecord: Serialize + DeserializeOwned + Send + Sync {
    /// Collection the records live in.
    const COLLECTION: &'static str;
    /// Name used in client-facing "not found" messages.
    const RESOURCE: &'static str;
    const OWNER_FIELD: &'static str = "user_id";

    fn id(&self) -> &str;
    fn set_id(&mut self, id: String);
    fn owner_id(&self) -> &str;
    fn set_owner_id(&mut self, owner_id: String);
}

pub(crate) fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
