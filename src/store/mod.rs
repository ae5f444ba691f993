pub mod base;
pub mod memory_store;
pub mod mongodb_store;

// Re-export the primary store items so code outside can do
// "use crate::store::{DocumentStore, create_store};"
pub use base::{create_store, DocumentStore, StoreError};
pub use memory_store::MemoryStore;
