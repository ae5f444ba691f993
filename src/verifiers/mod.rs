pub mod base;
pub mod jwt_verifier;
pub mod plain_verifier;

// Re-export from base.rs so we can do "use crate::verifiers::*;"
pub use base::{create_verifier, Rejection, TokenVerifier, VerifierConfig};
