//! Shared application state.
//!
//! Contains what request handlers need: identity resolution, the document
//! store and the metrics registry. Configuration is consumed at startup.

use crate::auth::Auth;
use crate::metrics::Metrics;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    /// Resolves the caller's identity from the bearer credential.
    pub auth: Arc<Auth>,
    /// Backing store for todos, sessions, settings and status checks.
    pub store: Arc<dyn DocumentStore>,
    pub metrics: Metrics,
}
