//! Health check endpoints.

use crate::state::AppState;
use axum::{
    Router,
    body::Body,
    response::{IntoResponse, Response},
    routing::get,
};

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

/// Liveness probe. Answers without touching the store or the verifier.
async fn health_check() -> impl IntoResponse {
    Response::new(Body::from("OK"))
}
