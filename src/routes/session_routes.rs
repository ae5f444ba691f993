//! Pomodoro session endpoints, scoped to the caller.

use axum::extract::{Path, State};
use axum::{
    routing::{get, put},
    Json, Router,
};
use serde_json::{json, Value};

use crate::access::OwnedCollection;
use crate::models::{Identity, Session};
use crate::state::AppState;
use crate::utils::http_helpers::{HTTPError, JsonBody};

/// Registers session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/sessions", get(list_sessions).post(create_session))
        .route(
            "/api/sessions/{session_id}",
            put(update_session).delete(delete_session),
        )
}

async fn create_session(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(session): JsonBody<Session>,
) -> Result<Json<Session>, HTTPError> {
    let sessions = OwnedCollection::<Session>::new(state.store.as_ref(), &identity);
    Ok(Json(sessions.create(session).await?))
}

async fn list_sessions(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Vec<Session>>, HTTPError> {
    let sessions = OwnedCollection::<Session>::new(state.store.as_ref(), &identity);
    Ok(Json(sessions.list().await?))
}

async fn update_session(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<String>,
    JsonBody(session): JsonBody<Session>,
) -> Result<Json<Session>, HTTPError> {
    let sessions = OwnedCollection::<Session>::new(state.store.as_ref(), &identity);
    Ok(Json(sessions.update(&session_id, session).await?))
}

async fn delete_session(
    identity: Identity,
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Result<Json<Value>, HTTPError> {
    OwnedCollection::<Session>::new(state.store.as_ref(), &identity)
        .delete(&session_id)
        .await?;
    Ok(Json(json!({ "message": "Session deleted successfully" })))
}
