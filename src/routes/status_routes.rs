//! Unauthenticated status check endpoints.

use axum::extract::State;
use axum::{routing::get, Json, Router};

use crate::access::{decode, encode};
use crate::models::status::STATUS_COLLECTION;
use crate::models::{StatusCheck, StatusCheckCreate};
use crate::state::AppState;
use crate::utils::http_helpers::{HTTPError, JsonBody};

/// Registers status check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/status", get(list_status_checks).post(create_status_check))
}

async fn create_status_check(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<StatusCheckCreate>,
) -> Result<Json<StatusCheck>, HTTPError> {
    let check = StatusCheck::from(input);
    let document = encode(STATUS_COLLECTION, &check)?;
    state.store.set(STATUS_COLLECTION, &check.id, document).await?;
    Ok(Json(check))
}

async fn list_status_checks(
    State(state): State<AppState>,
) -> Result<Json<Vec<StatusCheck>>, HTTPError> {
    let checks = state
        .store
        .list_all(STATUS_COLLECTION)
        .await?
        .into_iter()
        .map(|document| decode(STATUS_COLLECTION, document))
        .collect::<Result<Vec<StatusCheck>, _>>()?;
    Ok(Json(checks))
}
