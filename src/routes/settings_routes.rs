//! Per-user timer settings.

use axum::extract::State;
use axum::{routing::get, Json, Router};

use crate::access::SettingsAccess;
use crate::models::{Identity, Settings};
use crate::state::AppState;
use crate::utils::http_helpers::{HTTPError, JsonBody};

/// Registers settings routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/settings", get(get_settings).post(save_settings))
}

/// Returns the caller's settings, storing the defaults on first access.
async fn get_settings(
    identity: Identity,
    State(state): State<AppState>,
) -> Result<Json<Settings>, HTTPError> {
    let settings = SettingsAccess::new(state.store.as_ref(), &identity)
        .get_or_create_default()
        .await?;
    Ok(Json(settings))
}

async fn save_settings(
    identity: Identity,
    State(state): State<AppState>,
    JsonBody(settings): JsonBody<Settings>,
) -> Result<Json<Settings>, HTTPError> {
    let saved = SettingsAccess::new(state.store.as_ref(), &identity)
        .save(settings)
        .await?;
    Ok(Json(saved))
}
