//! Service banner and caller identity endpoints.

use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::models::{Identity, MaybeIdentity};
use crate::state::AppState;

/// Registers the banner and identity routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api", get(root))
        .route("/api/", get(root))
        .route("/api/me", get(me))
}

#[derive(Serialize)]
struct Banner {
    message: &'static str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    uid: Option<String>,
}

/// Service banner. Anonymous callers are welcome; a valid credential adds `uid`.
async fn root(MaybeIdentity(identity): MaybeIdentity) -> Json<Banner> {
    Json(Banner {
        message: "Pomodoro App API",
        status: "running",
        uid: identity.map(|identity| identity.id),
    })
}

async fn me(identity: Identity) -> Json<Identity> {
    Json(identity)
}
