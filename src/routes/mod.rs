//! HTTP route definitions and handlers.
//!
//! The pomodoro API lives under `/api`; health and metrics sit at the root.

mod health_routes;
mod metrics;
mod service_routes;
mod session_routes;
mod settings_routes;
mod status_routes;
mod todo_routes;

use crate::state::AppState;
use axum::Router;

/// Creates the application router with all configured routes.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(service_routes::routes())
        .merge(status_routes::routes())
        .merge(session_routes::routes())
        .merge(settings_routes::routes())
        .merge(todo_routes::routes())
        .merge(health_routes::routes())
        .merge(metrics::routes())
        .with_state(state)
}
