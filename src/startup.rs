//! Application startup and server initialization.
//!
//! Builds the document store and the identity resolver from the
//! configuration, injects them into `AppState` and serves the router.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::auth::Auth;
use crate::config::ConfigV1;
use crate::metrics::Metrics;
use crate::routes;
use crate::state::AppState;
use crate::store::create_store;

/// Initializes and runs the application server until ctrl-c.
///
/// # Errors
///
/// Returns an error if the store cannot be reached, the server fails to bind
/// to the configured address, or serving fails.
pub async fn run(config: Arc<ConfigV1>) -> Result<(), Box<dyn std::error::Error>> {
    let store = create_store(&config.store).await?;
    info!("Using '{}' document store", store.backend_name());
    let auth = Arc::new(Auth::from_config(&config.verifier));

    let state = AppState {
        auth,
        store,
        metrics: Metrics::new(),
    };

    let app = routes::create_router(state);

    let listener = TcpListener::bind(&config.bind_address).await?;
    info!("Starting server on {}", config.bind_address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
