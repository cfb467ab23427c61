//! HTTP server
//!
//! Builds the axum router around an [`Extract`] implementation and serves it
//! until Ctrl-C.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::cors::{cors_layer, CorsConfig};
use crate::error::Result;
use crate::handlers::{extract_handler, health_handler, status_handler, AppState};
use crate::orchestrator::Extract;

/// Build the application router.
///
/// # Routes
/// - `POST /extract` - extract one URL
/// - `GET /health` - liveness check
/// - `GET /status` - counters and latency
pub fn router(state: AppState, cors: CorsLayer) -> Router {
    Router::new()
        .route("/extract", post(extract_handler))
        .route("/health", get(health_handler))
        .route("/status", get(status_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

/// Bind `config.bind_address()` and serve until Ctrl-C.
pub async fn serve(config: ServerConfig, extractor: Arc<dyn Extract>) -> Result<()> {
    let cors = cors_layer(&CorsConfig::new().with_origins(config.cors_origins.iter().cloned()))?;
    let app = router(AppState::new(extractor), cors);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Listening on http://{}", listener.local_addr()?);
    info!("Allowed CORS origins: {}", config.cors_origins.join(", "));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}
