//! REST API for evaluating and optimizing sizings.
//!
//! Provides three endpoints:
//! - `GET /config`: the site configuration loaded at startup
//! - `POST /evaluate`: evaluate one sizing
//! - `POST /optimize`: grid-search a sizing space

mod handlers;
mod types;

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tracing::info;

use crate::model::types::Configuration;
use crate::optimizer::SearchSpace;

pub use types::{ErrorResponse, EvaluateRequest, OptimizeRequest, OptimizeResponse};

/// Immutable application state shared across all request handlers.
///
/// Requests may carry their own configuration; these are the fallbacks.
pub struct AppState {
    /// Site configuration used when a request omits one.
    pub config: Configuration,
    /// Search space used when an optimize request omits one.
    pub space: SearchSpace,
}

/// Builds the axum router with all API routes.
///
/// # Arguments
///
/// * `state` - Shared application state
///
/// # Returns
///
/// Configured `Router` ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/config", get(handlers::get_config))
        .route("/evaluate", post(handlers::post_evaluate))
        .route("/optimize", post(handlers::post_optimize))
        .with_state(state)
}

/// Binds to the given address and serves the API until the server stops.
///
/// # Arguments
///
/// * `state` - Shared application state
/// * `addr` - Socket address to bind to
///
/// # Errors
///
/// Returns an `io::Error` if the listener cannot bind or the server fails.
pub async fn serve(state: Arc<AppState>, addr: SocketAddr) -> io::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "API server listening");
    axum::serve(listener, app).await
}
