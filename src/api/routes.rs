//! API Routes
//!
//! Configures the Axum router for the admin API.

use axum::{
    routing::{delete, get},
    Router,
};
use tower_http::trace::TraceLayer;

use super::handlers::{
    entries_handler, evict_handler, health_handler, purge_handler, stats_handler, AppState,
};

/// Creates the admin router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /stats` - Cache statistics
/// - `GET /entries` - List cached responses
/// - `DELETE /entries` - Purge the cache
/// - `DELETE /entry?url=<url>` - Evict one cached response
///
/// # Middleware
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .route("/entries", get(entries_handler).delete(purge_handler))
        .route("/entry", delete(evict_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
