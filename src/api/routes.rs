//! API Routes
//!
//! Configures the Axum router with all cache admin endpoints.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    clear_handler, delete_handler, get_handler, health_handler, invalidate_deps_handler,
    invalidate_handler, set_handler, stats_handler, AppState,
};
use crate::cache::Clock;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `PUT /set` - Store a JSON value, optionally with dependencies
/// - `GET /get/:key` - Retrieve a value by key
/// - `DELETE /del/:key` - Delete a key
/// - `POST /invalidate` - Remove keys matching a pattern
/// - `POST /invalidate-deps` - Remove keys linked to a dependency
/// - `GET /stats` - Get cache statistics
/// - `POST /clear` - Drop every entry and reset statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests
pub fn create_router<C: Clock>(state: AppState<C>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/set", put(set_handler::<C>))
        .route("/get/:key", get(get_handler::<C>))
        .route("/del/:key", delete(delete_handler::<C>))
        .route("/invalidate", post(invalidate_handler::<C>))
        .route("/invalidate-deps", post(invalidate_deps_handler::<C>))
        .route("/stats", get(stats_handler::<C>))
        .route("/clear", post(clear_handler::<C>))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
