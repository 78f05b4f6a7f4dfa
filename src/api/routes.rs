//! API Routes
//!
//! Configures the Axum router: admin endpoints under `/_worker`, everything
//! else through the interceptor.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    activate_handler, health_handler, install_handler, intercept_handler, status_handler,
    sync_handler, AppState,
};

/// Creates the main router.
///
/// # Endpoints
/// - `GET /_worker/health` - Health check
/// - `GET /_worker/status` - Generations, lifecycle state and counters
/// - `POST /_worker/install` - Seed the current generation
/// - `POST /_worker/activate` - Delete stale generations
/// - `POST /_worker/sync` - Run deferred work for a tag
/// - anything else - intercepted and proxied to the application
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/_worker/health", get(health_handler))
        .route("/_worker/status", get(status_handler))
        .route("/_worker/install", post(install_handler))
        .route("/_worker/activate", post(activate_handler))
        .route("/_worker/sync", post(sync_handler))
        .fallback(intercept_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
