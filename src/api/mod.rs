//! API Module
//!
//! HTTP handlers and routing for the offline cache proxy.
//!
//! # Endpoints
//! - `GET /_worker/health` - Health check endpoint
//! - `GET /_worker/status` - Worker status and counters
//! - `POST /_worker/install` - Run the install handler
//! - `POST /_worker/activate` - Run the activate handler
//! - `POST /_worker/sync` - Run the sync handler for a tag
//! - everything else - fetch handler

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
