//! Error types for the offline cache proxy
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the offline cache proxy.
#[derive(Error, Debug)]
pub enum CacheError {
    /// The network request was rejected (offline, DNS failure, refused connection)
    #[error("Network error: {0}")]
    Network(String),

    /// A manifest URL could not be seeded during install
    #[error("Failed to cache manifest entry {url}: {reason}")]
    ManifestFetch { url: String, reason: String },

    /// A response body exceeds the per-entry storage limit
    #[error("Entry too large for {key}: {size} bytes exceeds limit of {limit} bytes")]
    EntryTooLarge {
        key: String,
        size: usize,
        limit: usize,
    },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Invalid configuration value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for CacheError {
    fn into_response(self) -> Response {
        let status = match &self {
            CacheError::Network(_) | CacheError::ManifestFetch { .. } => StatusCode::BAD_GATEWAY,
            CacheError::EntryTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            CacheError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            CacheError::Config(_) | CacheError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the offline cache proxy.
pub type Result<T> = std::result::Result<T, CacheError>;
