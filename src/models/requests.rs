//! Request DTOs for the worker admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for POST /_worker/sync
#[derive(Debug, Clone, Deserialize)]
pub struct SyncRequest {
    /// Sync tag, e.g. `sync-health-data`
    pub tag: String,
}

impl SyncRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.tag.trim().is_empty() {
            return Some("Tag cannot be empty".to_string());
        }
        None
    }
}
