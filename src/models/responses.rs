//! Response DTOs for the worker admin API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

use crate::cache::{CacheGeneration, StatsSnapshot};
use crate::worker::{SyncOutcome, WorkerState};

/// Response body for POST /_worker/sync
#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    pub tag: String,
    /// True when the tag ran a task
    pub handled: bool,
}

impl SyncResponse {
    pub fn new(tag: impl Into<String>, outcome: SyncOutcome) -> Self {
        Self {
            tag: tag.into(),
            handled: outcome == SyncOutcome::Completed,
        }
    }
}

/// Summary of one cache generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerationInfo {
    pub name: String,
    pub entries: usize,
    /// Creation time in ISO 8601 format
    pub created_at: String,
}

impl From<&CacheGeneration> for GenerationInfo {
    fn from(generation: &CacheGeneration) -> Self {
        Self {
            name: generation.name().to_string(),
            entries: generation.len(),
            created_at: generation.created_at().to_rfc3339(),
        }
    }
}

/// Response body for GET /_worker/status
#[derive(Debug, Clone, Serialize)]
pub struct StatusResponse {
    /// Current cache generation
    pub cache_name: String,
    pub state: WorkerState,
    /// Generations in creation order
    pub generations: Vec<GenerationInfo>,
    pub stats: StatsSnapshot,
}

/// Response body for the health endpoint (GET /_worker/health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}
