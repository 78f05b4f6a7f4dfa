//! Background Cache Write
//!
//! Stores a network response into the current generation without holding up
//! the response it was cloned from.

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::cache::{CacheStats, CacheStorage};
use crate::network::{FetchRequest, FetchResponse};

/// Spawns a detached task that writes `response` for `request` into the
/// `cache_name` generation.
///
/// Nobody awaits the returned handle on the request path. A failed write is
/// reported through `tracing` and the `write_failures` counter; the response
/// already handed to the caller is unaffected.
///
/// # Example
/// ```ignore
/// let handle = spawn_cache_write(storage.clone(), stats.clone(), "app-v1".into(), request, response.clone());
/// // Return `response` immediately; `handle` may be dropped.
/// ```
pub fn spawn_cache_write(
    storage: Arc<RwLock<CacheStorage>>,
    stats: Arc<CacheStats>,
    cache_name: String,
    request: FetchRequest,
    response: FetchResponse,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let key = request.cache_key();
        let result = {
            let mut storage_guard = storage.write().await;
            storage_guard.put(&cache_name, &request, response)
        };

        match result {
            Ok(()) => {
                stats.record_write();
                debug!("Cached {} in {}", key, cache_name);
            }
            Err(e) => {
                stats.record_write_failure();
                warn!("Background cache write for {} failed: {}", key, e);
            }
        }
    })
}
