//! Sync Handler
//!
//! Deferred work triggered by a background sync tag.

use serde::Serialize;
use tracing::{debug, info};

use super::OfflineWorker;

/// The only tag that triggers deferred work.
pub const HEALTH_DATA_SYNC_TAG: &str = "sync-health-data";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncOutcome {
    /// The tag was recognized and its task ran to completion
    Completed,
    /// Unknown tag, nothing ran
    Ignored,
}

impl OfflineWorker {
    // == Sync ==
    /// Runs the task registered for `tag` and waits for it to settle.
    pub async fn handle_sync(&self, tag: &str) -> SyncOutcome {
        if tag != HEALTH_DATA_SYNC_TAG {
            debug!("Ignoring sync tag {}", tag);
            return SyncOutcome::Ignored;
        }

        sync_health_data().await;
        SyncOutcome::Completed
    }
}

// TODO: replay health-tracking submissions queued while offline once the
// backend exposes an idempotent upload endpoint.
async fn sync_health_data() {
    info!("Syncing health data after being offline");
}
