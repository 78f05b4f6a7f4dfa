//! Activate Handler
//!
//! Removes every cache generation except the current one.

use futures::future::join_all;
use serde::Serialize;
use tracing::{info, warn};

use super::{OfflineWorker, WorkerState};

/// Outcome of an activation.
#[derive(Debug, Clone, Serialize)]
pub struct ActivateReport {
    pub cache_name: String,
    /// Generations removed by this activation
    pub deleted: Vec<String>,
}

impl OfflineWorker {
    // == Activate ==
    /// Deletes all generations other than the current one.
    ///
    /// Deletions are issued together and awaited as a group. A deletion that
    /// finds its generation already gone is logged and does not stop the rest.
    pub async fn activate(&self) -> ActivateReport {
        self.set_state(WorkerState::Activating).await;

        let stale: Vec<String> = self
            .storage
            .read()
            .await
            .keys()
            .into_iter()
            .filter(|name| name != self.cache_name())
            .collect();

        let deletions = stale.iter().map(|name| async move {
            let removed = self.storage.write().await.delete(name);
            (name, removed)
        });

        let mut deleted = Vec::new();
        for (name, removed) in join_all(deletions).await {
            if removed {
                info!("Deleted stale cache generation {}", name);
                self.stats.record_generation_deleted();
                deleted.push(name.clone());
            } else {
                warn!("Cache generation {} was already gone", name);
            }
        }

        self.set_state(WorkerState::Activated).await;
        info!(
            "Activated {} ({} stale generations removed)",
            self.cache_name(),
            deleted.len()
        );

        ActivateReport {
            cache_name: self.cache_name().to_string(),
            deleted,
        }
    }
}
