//! Fetch Handler
//!
//! Per-request decision tree:
//! 1. non-GET requests pass through
//! 2. excluded paths pass through
//! 3. a cached response is returned as-is, without touching the network
//! 4. otherwise the network is tried; 200 same-origin responses are cached in
//!    the background, failures become an offline fallback
//!
//! The cache is shared by every client of the proxy, so responses tied to a
//! user (credentialed requests, `Set-Cookie`, `private`/`no-store`) are never
//! written.

use axum::http::Method;
use tracing::{debug, warn};

use super::OfflineWorker;
use crate::error::Result;
use crate::network::{FetchRequest, FetchResponse};
use crate::tasks::spawn_cache_write;

/// Why the handler declined to intervene.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassReason {
    NonGetMethod,
    /// Path starts with an exclusion prefix
    Excluded,
}

/// Where a response produced by the handler came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Cache,
    /// `write_scheduled` is true when a background cache write was spawned
    Network { write_scheduled: bool },
    /// Synthesized after the network failed
    Offline,
}

#[derive(Debug)]
pub enum FetchOutcome {
    /// The request must reach the network untouched by the cache
    Passthrough(PassReason),
    Respond {
        response: FetchResponse,
        source: ResponseSource,
    },
}

impl FetchOutcome {
    pub fn response(&self) -> Option<&FetchResponse> {
        match self {
            FetchOutcome::Respond { response, .. } => Some(response),
            FetchOutcome::Passthrough(_) => None,
        }
    }

    pub fn source(&self) -> Option<ResponseSource> {
        match self {
            FetchOutcome::Respond { source, .. } => Some(*source),
            FetchOutcome::Passthrough(_) => None,
        }
    }

    pub fn is_passthrough(&self) -> bool {
        matches!(self, FetchOutcome::Passthrough(_))
    }
}

impl OfflineWorker {
    /// Returns why `request` bypasses the cache, or `None` if it is handled.
    pub fn pass_reason(&self, request: &FetchRequest) -> Option<PassReason> {
        if request.method != Method::GET {
            return Some(PassReason::NonGetMethod);
        }
        if self.settings.exclusions.is_excluded(request.path()) {
            return Some(PassReason::Excluded);
        }
        None
    }

    // == Forward ==
    /// Sends a passthrough request to the network with no cache involvement.
    pub async fn forward(&self, request: &FetchRequest) -> Result<FetchResponse> {
        self.fetcher.fetch(request).await
    }

    // == Fetch ==
    /// Routes one request through cache-first-then-network.
    ///
    /// Never fails: a rejected network fetch is turned into the offline page
    /// for navigations and a plain `Offline` body otherwise.
    pub async fn handle_fetch(&self, request: &FetchRequest) -> FetchOutcome {
        if let Some(reason) = self.pass_reason(request) {
            debug!("Passing through {} {} ({:?})", request.method, request.url, reason);
            self.stats.record_passthrough();
            return FetchOutcome::Passthrough(reason);
        }

        let cached = {
            let storage = self.storage.read().await;
            storage
                .match_request(request)
                .map(|entry| entry.response.clone())
        };

        if let Some(response) = cached {
            debug!("Cache hit for {}", request.url);
            self.stats.record_hit();
            return FetchOutcome::Respond {
                response,
                source: ResponseSource::Cache,
            };
        }

        self.stats.record_miss();
        self.stats.record_network_fetch();

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                let private = request.carries_credentials() || response.is_private();
                let write_scheduled = response.is_cacheable() && !private;
                if write_scheduled {
                    spawn_cache_write(
                        self.storage.clone(),
                        self.stats.clone(),
                        self.cache_name().to_string(),
                        request.clone(),
                        response.clone(),
                    );
                } else if response.is_cacheable() {
                    debug!("Not caching user-specific response for {}", request.url);
                    self.stats.record_private_skip();
                } else {
                    debug!(
                        "Not caching {} (status {}, type {:?})",
                        request.url, response.status, response.response_type
                    );
                }

                FetchOutcome::Respond {
                    response,
                    source: ResponseSource::Network { write_scheduled },
                }
            }
            Err(e) => {
                warn!("Network fetch for {} failed: {}", request.url, e);
                self.stats.record_network_failure();
                self.stats.record_offline_fallback();

                let response = if request.mode.is_navigate() {
                    FetchResponse::offline_page()
                } else {
                    FetchResponse::offline_text()
                };

                FetchOutcome::Respond {
                    response,
                    source: ResponseSource::Offline,
                }
            }
        }
    }
}
