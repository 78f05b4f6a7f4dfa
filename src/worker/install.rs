//! Install Handler
//!
//! Seeds the current generation with every manifest URL. All manifest
//! fetches must succeed before anything is written.

use futures::future::try_join_all;
use serde::Serialize;
use tracing::{error, info};
use url::Url;

use super::{OfflineWorker, WorkerState};
use crate::error::{CacheError, Result};
use crate::network::{FetchRequest, FetchResponse};

/// Outcome of a successful install.
#[derive(Debug, Clone, Serialize)]
pub struct InstallReport {
    pub cache_name: String,
    /// Cache keys written, in manifest order
    pub cached: Vec<String>,
}

impl OfflineWorker {
    // == Install ==
    /// Opens the current generation and stores a response for every manifest
    /// URL.
    ///
    /// Fails as a whole if any manifest fetch is rejected or answers with a
    /// non-2xx status. There is no retry; the worker becomes redundant.
    pub async fn install(&self) -> Result<InstallReport> {
        self.set_state(WorkerState::Installing).await;
        info!(
            "Installing cache generation {} ({} manifest entries)",
            self.cache_name(),
            self.manifest_urls.len()
        );

        let fetches = self
            .manifest_urls
            .iter()
            .map(|url| self.fetch_manifest_entry(url));

        let seeded = match try_join_all(fetches).await {
            Ok(seeded) => seeded,
            Err(e) => {
                error!("Install of {} failed: {}", self.cache_name(), e);
                self.set_state(WorkerState::Redundant).await;
                return Err(e);
            }
        };

        let mut cached = Vec::with_capacity(seeded.len());
        {
            let mut storage = self.storage.write().await;
            let generation = storage.open(self.cache_name());
            for (request, response) in seeded {
                let key = request.cache_key();
                generation.put(key.clone(), response)?;
                self.stats.record_write();
                cached.push(key);
            }
        }

        self.set_state(WorkerState::Installed).await;
        info!(
            "Opened cache {} with {} entries",
            self.cache_name(),
            cached.len()
        );

        Ok(InstallReport {
            cache_name: self.cache_name().to_string(),
            cached,
        })
    }

    async fn fetch_manifest_entry(&self, url: &Url) -> Result<(FetchRequest, FetchResponse)> {
        let result = self.try_fetch_manifest_entry(url).await;
        if result.is_err() {
            self.stats.record_manifest_failure();
        }
        result
    }

    async fn try_fetch_manifest_entry(&self, url: &Url) -> Result<(FetchRequest, FetchResponse)> {
        let request = FetchRequest::get(url.clone());
        self.stats.record_network_fetch();

        let response = self.fetcher.fetch(&request).await.map_err(|e| {
            self.stats.record_network_failure();
            CacheError::ManifestFetch {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;

        if !response.is_ok() {
            return Err(CacheError::ManifestFetch {
                url: url.to_string(),
                reason: format!("unexpected status {}", response.status),
            });
        }

        // Checked here so a large asset fails the install before any write.
        if response.body.len() > self.settings.max_entry_bytes {
            return Err(CacheError::ManifestFetch {
                url: url.to_string(),
                reason: format!(
                    "body of {} bytes exceeds limit of {} bytes",
                    response.body.len(),
                    self.settings.max_entry_bytes
                ),
            });
        }

        // Installed entries are replayed to every client.
        Ok((request, response.without_cookies()))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::*;
    use super::super::DEFAULT_CACHE_NAME;
    use super::*;
    use crate::network::ResponseType;
    use crate::worker::Manifest;
    use axum::http::{header, HeaderValue, StatusCode};

    #[tokio::test]
    async fn test_install_seeds_every_manifest_url() {
        let fetcher = ScriptedFetcher::new();
        let worker = worker(DEFAULT_CACHE_NAME, fetcher.clone());
        route_manifest(&fetcher, &worker);

        let report = worker.install().await.unwrap();
        assert_eq!(report.cached.len(), 7);
        assert_eq!(worker.state().await, WorkerState::Installed);

        let storage = worker.storage().read().await;
        let generation = storage.get(DEFAULT_CACHE_NAME).unwrap();
        assert_eq!(generation.len(), 7);
        for url in worker.manifest_urls() {
            assert!(generation.contains(url.as_str()), "missing {}", url);
        }
    }

    #[tokio::test]
    async fn test_install_fails_when_one_fetch_fails() {
        let fetcher = ScriptedFetcher::new();
        let worker = worker(DEFAULT_CACHE_NAME, fetcher.clone());
        // Route all but the last manifest entry.
        for url in &worker.manifest_urls()[..6] {
            fetcher.route(url.as_str(), ok("asset"));
        }

        let result = worker.install().await;
        assert!(matches!(result, Err(CacheError::ManifestFetch { .. })));
        assert_eq!(worker.state().await, WorkerState::Redundant);

        let storage = worker.storage().read().await;
        assert_eq!(storage.total_entries(), 0);

        let snapshot = worker.stats().snapshot();
        assert_eq!(snapshot.manifest_failures, 1);
        assert_eq!(snapshot.network_failures, 1);
    }

    #[tokio::test]
    async fn test_install_fails_on_error_status() {
        let fetcher = ScriptedFetcher::new();
        let worker = worker(DEFAULT_CACHE_NAME, fetcher.clone());
        route_manifest(&fetcher, &worker);
        fetcher.route(
            "https://cdn.jsdelivr.net/npm/chart.js",
            FetchResponse::new(StatusCode::NOT_FOUND, ResponseType::Cors, "missing"),
        );

        match worker.install().await {
            Err(CacheError::ManifestFetch { url, reason }) => {
                assert_eq!(url, "https://cdn.jsdelivr.net/npm/chart.js");
                assert!(reason.contains("404"));
            }
            other => panic!("expected manifest failure, got {:?}", other),
        }

        // An error status is a received response, not a network failure.
        let snapshot = worker.stats().snapshot();
        assert_eq!(snapshot.manifest_failures, 1);
        assert_eq!(snapshot.network_failures, 0);
        assert_eq!(worker.state().await, WorkerState::Redundant);
    }

    #[tokio::test]
    async fn test_install_accepts_cross_origin_assets() {
        let fetcher = ScriptedFetcher::new();
        let worker = worker(DEFAULT_CACHE_NAME, fetcher.clone());
        route_manifest(&fetcher, &worker);
        fetcher.route(
            "https://cdn.jsdelivr.net/npm/chart.js",
            FetchResponse::new(StatusCode::OK, ResponseType::Cors, "chart"),
        );

        let report = worker.install().await.unwrap();
        assert!(report
            .cached
            .contains(&"https://cdn.jsdelivr.net/npm/chart.js".to_string()));
    }

    #[tokio::test]
    async fn test_install_rejects_oversized_asset() {
        let fetcher = ScriptedFetcher::new();
        let worker = OfflineWorker::new(
            settings(DEFAULT_CACHE_NAME).with_max_entry_bytes(3),
            fetcher.clone(),
        )
        .unwrap();
        route_manifest(&fetcher, &worker);

        assert!(worker.install().await.is_err());
        assert_eq!(worker.storage().read().await.total_entries(), 0);
        assert!(worker.stats().snapshot().manifest_failures >= 1);
    }

    #[tokio::test]
    async fn test_install_custom_manifest() {
        let fetcher = ScriptedFetcher::new();
        let worker = OfflineWorker::new(
            settings("custom-v1").with_manifest(Manifest::new(["/", "/static/app.js"])),
            fetcher.clone(),
        )
        .unwrap();
        fetcher.route("http://app.test/", ok("home"));
        fetcher.route("http://app.test/static/app.js", ok("app"));

        let report = worker.install().await.unwrap();
        assert_eq!(
            report.cached,
            vec!["http://app.test/", "http://app.test/static/app.js"]
        );
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_install_drops_set_cookie() {
        let fetcher = ScriptedFetcher::new();
        let worker = worker(DEFAULT_CACHE_NAME, fetcher.clone());
        route_manifest(&fetcher, &worker);
        fetcher.route(
            "http://app.test/",
            ok("home").with_header(header::SET_COOKIE, HeaderValue::from_static("session=1")),
        );

        worker.install().await.unwrap();

        let storage = worker.storage().read().await;
        let entry = storage
            .get(DEFAULT_CACHE_NAME)
            .unwrap()
            .get("http://app.test/")
            .unwrap();
        assert!(entry.response.headers.get(header::SET_COOKIE).is_none());
        assert_eq!(entry.response.body_text(), "home");
    }
}
