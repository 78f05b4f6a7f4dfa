//! Offline Worker Module
//!
//! The offline cache interceptor: install seeds the current generation,
//! activate drops every other generation, fetch routes requests through
//! cache-first-then-network, and sync runs deferred work by tag.
//!
//! Every handler is a plain async method so the decision logic is testable
//! without an HTTP server; the axum layer in [`crate::api`] is a thin adapter.

mod activate;
mod install;
mod intercept;
mod manifest;
mod sync;


use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use url::Url;

use crate::cache::{CacheStats, CacheStorage};
use crate::config::{Config, DEFAULT_MAX_ENTRY_BYTES};
use crate::error::{CacheError, Result};
use crate::network::Fetcher;

pub use activate::ActivateReport;
pub use install::InstallReport;
pub use intercept::{FetchOutcome, PassReason, ResponseSource};
pub use manifest::{ExclusionSet, Manifest, DEFAULT_MANIFEST, EXCLUDED_PREFIXES};
pub use sync::{SyncOutcome, HEALTH_DATA_SYNC_TAG};

/// Name of the current cache generation unless configured otherwise.
pub const DEFAULT_CACHE_NAME: &str = "rwana-health-app-v1";

// == Worker State ==
/// Lifecycle position of the worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkerState {
    /// Constructed, nothing seeded yet
    Parsed,
    Installing,
    Installed,
    Activating,
    Activated,
    /// Install failed
    Redundant,
}

impl fmt::Display for WorkerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkerState::Parsed => "parsed",
            WorkerState::Installing => "installing",
            WorkerState::Installed => "installed",
            WorkerState::Activating => "activating",
            WorkerState::Activated => "activated",
            WorkerState::Redundant => "redundant",
        };
        f.write_str(name)
    }
}

// == Worker Settings ==
/// Everything the worker needs that is fixed for its lifetime.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    /// Current cache generation
    pub cache_name: String,
    /// Application origin; relative URLs resolve against it
    pub origin: Url,
    pub manifest: Manifest,
    pub exclusions: ExclusionSet,
    /// Largest response body stored as an entry
    pub max_entry_bytes: usize,
}

impl WorkerSettings {
    /// Settings with the default manifest, exclusions and entry limit.
    pub fn new(cache_name: impl Into<String>, origin: Url) -> Self {
        Self {
            cache_name: cache_name.into(),
            origin,
            manifest: Manifest::default(),
            exclusions: ExclusionSet::default(),
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let origin = Url::parse(&config.upstream_url).map_err(|e| {
            CacheError::Config(format!(
                "Invalid UPSTREAM_URL '{}': {}",
                config.upstream_url, e
            ))
        })?;

        Ok(Self::new(config.cache_name.clone(), origin)
            .with_max_entry_bytes(config.max_entry_bytes))
    }

    pub fn with_manifest(mut self, manifest: Manifest) -> Self {
        self.manifest = manifest;
        self
    }

    pub fn with_exclusions(mut self, exclusions: ExclusionSet) -> Self {
        self.exclusions = exclusions;
        self
    }

    pub fn with_max_entry_bytes(mut self, max_entry_bytes: usize) -> Self {
        self.max_entry_bytes = max_entry_bytes;
        self
    }
}

// == Offline Worker ==
pub struct OfflineWorker {
    settings: WorkerSettings,
    /// Manifest resolved against the origin, in manifest order
    manifest_urls: Vec<Url>,
    storage: Arc<RwLock<CacheStorage>>,
    fetcher: Arc<dyn Fetcher>,
    stats: Arc<CacheStats>,
    state: RwLock<WorkerState>,
}

impl OfflineWorker {
    // == Constructor ==
    /// Creates a worker with empty storage.
    pub fn new(settings: WorkerSettings, fetcher: Arc<dyn Fetcher>) -> Result<Self> {
        let storage = CacheStorage::new(settings.max_entry_bytes);
        Self::with_storage(settings, fetcher, Arc::new(RwLock::new(storage)))
    }

    /// Creates a worker over existing storage, e.g. one shared with an older
    /// worker version.
    pub fn with_storage(
        settings: WorkerSettings,
        fetcher: Arc<dyn Fetcher>,
        storage: Arc<RwLock<CacheStorage>>,
    ) -> Result<Self> {
        let manifest_urls = settings.manifest.resolve(&settings.origin)?;
        Ok(Self {
            settings,
            manifest_urls,
            storage,
            fetcher,
            stats: Arc::new(CacheStats::new()),
            state: RwLock::new(WorkerState::Parsed),
        })
    }

    pub fn cache_name(&self) -> &str {
        &self.settings.cache_name
    }

    pub fn settings(&self) -> &WorkerSettings {
        &self.settings
    }

    pub fn manifest_urls(&self) -> &[Url] {
        &self.manifest_urls
    }

    pub fn storage(&self) -> &Arc<RwLock<CacheStorage>> {
        &self.storage
    }

    pub fn stats(&self) -> &Arc<CacheStats> {
        &self.stats
    }

    pub async fn state(&self) -> WorkerState {
        *self.state.read().await
    }

    async fn set_state(&self, state: WorkerState) {
        *self.state.write().await = state;
    }

    /// Absolute URL for a path (and query) on the application origin.
    ///
    /// The path is set rather than joined so a `//host/...` path cannot
    /// escape the origin.
    pub fn resolve(&self, path_and_query: &str) -> Url {
        let (path, query) = match path_and_query.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (path_and_query, None),
        };

        let mut url = self.settings.origin.clone();
        url.set_path(path);
        url.set_query(query);
        url
    }

    /// Parses an absolute-form request target.
    ///
    /// Only the application origin and origins named by the manifest are
    /// served, so the proxy cannot be pointed at arbitrary hosts.
    pub fn absolute_url(&self, target: &str) -> Result<Url> {
        let url = Url::parse(target).map_err(|e| {
            CacheError::InvalidRequest(format!("Invalid request target '{}': {}", target, e))
        })?;

        let origin = url.origin();
        let known = origin == self.settings.origin.origin()
            || self.manifest_urls.iter().any(|m| m.origin() == origin);
        if !known {
            return Err(CacheError::InvalidRequest(format!(
                "Origin of '{}' is not served by this proxy",
                url
            )));
        }

        Ok(url)
    }
}

impl fmt::Debug for OfflineWorker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OfflineWorker")
            .field("settings", &self.settings)
            .field("manifest_urls", &self.manifest_urls)
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    #[test]
    fn test_settings_from_config() {
        let config = Config {
            upstream_url: "http://localhost:8000".to_string(),
            cache_name: "custom-v2".to_string(),
            max_entry_bytes: 42,
            ..Config::default()
        };

        let settings = WorkerSettings::from_config(&config).unwrap();
        assert_eq!(settings.cache_name, "custom-v2");
        assert_eq!(settings.origin.as_str(), "http://localhost:8000/");
        assert_eq!(settings.max_entry_bytes, 42);
        assert_eq!(settings.manifest.len(), 7);
    }

    #[test]
    fn test_settings_from_config_rejects_bad_origin() {
        let config = Config {
            upstream_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            WorkerSettings::from_config(&config),
            Err(CacheError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_new_worker_is_parsed() {
        let worker = worker(DEFAULT_CACHE_NAME, ScriptedFetcher::new());
        assert_eq!(worker.state().await, WorkerState::Parsed);
        assert_eq!(worker.manifest_urls().len(), 7);
        assert_eq!(worker.cache_name(), "rwana-health-app-v1");
    }

    #[test]
    fn test_resolve_path_and_query() {
        let worker = worker(DEFAULT_CACHE_NAME, ScriptedFetcher::new());
        let url = worker.resolve("/get_history?limit=5");
        assert_eq!(url.as_str(), "http://app.test/get_history?limit=5");
    }

    #[test]
    fn test_resolve_stays_on_origin() {
        let worker = worker(DEFAULT_CACHE_NAME, ScriptedFetcher::new());
        let url = worker.resolve("//elsewhere.test/x");
        assert_eq!(url.host_str(), Some("app.test"));
    }

    #[test]
    fn test_absolute_url_allows_known_origins() {
        let worker = worker(DEFAULT_CACHE_NAME, ScriptedFetcher::new());

        let cdn = worker
            .absolute_url("https://cdn.jsdelivr.net/npm/chart.js")
            .unwrap();
        assert_eq!(cdn.as_str(), "https://cdn.jsdelivr.net/npm/chart.js");

        let app = worker.absolute_url("http://app.test/get_history?x=1").unwrap();
        assert_eq!(app.query(), Some("x=1"));
    }

    #[test]
    fn test_absolute_url_rejects_unknown_origin() {
        let worker = worker(DEFAULT_CACHE_NAME, ScriptedFetcher::new());
        for target in [
            "http://169.254.169.254/latest/meta-data",
            "http://cdn.jsdelivr.net/npm/chart.js",
            "not a url",
        ] {
            assert!(matches!(
                worker.absolute_url(target),
                Err(CacheError::InvalidRequest(_))
            ));
        }
    }

    #[test]
    fn test_worker_state_display() {
        assert_eq!(WorkerState::Activated.to_string(), "activated");
        assert_eq!(WorkerState::Redundant.to_string(), "redundant");
    }
}
