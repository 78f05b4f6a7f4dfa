//! Manifest and Exclusions
//!
//! The fixed list of resources seeded at install, and the live endpoints that
//! must never touch the cache.

use url::Url;

use crate::error::{CacheError, Result};

/// Resources pre-populated into the current generation at install.
pub const DEFAULT_MANIFEST: [&str; 7] = [
    "/",
    "/static/service-worker.js",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0-alpha1/dist/css/bootstrap.min.css",
    "https://cdn.jsdelivr.net/npm/bootstrap-icons@1.10.5/font/bootstrap-icons.css",
    "https://cdn.jsdelivr.net/npm/bootstrap@5.3.0-alpha1/dist/js/bootstrap.bundle.min.js",
    "https://cdn.jsdelivr.net/npm/recordrtc/RecordRTC.min.js",
    "https://cdn.jsdelivr.net/npm/chart.js",
];

/// Stateful backend endpoints that bypass the cache entirely.
pub const EXCLUDED_PREFIXES: [&str; 3] = ["/process_text", "/process_audio", "/send_sms"];

// == Manifest ==
/// Ordered URLs, absolute or relative to the application origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Manifest {
    urls: Vec<String>,
}

impl Manifest {
    pub fn new<I, S>(urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            urls: urls.into_iter().map(Into::into).collect(),
        }
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    /// Resolves every entry against `origin`, keeping manifest order.
    pub fn resolve(&self, origin: &Url) -> Result<Vec<Url>> {
        self.urls
            .iter()
            .map(|url| {
                origin.join(url).map_err(|e| {
                    CacheError::Config(format!("Invalid manifest URL '{}': {}", url, e))
                })
            })
            .collect()
    }
}

impl Default for Manifest {
    fn default() -> Self {
        Self::new(DEFAULT_MANIFEST)
    }
}

// == Exclusion Set ==
/// Path prefixes that are never read from or written to any generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    prefixes: Vec<String>,
}

impl ExclusionSet {
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the prefix that excludes `path`, if any.
    pub fn matching(&self, path: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .find(|prefix| path.starts_with(prefix.as_str()))
            .map(String::as_str)
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.matching(path).is_some()
    }
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::new(EXCLUDED_PREFIXES)
    }
}
