//! Configuration Module
//!
//! Handles loading and managing proxy configuration from environment variables.

use std::env;

use crate::worker::DEFAULT_CACHE_NAME;

/// Default upstream application origin (the Flask development server).
pub const DEFAULT_UPSTREAM_URL: &str = "http://127.0.0.1:5000";

/// Default per-entry storage limit in bytes.
pub const DEFAULT_MAX_ENTRY_BYTES: usize = 10 * 1024 * 1024; // 10 MB

/// Proxy configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server port
    pub server_port: u16,
    /// Origin of the application being fronted by the proxy
    pub upstream_url: String,
    /// Name of the current cache generation
    pub cache_name: String,
    /// Largest response body that will be stored as a cache entry
    pub max_entry_bytes: usize,
    /// Run install and activate before accepting connections
    pub install_on_startup: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `UPSTREAM_URL` - Application origin (default: http://127.0.0.1:5000)
    /// - `CACHE_NAME` - Current cache generation (default: rwana-health-app-v1)
    /// - `MAX_ENTRY_BYTES` - Per-entry size limit (default: 10 MB)
    /// - `INSTALL_ON_STARTUP` - Seed and activate at startup (default: true)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            server_port: env::var("SERVER_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            upstream_url: env::var("UPSTREAM_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.upstream_url),
            cache_name: env::var("CACHE_NAME")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.cache_name),
            max_entry_bytes: env::var("MAX_ENTRY_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_entry_bytes),
            install_on_startup: env::var("INSTALL_ON_STARTUP")
                .ok()
                .and_then(|v| parse_bool(&v))
                .unwrap_or(defaults.install_on_startup),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 3000,
            upstream_url: DEFAULT_UPSTREAM_URL.to_string(),
            cache_name: DEFAULT_CACHE_NAME.to_string(),
            max_entry_bytes: DEFAULT_MAX_ENTRY_BYTES,
            install_on_startup: true,
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
