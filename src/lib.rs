//! RWANA Offline Cache - an offline-first caching proxy
//!
//! Serves cached assets when available, caches same-origin responses from the
//! network as they pass through, and answers with an offline fallback when
//! both cache and network fail. Cache generations are versioned and replaced
//! as a whole.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod tasks;
pub mod worker;

pub use api::AppState;
pub use config::Config;
pub use error::{CacheError, Result};
pub use worker::{OfflineWorker, WorkerSettings};
