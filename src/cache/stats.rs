//! Cache Statistics Module
//!
//! Counters for every branch of the interceptor. Counters are atomic so the
//! request path and detached cache writes can record without taking the
//! storage lock.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// == Cache Stats ==
#[derive(Debug, Default)]
pub struct CacheStats {
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    network_fetches: AtomicU64,
    network_failures: AtomicU64,
    cache_writes: AtomicU64,
    write_failures: AtomicU64,
    private_skips: AtomicU64,
    manifest_failures: AtomicU64,
    offline_fallbacks: AtomicU64,
    passthroughs: AtomicU64,
    generations_deleted: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub network_fetches: u64,
    pub network_failures: u64,
    pub cache_writes: u64,
    pub write_failures: u64,
    /// Cacheable responses withheld because they belong to one user
    pub private_skips: u64,
    /// Manifest entries that failed to fetch during install
    pub manifest_failures: u64,
    pub offline_fallbacks: u64,
    pub passthroughs: u64,
    pub generations_deleted: u64,
    /// cache_hits / (cache_hits + cache_misses)
    pub hit_rate: f64,
}

impl CacheStats {
    // == Constructor ==
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_network_fetch(&self) {
        self.network_fetches.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_network_failure(&self) {
        self.network_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write(&self) {
        self.cache_writes.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_write_failure(&self) {
        self.write_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_private_skip(&self) {
        self.private_skips.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_manifest_failure(&self) {
        self.manifest_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_offline_fallback(&self) {
        self.offline_fallbacks.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_passthrough(&self) {
        self.passthroughs.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_generation_deleted(&self) {
        self.generations_deleted.fetch_add(1, Ordering::Relaxed);
    }

    // == Snapshot ==
    pub fn snapshot(&self) -> StatsSnapshot {
        let cache_hits = self.cache_hits.load(Ordering::Relaxed);
        let cache_misses = self.cache_misses.load(Ordering::Relaxed);
        let lookups = cache_hits + cache_misses;
        let hit_rate = if lookups == 0 {
            0.0
        } else {
            cache_hits as f64 / lookups as f64
        };

        StatsSnapshot {
            cache_hits,
            cache_misses,
            network_fetches: self.network_fetches.load(Ordering::Relaxed),
            network_failures: self.network_failures.load(Ordering::Relaxed),
            cache_writes: self.cache_writes.load(Ordering::Relaxed),
            write_failures: self.write_failures.load(Ordering::Relaxed),
            private_skips: self.private_skips.load(Ordering::Relaxed),
            manifest_failures: self.manifest_failures.load(Ordering::Relaxed),
            offline_fallbacks: self.offline_fallbacks.load(Ordering::Relaxed),
            passthroughs: self.passthroughs.load(Ordering::Relaxed),
            generations_deleted: self.generations_deleted.load(Ordering::Relaxed),
            hit_rate,
        }
    }
}
