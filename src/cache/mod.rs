//! Cache Module
//!
//! Versioned response storage: named generations of URL-keyed responses,
//! replaced wholesale rather than evicted entry by entry.

mod entry;
mod generation;
mod stats;
mod storage;


// Re-export public types
pub use entry::CacheEntry;
pub use generation::CacheGeneration;
pub use stats::{CacheStats, StatsSnapshot};
pub use storage::CacheStorage;
