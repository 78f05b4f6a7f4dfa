//! Cache Entry Module
//!
//! Defines a single stored response inside a cache generation.

use chrono::{DateTime, Utc};

use crate::network::FetchResponse;

// == Cache Entry ==
/// A stored response and when it was written.
///
/// Entries never expire; they live until their generation is deleted.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored response
    pub response: FetchResponse,
    /// When the entry was written
    pub stored_at: DateTime<Utc>,
}

impl CacheEntry {
    // == Constructor ==
    pub fn new(response: FetchResponse) -> Self {
        Self {
            response,
            stored_at: Utc::now(),
        }
    }

    // == Size ==
    /// Body size in bytes.
    pub fn size(&self) -> usize {
        self.response.body.len()
    }
}
