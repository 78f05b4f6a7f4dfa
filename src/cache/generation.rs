//! Cache Generation Module
//!
//! A named, versioned key-to-response store. Generations are superseded as a
//! whole; individual entries are only ever inserted or replaced.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::cache::CacheEntry;
use crate::error::{CacheError, Result};
use crate::network::FetchResponse;

// == Cache Generation ==
#[derive(Debug)]
pub struct CacheGeneration {
    name: String,
    created_at: DateTime<Utc>,
    /// Responses keyed by normalized request URL
    entries: HashMap<String, CacheEntry>,
    /// Largest body this generation will store
    max_entry_bytes: usize,
}

impl CacheGeneration {
    // == Constructor ==
    pub fn new(name: impl Into<String>, max_entry_bytes: usize) -> Self {
        Self {
            name: name.into(),
            created_at: Utc::now(),
            entries: HashMap::new(),
            max_entry_bytes,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    // == Put ==
    /// Stores `response` under `key`, replacing any previous entry.
    pub fn put(&mut self, key: impl Into<String>, response: FetchResponse) -> Result<()> {
        let key = key.into();
        let size = response.body.len();
        if size > self.max_entry_bytes {
            return Err(CacheError::EntryTooLarge {
                key,
                size,
                limit: self.max_entry_bytes,
            });
        }

        self.entries.insert(key, CacheEntry::new(response));
        Ok(())
    }

    // == Get ==
    pub fn get(&self, key: &str) -> Option<&CacheEntry> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Keys ==
    /// Stored keys in lexical order.
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries.keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
