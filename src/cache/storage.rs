//! Cache Storage Module
//!
//! The set of named cache generations, kept in creation order. Lookups that
//! do not name a generation search every generation, oldest first.

use axum::http::Method;

use crate::cache::{CacheEntry, CacheGeneration};
use crate::error::Result;
use crate::network::{FetchRequest, FetchResponse};

// == Cache Storage ==
#[derive(Debug)]
pub struct CacheStorage {
    /// Generations in creation order
    generations: Vec<CacheGeneration>,
    /// Per-entry size limit handed to every generation
    max_entry_bytes: usize,
}

impl CacheStorage {
    // == Constructor ==
    pub fn new(max_entry_bytes: usize) -> Self {
        Self {
            generations: Vec::new(),
            max_entry_bytes,
        }
    }

    // == Open ==
    /// Returns the named generation, creating it if absent.
    pub fn open(&mut self, name: &str) -> &mut CacheGeneration {
        let index = match self.position(name) {
            Some(index) => index,
            None => {
                self.generations
                    .push(CacheGeneration::new(name, self.max_entry_bytes));
                self.generations.len() - 1
            }
        };
        &mut self.generations[index]
    }

    pub fn get(&self, name: &str) -> Option<&CacheGeneration> {
        self.generations.iter().find(|g| g.name() == name)
    }

    pub fn has(&self, name: &str) -> bool {
        self.position(name).is_some()
    }

    // == Keys ==
    /// Generation names in creation order.
    pub fn keys(&self) -> Vec<String> {
        self.generations
            .iter()
            .map(|g| g.name().to_string())
            .collect()
    }

    // == Delete ==
    /// Removes a whole generation. Returns false if it did not exist.
    pub fn delete(&mut self, name: &str) -> bool {
        match self.position(name) {
            Some(index) => {
                self.generations.remove(index);
                true
            }
            None => false,
        }
    }

    // == Put ==
    /// Stores a response for `request` in the named generation.
    pub fn put(&mut self, name: &str, request: &FetchRequest, response: FetchResponse) -> Result<()> {
        self.open(name).put(request.cache_key(), response)
    }

    // == Match ==
    /// Finds a stored response for `request` in any generation.
    ///
    /// Only GET requests can match.
    pub fn match_request(&self, request: &FetchRequest) -> Option<&CacheEntry> {
        if request.method != Method::GET {
            return None;
        }

        let key = request.cache_key();
        self.generations.iter().find_map(|g| g.get(&key))
    }

    /// Total entries across all generations.
    pub fn total_entries(&self) -> usize {
        self.generations.iter().map(CacheGeneration::len).sum()
    }

    pub fn generations(&self) -> impl Iterator<Item = &CacheGeneration> {
        self.generations.iter()
    }

    fn position(&self, name: &str) -> Option<usize> {
        self.generations.iter().position(|g| g.name() == name)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::ResponseType;
    use axum::http::StatusCode;

    fn response(body: &'static str) -> FetchResponse {
        FetchResponse::new(StatusCode::OK, ResponseType::Basic, body)
    }

    fn get(url: &str) -> FetchRequest {
        FetchRequest::parse_get(url).unwrap()
    }

    #[test]
    fn test_storage_new() {
        let storage = CacheStorage::new(1024);
        assert!(storage.keys().is_empty());
        assert_eq!(storage.total_entries(), 0);
    }

    #[test]
    fn test_open_creates_once() {
        let mut storage = CacheStorage::new(1024);
        storage.open("v1");
        storage.open("v1");

        assert_eq!(storage.keys(), vec!["v1"]);
    }

    #[test]
    fn test_keys_in_creation_order() {
        let mut storage = CacheStorage::new(1024);
        storage.open("v2");
        storage.open("v0");
        storage.open("v1");

        assert_eq!(storage.keys(), vec!["v2", "v0", "v1"]);
    }

    #[test]
    fn test_delete() {
        let mut storage = CacheStorage::new(1024);
        storage.open("v0");

        assert!(storage.delete("v0"));
        assert!(!storage.has("v0"));
        assert!(!storage.delete("v0"));
    }

    #[test]
    fn test_match_searches_all_generations() {
        let mut storage = CacheStorage::new(1024);
        storage.put("v0", &get("http://app/old"), response("old")).unwrap();
        storage.put("v1", &get("http://app/new"), response("new")).unwrap();

        let old = storage.match_request(&get("http://app/old")).unwrap();
        assert_eq!(old.response.body_text(), "old");
        let new = storage.match_request(&get("http://app/new")).unwrap();
        assert_eq!(new.response.body_text(), "new");
        assert!(storage.match_request(&get("http://app/missing")).is_none());
    }

    #[test]
    fn test_match_prefers_oldest_generation() {
        let mut storage = CacheStorage::new(1024);
        storage.put("v0", &get("http://app/"), response("first")).unwrap();
        storage.put("v1", &get("http://app/"), response("second")).unwrap();

        let hit = storage.match_request(&get("http://app/")).unwrap();
        assert_eq!(hit.response.body_text(), "first");
    }

    #[test]
    fn test_match_ignores_non_get() {
        let mut storage = CacheStorage::new(1024);
        storage.put("v1", &get("http://app/form"), response("form")).unwrap();

        let post = get("http://app/form").with_method(Method::POST);
        assert!(storage.match_request(&post).is_none());
    }

    #[test]
    fn test_match_ignores_fragment() {
        let mut storage = CacheStorage::new(1024);
        storage.put("v1", &get("http://app/page"), response("page")).unwrap();

        assert!(storage.match_request(&get("http://app/page#top")).is_some());
    }

    #[test]
    fn test_put_respects_entry_limit() {
        let mut storage = CacheStorage::new(2);
        let result = storage.put("v1", &get("http://app/"), response("abc"));

        assert!(result.is_err());
        assert_eq!(storage.total_entries(), 0);
    }
}
