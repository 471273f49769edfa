//! Response cache
//!
//! Successful fetch results are kept in a bounded least-recently-used map
//! keyed by the exact URL string, shared by every task using the client.

use lru::LruCache;
use serde_json::Value;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Bounded LRU cache of decoded responses
#[derive(Debug)]
pub struct ResponseCache {
    entries: Mutex<LruCache<String, Value>>,
}

impl ResponseCache {
    /// Creates a cache holding at most `capacity` responses
    ///
    /// A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Returns a copy of the cached response and marks it recently used
    pub fn get(&self, url: &str) -> Option<Value> {
        self.lock().get(url).cloned()
    }

    /// Stores a response, evicting the least recently used one if full
    pub fn insert(&self, url: String, value: Value) {
        self.lock().put(url, value);
    }

    /// Checks for a cached response without touching recency
    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    /// Number of cached responses
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing is cached
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
