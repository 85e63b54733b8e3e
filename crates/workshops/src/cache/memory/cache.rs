//! In-memory cache implementation with optional LRU eviction.
//!
//! All operations go through a single `RwLock`, so reads and writes of one
//! key are linearizable. Values are replaced wholesale on `set`.

use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use lru::LruCache;
use tokio::sync::RwLock;

use workshops_core::cache::{literal_prefix, pattern_matches, Cache, Result};

/// A single cache entry with optional expiration.
#[derive(Debug, Clone)]
struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(value: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        Self { value, expires_at }
    }

    /// Returns true if this entry has expired.
    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() >= exp)
    }
}

/// In-memory cache.
///
/// Thread-safe cache using `Arc<RwLock<LruCache>>`. Expired entries are
/// logically absent and are popped lazily when next accessed. When
/// `max_entries` is non-zero the least recently used entry is evicted once the
/// bound is reached; zero means unbounded.
#[derive(Debug, Clone)]
pub struct MemoryCache {
    store: Arc<RwLock<LruCache<String, CacheEntry>>>,
}

impl MemoryCache {
    /// Creates a new in-memory cache holding at most `max_entries` entries
    /// (`0` for no bound).
    pub fn new(max_entries: usize) -> Self {
        let store = match NonZeroUsize::new(max_entries) {
            Some(capacity) => LruCache::new(capacity),
            None => LruCache::unbounded(),
        };
        Self {
            store: Arc::new(RwLock::new(store)),
        }
    }

    /// Number of entries currently held, including expired ones not yet
    /// reclaimed.
    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }
}

#[async_trait]
impl Cache for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        // Write lock: a hit updates LRU order, an expired entry is popped.
        let mut store = self.store.write().await;

        match store.get(key) {
            Some(entry) if entry.is_expired() => {
                store.pop(key);
                Ok(None)
            }
            Some(entry) => Ok(Some(entry.value.clone())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<()> {
        let mut store = self.store.write().await;
        store.put(key.to_string(), CacheEntry::new(value.to_vec(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut store = self.store.write().await;
        store.pop(key);
        Ok(())
    }

    async fn delete_pattern(&self, pattern: &str) -> Result<()> {
        let prefix = literal_prefix(pattern);
        let mut store = self.store.write().await;

        let keys_to_delete: Vec<String> = store
            .iter()
            .filter(|(key, _)| key.starts_with(prefix) && pattern_matches(pattern, key))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &keys_to_delete {
            store.pop(key);
        }

        tracing::trace!(pattern, count = keys_to_delete.len(), "Deleted keys by pattern");
        Ok(())
    }
}
