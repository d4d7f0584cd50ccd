//! L1: an in-process, fixed-capacity LRU with per-entry TTL.
//!
//! Readers and writers are serialized by a single mutex; the critical
//! section is O(1) (an LRU touch/insert plus an expiry comparison), per
//! the resource model's requirement that the cache's lock never be held
//! across a suspension point.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::fingerprint::Fingerprint;

#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The fully serialized response body, minus `etag` (see [`crate::fingerprint::etag_of`]).
    pub value: Vec<u8>,
    pub etag: String,
    expires_at: Instant,
}

impl CacheEntry {
    pub fn new(value: Vec<u8>, etag: String, ttl: Duration) -> Self {
        Self { value, etag, expires_at: Instant::now() + ttl }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

pub struct L1Cache {
    inner: Mutex<LruCache<Fingerprint, CacheEntry>>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct L1Stats {
    pub hits: u64,
    pub misses: u64,
}

pub struct L1CacheWithStats {
    cache: L1Cache,
    stats: Mutex<L1Stats>,
}

impl L1CacheWithStats {
    pub fn new(capacity: usize) -> Self {
        Self {
            cache: L1Cache::new(capacity),
            stats: Mutex::new(L1Stats::default()),
        }
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let result = self.cache.get(key);
        let mut stats = self.stats.lock().unwrap();
        if result.is_some() {
            stats.hits += 1;
        } else {
            stats.misses += 1;
        }
        result
    }

    pub fn insert(&self, key: Fingerprint, entry: CacheEntry) {
        self.cache.insert(key, entry);
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    pub fn hit_rate(&self) -> f64 {
        let stats = self.stats.lock().unwrap();
        let total = stats.hits + stats.misses;
        if total == 0 {
            0.0
        } else {
            stats.hits as f64 / total as f64
        }
    }

    pub fn stats(&self) -> L1Stats {
        *self.stats.lock().unwrap()
    }
}

impl L1Cache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).unwrap();
        Self { inner: Mutex::new(LruCache::new(capacity)) }
    }

    pub fn get(&self, key: &str) -> Option<CacheEntry> {
        let mut cache = self.inner.lock().unwrap();
        match cache.get(key) {
            Some(entry) if !entry.is_expired() => Some(entry.clone()),
            Some(_) => {
                cache.pop(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: Fingerprint, entry: CacheEntry) {
        self.inner.lock().unwrap().put(key, entry);
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hit_then_miss_after_eviction() {
        let cache = L1Cache::new(1);
        cache.insert("a".to_string(), CacheEntry::new(b"1".to_vec(), "e1".to_string(), Duration::from_secs(60)));
        assert!(cache.get("a").is_some());
        cache.insert("b".to_string(), CacheEntry::new(b"2".to_vec(), "e2".to_string(), Duration::from_secs(60)));
        // capacity 1: inserting b evicts a.
        assert!(cache.get("a").is_none());
        assert!(cache.get("b").is_some());
    }

    #[test]
    fn expired_entry_is_treated_as_a_miss() {
        let cache = L1Cache::new(4);
        cache.insert("a".to_string(), CacheEntry::new(b"1".to_vec(), "e1".to_string(), Duration::from_millis(1)));
        std::thread::sleep(Duration::from_millis(20));
        assert!(cache.get("a").is_none());
    }

    #[test]
    fn hit_rate_tracks_gets() {
        let cache = L1CacheWithStats::new(4);
        cache.insert("a".to_string(), CacheEntry::new(b"1".to_vec(), "e1".to_string(), Duration::from_secs(60)));
        cache.get("a");
        cache.get("missing");
        assert!((cache.hit_rate() - 0.5).abs() < 1e-9);
    }
}
