pub mod l1;
pub mod l2;

use std::time::Duration;

pub use l1::{CacheEntry, L1CacheWithStats};
pub use l2::L2Cache;

use crate::fingerprint::Fingerprint;
use crate::metrics::Metrics;

pub struct ResponseCache {
    l1: L1CacheWithStats,
    l2: Option<L2Cache>,
    ttl: Duration,
}

pub enum CacheLookup {
    Hit(CacheEntry),
    Miss,
}

impl ResponseCache {
    pub fn new(l1_capacity: usize, ttl: Duration, l2: Option<L2Cache>) -> Self {
        Self { l1: L1CacheWithStats::new(l1_capacity), l2, ttl }
    }

    /// L1 first; on miss, L2 if configured; on L2 hit, hydrate L1.
    pub async fn lookup(&self, fingerprint: &Fingerprint, metrics: &Metrics) -> CacheLookup {
        if let Some(entry) = self.l1.get(fingerprint) {
            metrics.record_cache_op("hit");
            return CacheLookup::Hit(entry);
        }

        if let Some(l2) = &self.l2 {
            if let Some(value) = l2.get(fingerprint, metrics).await {
                // The fingerprint doubles as the ETag (§4.E.1 step 3), so
                // the key we looked up under is already the right value.
                let entry = CacheEntry::new(value, fingerprint.clone(), self.ttl);
                self.l1.insert(fingerprint.clone(), entry.clone());
                metrics.record_cache_op("hit");
                return CacheLookup::Hit(entry);
            }
        }

        metrics.record_cache_op("miss");
        CacheLookup::Miss
    }

    /// Insert into L1 and write through to L2 best-effort.
    pub async fn insert(&self, fingerprint: Fingerprint, value: Vec<u8>, metrics: &Metrics) -> CacheEntry {
        let entry = CacheEntry::new(value, fingerprint.clone(), self.ttl);
        self.l1.insert(fingerprint.clone(), entry.clone());
        metrics.record_cache_op("set");
        if let Some(l2) = &self.l2 {
            l2.set(&fingerprint, &entry.value, metrics).await;
        }
        entry
    }

    pub fn l1_size(&self) -> usize {
        self.l1.len()
    }

    pub fn l1_hit_rate(&self) -> f64 {
        self.l1.hit_rate()
    }

    pub async fn l2_reachable(&self) -> Option<bool> {
        match &self.l2 {
            Some(l2) => Some(l2.ping().await),
            None => None,
        }
    }
}
