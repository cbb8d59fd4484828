//! In-memory tier in front of the insight store using moka.
//!
//! Holds the current version per concept. An insert never replaces a
//! higher version already cached.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::ops::compute::Op;
use moka::sync::Cache;

use incubator_core::models::InsightRecord;

/// Current insight record per concept id, with hit/miss counters.
pub struct HotTier {
    cache: Cache<String, InsightRecord>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl HotTier {
    pub fn new(max_entries: u64, ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();
        Self {
            cache,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn get(&self, concept_id: &str) -> Option<InsightRecord> {
        match self.cache.get(concept_id) {
            Some(record) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(record)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Cache `record` unless a newer version is already present.
    pub fn insert(&self, record: InsightRecord) {
        let version = record.generation_version;
        self.cache
            .entry(record.idea_id.clone())
            .and_compute_with(|existing| match existing {
                Some(entry) if entry.value().generation_version >= version => Op::Nop,
                _ => Op::Put(record),
            });
    }

    pub fn invalidate(&self, concept_id: &str) {
        self.cache.invalidate(concept_id);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Hit rate over all lookups (0.0–1.0).
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        if total == 0.0 {
            0.0
        } else {
            hits / total
        }
    }
}
