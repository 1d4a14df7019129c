//! Per-region TTL cache for merged pricing snapshots.
//!
//! The cache is owned by the service layer and injected where needed —
//! there is no module-level mutable state. Entries are overwritten
//! wholesale on refresh, never partially updated.
//!
//! # Concurrency
//!
//! Readers share an `RwLock` over the entry map. Fills are serialized
//! per region through [`RegionCache::fill_lock`]: concurrent misses for
//! the same region share one upstream fetch (the late waiter re-checks
//! the cache after acquiring the lock). Misses for different regions
//! fill concurrently.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, RwLock};

use super::pricing::InstancePricing;

/// One region's cached snapshot and its fetch time.
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<InstancePricing>,
    fetched_at: Instant,
}

/// In-memory mapping from region ID to (pricing snapshot, fetch time).
#[derive(Debug)]
pub struct RegionCache {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry>>,
    fill_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl RegionCache {
    /// Creates an empty cache whose entries stay fresh for `ttl`.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
            fill_locks: Mutex::new(HashMap::new()),
        }
    }

    /// Returns the cached snapshot for `region` if it is still fresh.
    pub async fn get_fresh(&self, region: &str) -> Option<Vec<InstancePricing>> {
        let entries = self.entries.read().await;
        entries.get(region).and_then(|entry| {
            (entry.fetched_at.elapsed() < self.ttl).then(|| entry.data.clone())
        })
    }

    /// Returns the per-region fill lock, creating it on first use.
    ///
    /// Callers must re-check [`Self::get_fresh`] after acquiring the
    /// lock; a previous holder may already have filled the entry.
    pub async fn fill_lock(&self, region: &str) -> Arc<Mutex<()>> {
        let mut locks = self.fill_locks.lock().await;
        Arc::clone(
            locks
                .entry(region.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(()))),
        )
    }

    /// Stores a freshly fetched snapshot, replacing any previous entry.
    pub async fn store(&self, region: &str, data: Vec<InstancePricing>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            region.to_string(),
            CacheEntry {
                data,
                fetched_at: Instant::now(),
            },
        );
    }
}
