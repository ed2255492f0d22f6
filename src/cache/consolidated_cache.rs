//! Per-user TTL cache of consolidated listening snapshots.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::consolidated::Consolidated;
use crate::server::metrics;

pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 1024;

struct CacheEntry {
    data: Arc<Consolidated>,
    stored_at: Instant,
}

/// Snapshots keyed by user id, each valid for `ttl` after it was stored.
///
/// The cache never holds more than `max_entries` snapshots: inserting into a
/// full cache first drops expired entries, then the oldest one.
pub struct ConsolidatedCache {
    entries: Mutex<HashMap<String, CacheEntry>>,
    ttl: Duration,
    max_entries: usize,
}

impl ConsolidatedCache {
    pub fn new(ttl: Duration, max_entries: usize) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
            max_entries: max_entries.max(1),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        // Entries are replaced whole, so a poisoned map is still consistent.
        self.entries.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_fresh(&self, entry: &CacheEntry, now: Instant) -> bool {
        now.saturating_duration_since(entry.stored_at) < self.ttl
    }

    pub fn get(&self, user_id: &str) -> Option<Arc<Consolidated>> {
        self.get_at(user_id, Instant::now())
    }

    pub fn get_at(&self, user_id: &str, now: Instant) -> Option<Arc<Consolidated>> {
        let entries = self.lock();
        let hit = entries
            .get(user_id)
            .filter(|entry| self.is_fresh(entry, now))
            .map(|entry| entry.data.clone());
        metrics::record_cache_lookup(hit.is_some());
        hit
    }

    pub fn insert(&self, user_id: &str, data: Arc<Consolidated>) {
        self.insert_at(user_id, data, Instant::now());
    }

    pub fn insert_at(&self, user_id: &str, data: Arc<Consolidated>, now: Instant) {
        let mut entries = self.lock();

        if !entries.contains_key(user_id) && entries.len() >= self.max_entries {
            entries.retain(|_, entry| self.is_fresh(entry, now));
            if entries.len() >= self.max_entries {
                let oldest = entries
                    .iter()
                    .min_by_key(|(_, entry)| entry.stored_at)
                    .map(|(key, _)| key.clone());
                if let Some(oldest) = oldest {
                    debug!(user = %oldest, "Evicting oldest consolidated snapshot");
                    entries.remove(&oldest);
                }
            }
        }

        entries.insert(
            user_id.to_string(),
            CacheEntry {
                data,
                stored_at: now,
            },
        );
        metrics::set_cache_entries(entries.len());
    }

    /// Drops every expired entry, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Instant::now())
    }

    pub fn purge_expired_at(&self, now: Instant) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| self.is_fresh(entry, now));
        metrics::set_cache_entries(entries.len());
        before - entries.len()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl Default for ConsolidatedCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_TTL, DEFAULT_CACHE_MAX_ENTRIES)
    }
}
