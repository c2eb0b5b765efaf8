//! Response Cache Module
//!
//! In-memory response store combining a HashMap with recency tracking and
//! lazy TTL expiration.

use std::collections::HashMap;
use std::time::Duration;

use tracing::trace;

use crate::cache::recency::RecencyTracker;
use crate::cache::stats::Counters;
use crate::cache::{CacheEntry, CacheKey, CacheStats};

// == Response Cache ==
/// Bounded response cache with LRU eviction and per-entry TTL.
///
/// Expiry is checked only when a key is read; there is no background sweep.
/// No operation fails: a miss is reported as `None`.
#[derive(Debug)]
pub struct ResponseCache<V> {
    entries: HashMap<CacheKey, CacheEntry<V>>,
    recency: RecencyTracker,
    counters: Counters,
    max_size: usize,
    default_ttl: Duration,
    /// Bumped by every invalidation and clear
    generation: u64,
}

impl<V: Clone> ResponseCache<V> {
    // == Constructor ==
    /// Creates a cache holding at most `max_size` entries (at least one).
    pub fn new(max_size: usize, default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            recency: RecencyTracker::new(),
            counters: Counters::default(),
            max_size: max_size.max(1),
            default_ttl,
            generation: 0,
        }
    }

    // == Get ==
    /// Returns the cached value if present and still valid.
    ///
    /// Every call counts as a request. A stale entry is dropped and counted
    /// as a miss. A hit marks the key as most recently used.
    pub fn get(&mut self, key: &CacheKey) -> Option<V> {
        let valid = match self.entries.get(key) {
            Some(entry) => entry.is_valid(),
            None => {
                self.counters.record_miss();
                return None;
            }
        };

        if !valid {
            trace!(key = %key, "cache entry expired");
            self.remove_entry(key);
            self.counters.record_miss();
            return None;
        }

        self.counters.record_hit();
        self.recency.touch(key);
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Set ==
    /// Stores a value under `key` with the default TTL.
    pub fn set(&mut self, key: CacheKey, value: V) {
        let ttl = self.default_ttl;
        self.set_with_ttl(key, value, ttl);
    }

    /// Stores a value under `key` with an explicit TTL.
    ///
    /// Overwriting an existing key restamps it and never evicts. Inserting a
    /// new key into a full cache evicts exactly one least recently used
    /// entry first.
    pub fn set_with_ttl(&mut self, key: CacheKey, value: V, ttl: Duration) {
        let is_overwrite = self.entries.contains_key(&key);

        if !is_overwrite && self.entries.len() >= self.max_size {
            if let Some(evicted) = self.recency.pop_oldest() {
                trace!(key = %evicted, "evicting least recently used entry");
                self.entries.remove(&evicted);
                self.counters.record_eviction();
            }
        }

        self.recency.touch(&key);
        self.entries.insert(key, CacheEntry::new(value, ttl));
    }

    /// Stores a value only if nothing was invalidated since `generation` was
    /// read. Returns whether the value was stored.
    ///
    /// A caller that misses, fetches, then stores passes the generation it saw
    /// at miss time, so a response fetched before an invalidation is never
    /// written back over it.
    pub fn set_if_generation(&mut self, key: CacheKey, value: V, generation: u64) -> bool {
        if self.generation != generation {
            trace!(key = %key, "skipping store, cache invalidated since fetch began");
            return false;
        }
        self.set(key, value);
        true
    }

    /// Changes whenever entries are invalidated or cleared.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // == Invalidate ==
    /// Removes one key without touching the counters.
    pub fn invalidate(&mut self, key: &CacheKey) -> bool {
        self.generation += 1;
        self.remove_entry(key)
    }

    /// Removes the endpoint `prefix` and everything under it. Returns how
    /// many entries were removed.
    pub fn invalidate_prefix(&mut self, prefix: &str) -> usize {
        self.generation += 1;
        let doomed: Vec<CacheKey> = self
            .entries
            .keys()
            .filter(|key| key.is_under(prefix))
            .cloned()
            .collect();

        for key in &doomed {
            self.remove_entry(key);
        }
        doomed.len()
    }

    // == Clear ==
    /// Drops every entry and resets all counters to zero. The generation
    /// still advances.
    pub fn clear(&mut self) {
        self.generation += 1;
        self.entries.clear();
        self.recency.clear();
        self.counters.reset();
    }

    // == Stats ==
    pub fn stats(&self) -> CacheStats {
        CacheStats::snapshot(&self.counters, self.entries.len(), self.max_size)
    }

    /// Stored keys, most recently used first. Stale entries not yet read are
    /// still listed.
    pub fn keys(&self) -> Vec<CacheKey> {
        self.recency.most_recent_first().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    fn remove_entry(&mut self, key: &CacheKey) -> bool {
        self.recency.remove(key);
        self.entries.remove(key).is_some()
    }
}
