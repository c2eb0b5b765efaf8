//! Cache Statistics Module
//!
//! Lookup and eviction counters, plus the read-only snapshot handed to
//! diagnostics.

use serde::Serialize;

// == Counters ==
/// Mutable counters owned by the cache.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Counters {
    pub requests: u64,
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
}

impl Counters {
    pub fn record_hit(&mut self) {
        self.requests += 1;
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.requests += 1;
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

// == Cache Stats ==
/// Snapshot of cache counters. Derived from the cache on demand; mutating it
/// has no effect on the cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheStats {
    /// Total `get` calls
    pub requests: u64,
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that found nothing or a stale entry
    pub misses: u64,
    /// Entries dropped to make room for new ones
    pub evictions: u64,
    /// Entries currently stored
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// `hits / requests`, 0.0 before the first lookup
    pub hit_rate: f64,
}

impl CacheStats {
    pub(crate) fn snapshot(counters: &Counters, size: usize, max_size: usize) -> Self {
        Self {
            requests: counters.requests,
            hits: counters.hits,
            misses: counters.misses,
            evictions: counters.evictions,
            size,
            max_size,
            hit_rate: hit_rate(counters.hits, counters.requests),
        }
    }
}

/// `hits / requests`, or 0.0 when there have been no requests.
fn hit_rate(hits: u64, requests: u64) -> f64 {
    if requests == 0 {
        0.0
    } else {
        hits as f64 / requests as f64
    }
}
