//! Cache Entry Module
//!
//! A cached response payload together with the time it was stored and how
//! long it stays valid.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single cached response.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// The cached payload
    pub value: V,
    /// When the entry was stored
    pub created_at: Instant,
    /// How long the entry stays valid after `created_at`
    pub ttl: Duration,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates an entry stamped with the current time.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            created_at: Instant::now(),
            ttl,
        }
    }

    // == Is Valid ==
    /// An entry is valid iff `now - created_at < ttl`.
    ///
    /// The boundary is exclusive: once the full TTL has elapsed the entry is
    /// stale, so a zero TTL is never valid.
    pub fn is_valid(&self) -> bool {
        self.age() < self.ttl
    }

    /// Time elapsed since the entry was stored.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }
}
