//! Recency Tracker Module
//!
//! Orders cache keys by last use so the least recently used one can be
//! chosen for eviction.

use std::collections::{BTreeMap, HashMap};

use crate::cache::CacheKey;

// == Recency Tracker ==
/// Tracks access order for LRU eviction.
///
/// Every touch stamps the key with a fresh tick. `order` maps ticks back to
/// keys, so the smallest tick is always the least recently used key.
#[derive(Debug, Default)]
pub(crate) struct RecencyTracker {
    /// Last tick per key
    ticks: HashMap<CacheKey, u64>,
    /// Keys by tick, oldest first
    order: BTreeMap<u64, CacheKey>,
    /// Next tick to hand out
    clock: u64,
}

impl RecencyTracker {
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Marks a key as most recently used, tracking it if new.
    pub fn touch(&mut self, key: &CacheKey) {
        let tick = self.clock;
        self.clock += 1;

        if let Some(previous) = self.ticks.insert(key.clone(), tick) {
            self.order.remove(&previous);
        }
        self.order.insert(tick, key.clone());
    }

    // == Remove ==
    /// Stops tracking a key. Unknown keys are ignored.
    pub fn remove(&mut self, key: &CacheKey) {
        if let Some(tick) = self.ticks.remove(key) {
            self.order.remove(&tick);
        }
    }

    // == Pop Oldest ==
    /// Removes and returns the least recently used key.
    pub fn pop_oldest(&mut self) -> Option<CacheKey> {
        let (_, key) = self.order.pop_first()?;
        self.ticks.remove(&key);
        Some(key)
    }

    /// The least recently used key, if any.
    #[cfg(test)]
    pub fn peek_oldest(&self) -> Option<&CacheKey> {
        self.order.first_key_value().map(|(_, key)| key)
    }

    /// Keys from most to least recently used.
    pub fn most_recent_first(&self) -> impl Iterator<Item = &CacheKey> {
        self.order.values().rev()
    }

    pub fn clear(&mut self) {
        self.ticks.clear();
        self.order.clear();
        self.clock = 0;
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.ticks.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.ticks.is_empty()
    }

    #[cfg(test)]
    pub fn contains(&self, key: &CacheKey) -> bool {
        self.ticks.contains_key(key)
    }
}
