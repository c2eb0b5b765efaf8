//! Cache Module
//!
//! In-memory response caching with TTL expiration and LRU eviction.

mod entry;
mod key;
mod recency;
mod stats;
mod store;


use std::sync::Arc;

use tokio::sync::RwLock;

// Re-export public types
pub use entry::CacheEntry;
pub use key::CacheKey;
pub use stats::CacheStats;
pub use store::ResponseCache;

/// Cache of decoded JSON responses shared between the API client, the
/// gateway handlers and diagnostics.
pub type SharedCache = Arc<RwLock<ResponseCache<serde_json::Value>>>;

/// Wraps a fresh cache for sharing.
pub fn shared(cache: ResponseCache<serde_json::Value>) -> SharedCache {
    Arc::new(RwLock::new(cache))
}
