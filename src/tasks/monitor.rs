//! Cache Monitor Task
//!
//! Background task that periodically logs cache statistics while
//! diagnostics are enabled.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStats, SharedCache};

/// Spawns a background task that reports cache statistics every `interval`.
///
/// Only takes a read lock, so it never changes counters or recency. Periods
/// without lookups are logged at debug level to keep the info log quiet.
///
/// # Returns
/// A JoinHandle for the spawned task, which can be used to abort the task
/// during graceful shutdown.
///
/// # Example
/// ```ignore
/// let cache = cache::shared(ResponseCache::new(100, Duration::from_secs(300)));
/// let monitor_handle = spawn_monitor_task(cache.clone(), Duration::from_secs(30));
/// // Later, during shutdown:
/// monitor_handle.abort();
/// ```
pub fn spawn_monitor_task(cache: SharedCache, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("Starting cache monitor with interval of {:?}", interval);
        let mut last_requests = 0;

        loop {
            tokio::time::sleep(interval).await;

            let stats = cache.read().await.stats();
            if had_activity(&stats, last_requests) {
                info!(
                    requests = stats.requests,
                    hits = stats.hits,
                    misses = stats.misses,
                    evictions = stats.evictions,
                    size = stats.size,
                    max_size = stats.max_size,
                    "cache hit rate {:.1}%",
                    stats.hit_rate * 100.0
                );
            } else {
                debug!("Cache monitor: no lookups since last report");
            }
            last_requests = stats.requests;
        }
    })
}

/// Lookups happened since the last report. A clear resets the counters, which
/// also counts as activity.
fn had_activity(stats: &CacheStats, last_requests: u64) -> bool {
    stats.requests != last_requests
}
