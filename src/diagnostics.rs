//! Cache Diagnostics
//!
//! Explicit handle for inspecting and resetting the response cache during
//! development. Only handed out when diagnostics are enabled in the config.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::info;

use crate::cache::{CacheStats, SharedCache};
use crate::tasks::spawn_monitor_task;

/// Development handle over the shared cache.
#[derive(Clone)]
pub struct CacheDiagnostics {
    cache: SharedCache,
    monitor_interval: Duration,
}

impl CacheDiagnostics {
    pub fn new(cache: SharedCache, monitor_interval: Duration) -> Self {
        Self {
            cache,
            monitor_interval,
        }
    }

    /// Current counters and hit rate.
    pub async fn stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Cached keys, most recently used first.
    pub async fn keys(&self) -> Vec<String> {
        self.cache
            .read()
            .await
            .keys()
            .into_iter()
            .map(|key| key.to_string())
            .collect()
    }

    /// Drops every cached response and zeroes the counters. Returns the number
    /// of entries dropped.
    pub async fn clear(&self) -> usize {
        let mut cache = self.cache.write().await;
        let cleared = cache.len();
        cache.clear();
        info!("Cache cleared via diagnostics ({} entries dropped)", cleared);
        cleared
    }

    /// Starts periodic stats reporting. Abort the handle to stop it.
    pub fn monitor(&self) -> JoinHandle<()> {
        spawn_monitor_task(self.cache.clone(), self.monitor_interval)
    }
}
