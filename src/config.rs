//! Configuration Module
//!
//! Loads client, cache and gateway settings from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Base URL used when `API_BASE_URL` is unset.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

/// Gateway configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the remote catalog API
    pub api_base_url: String,
    /// Bearer token sent with every upstream request, required for admin calls
    pub api_token: Option<String>,
    /// Maximum number of cached responses
    pub cache_max_size: usize,
    /// Time-to-live of a cached response in seconds
    pub cache_ttl: u64,
    /// Exposes cache diagnostics routes and the monitor task
    pub cache_diagnostics: bool,
    /// Interval in seconds between monitor reports
    pub monitor_interval: u64,
    /// Upstream request timeout in seconds
    pub request_timeout: u64,
    /// HTTP server port
    pub server_port: u16,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_BASE_URL` - Remote API base URL (default: http://localhost:8000/api)
    /// - `API_TOKEN` - Bearer token (default: unset)
    /// - `CACHE_MAX_SIZE` - Maximum cached responses (default: 100)
    /// - `CACHE_TTL_SECS` - Response TTL in seconds (default: 300)
    /// - `CACHE_DIAGNOSTICS` - Enable diagnostics, `true`/`1` (default: false)
    /// - `MONITOR_INTERVAL_SECS` - Monitor report interval (default: 30)
    /// - `REQUEST_TIMEOUT_SECS` - Upstream timeout (default: 10)
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_base_url: env::var("API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.api_base_url),
            api_token: env::var("API_TOKEN").ok().filter(|v| !v.trim().is_empty()),
            cache_max_size: parse_var("CACHE_MAX_SIZE").unwrap_or(defaults.cache_max_size),
            cache_ttl: parse_var("CACHE_TTL_SECS").unwrap_or(defaults.cache_ttl),
            cache_diagnostics: env::var("CACHE_DIAGNOSTICS")
                .map(|v| parse_flag(&v))
                .unwrap_or(defaults.cache_diagnostics),
            monitor_interval: parse_var("MONITOR_INTERVAL_SECS")
                .unwrap_or(defaults.monitor_interval),
            request_timeout: parse_var("REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
        }
    }

    pub fn cache_ttl_duration(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }

    pub fn request_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            api_token: None,
            cache_max_size: 100,
            cache_ttl: 300,
            cache_diagnostics: false,
            monitor_interval: 30,
            request_timeout: 10,
            server_port: 3000,
        }
    }
}

fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
