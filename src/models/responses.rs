//! Response DTOs for the gateway
//!
//! Catalog routes answer with the catalog models directly; these cover
//! health, admin acknowledgements and diagnostics.

use serde::Serialize;

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
    /// Whether cache diagnostics routes are mounted
    pub diagnostics: bool,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy(diagnostics: bool) -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            diagnostics,
        }
    }
}

/// Acknowledgement for admin deletes and moderation.
#[derive(Debug, Clone, Serialize)]
pub struct AdminResponse {
    pub message: String,
}

impl AdminResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Cached keys, most recently used first (GET /debug/cache/keys)
#[derive(Debug, Clone, Serialize)]
pub struct CacheKeysResponse {
    pub count: usize,
    pub keys: Vec<String>,
}

impl CacheKeysResponse {
    pub fn new(keys: Vec<String>) -> Self {
        Self {
            count: keys.len(),
            keys,
        }
    }
}

/// Response body for DELETE /debug/cache
#[derive(Debug, Clone, Serialize)]
pub struct ClearResponse {
    pub message: String,
    /// Entries dropped by the clear
    pub cleared: usize,
}

impl ClearResponse {
    pub fn new(cleared: usize) -> Self {
        Self {
            message: format!("Cleared {} cached responses", cleared),
            cleared,
        }
    }
}
