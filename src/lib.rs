//! Storefront Cache - cached catalog client and gateway
//!
//! Fronts the storefront REST API with an in-memory response cache that
//! expires entries by TTL and evicts them by LRU.

pub mod api;
pub mod cache;
pub mod client;
pub mod config;
pub mod diagnostics;
pub mod error;
pub mod models;
pub mod tasks;

pub use api::AppState;
pub use cache::{CacheKey, CacheStats, ResponseCache, SharedCache};
pub use client::ProductsApi;
pub use config::Config;
pub use diagnostics::CacheDiagnostics;
pub use error::ApiError;
