//! Upstream Client Module
//!
//! HTTP client for the remote storefront API, fronted by the response cache.

mod products;

pub use products::ProductsApi;
