//! Catalog resources and gateway DTOs
//!
//! Types shared by the upstream client and the gateway's request and
//! response bodies.

pub mod catalog;
pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use catalog::{Category, FilterConfig, PriceRange, Product, Review};
pub use requests::{CategoryInput, ProductInput, ProductQuery};
pub use responses::{AdminResponse, CacheKeysResponse, ClearResponse, HealthResponse};
