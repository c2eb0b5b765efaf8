//! API Module
//!
//! HTTP handlers and routing for the catalog gateway.
//!
//! # Endpoints
//! - `GET /categories`, `GET /products`, `GET /products/featured`,
//!   `GET /products/:id`, `GET /products/:id/reviews`, `GET /filters`
//! - `POST|PUT|DELETE /admin/...` - Catalog management
//! - `GET /debug/cache/stats`, `GET /debug/cache/keys`, `DELETE /debug/cache`
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
