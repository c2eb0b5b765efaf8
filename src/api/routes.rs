//! API Routes
//!
//! Configures the Axum router for the catalog gateway.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::*;
use crate::diagnostics::CacheDiagnostics;

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /health` - Health check endpoint
/// - `GET /categories`, `/products`, `/products/featured`, `/products/:id`,
///   `/products/:id/reviews`, `/filters` - Cached catalog reads
/// - `/admin/...` - Category, product and review management (uncached)
/// - `/debug/cache/...` - Cache diagnostics, only when enabled
///
/// # Middleware
/// - CORS: Allows any origin
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let diagnostics = state.api.diagnostics();

    let mut router = Router::new()
        .route("/health", get(health_handler))
        .route("/categories", get(categories_handler))
        .route("/products", get(products_handler))
        .route("/products/featured", get(featured_handler))
        .route("/products/:id", get(product_handler))
        .route("/products/:id/reviews", get(reviews_handler))
        .route("/filters", get(filters_handler))
        .route("/admin/categories", post(create_category_handler))
        .route(
            "/admin/categories/:id",
            put(update_category_handler).delete(delete_category_handler),
        )
        .route("/admin/products", post(create_product_handler))
        .route(
            "/admin/products/:id",
            put(update_product_handler).delete(delete_product_handler),
        )
        .route("/admin/reviews/:id/approve", put(approve_review_handler))
        .route("/admin/reviews/:id", delete(delete_review_handler))
        .fallback(not_found_handler)
        .with_state(state);

    if let Some(diag) = diagnostics {
        router = router.merge(diagnostics_router(diag));
    }

    router.layer(cors).layer(TraceLayer::new_for_http())
}

fn diagnostics_router(diag: CacheDiagnostics) -> Router {
    Router::new()
        .route("/debug/cache/stats", get(cache_stats_handler))
        .route("/debug/cache/keys", get(cache_keys_handler))
        .route("/debug/cache", delete(cache_clear_handler))
        .with_state(diag)
}
