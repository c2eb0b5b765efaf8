//! API Handlers
//!
//! HTTP request handlers for the catalog gateway endpoints.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::cache::CacheStats;
use crate::client::ProductsApi;
use crate::config::Config;
use crate::diagnostics::CacheDiagnostics;
use crate::error::{ApiError, Result};
use crate::models::{
    AdminResponse, CacheKeysResponse, Category, CategoryInput, ClearResponse, FilterConfig,
    HealthResponse, Product, ProductInput, ProductQuery, Review,
};

/// Application state shared across all handlers.
///
/// Holds the catalog client; the response cache lives inside it.
#[derive(Clone)]
pub struct AppState {
    /// Cached upstream client
    pub api: ProductsApi,
}

impl AppState {
    /// Creates a new AppState around an existing client.
    pub fn new(api: ProductsApi) -> Self {
        Self { api }
    }

    /// Creates a new AppState from configuration, with a fresh cache.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(ProductsApi::from_config(config)?))
    }
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.api.diagnostics_enabled()))
}

// == Catalog ==

/// Handler for GET /categories
pub async fn categories_handler(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.api.categories().await?))
}

/// Handler for GET /products
///
/// Query parameters mirror the storefront's filter and search state.
pub async fn products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductQuery>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.api.products(&query).await?))
}

/// Handler for GET /products/featured
pub async fn featured_handler(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(state.api.featured_products().await?))
}

/// Handler for GET /products/:id
pub async fn product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Product>> {
    Ok(Json(state.api.product(id).await?))
}

/// Handler for GET /products/:id/reviews
pub async fn reviews_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<Vec<Review>>> {
    Ok(Json(state.api.product_reviews(id).await?))
}

/// Handler for GET /filters
pub async fn filters_handler(State(state): State<AppState>) -> Result<Json<FilterConfig>> {
    Ok(Json(state.api.filter_config().await?))
}

// == Admin ==

pub async fn create_category_handler(
    State(state): State<AppState>,
    Json(input): Json<CategoryInput>,
) -> Result<(StatusCode, Json<Category>)> {
    let category = state.api.create_category(&input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn update_category_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<CategoryInput>,
) -> Result<Json<Category>> {
    Ok(Json(state.api.update_category(id, &input).await?))
}

pub async fn delete_category_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AdminResponse>> {
    state.api.delete_category(id).await?;
    Ok(Json(AdminResponse::new(format!("Category {} deleted", id))))
}

pub async fn create_product_handler(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> Result<(StatusCode, Json<Product>)> {
    let product = state.api.create_product(&input).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(input): Json<ProductInput>,
) -> Result<Json<Product>> {
    Ok(Json(state.api.update_product(id, &input).await?))
}

pub async fn delete_product_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AdminResponse>> {
    state.api.delete_product(id).await?;
    Ok(Json(AdminResponse::new(format!("Product {} deleted", id))))
}

pub async fn approve_review_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AdminResponse>> {
    state.api.approve_review(id).await?;
    Ok(Json(AdminResponse::new(format!("Review {} approved", id))))
}

pub async fn delete_review_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> Result<Json<AdminResponse>> {
    state.api.delete_review(id).await?;
    Ok(Json(AdminResponse::new(format!("Review {} deleted", id))))
}

// == Diagnostics ==

/// Handler for GET /debug/cache/stats
pub async fn cache_stats_handler(State(diag): State<CacheDiagnostics>) -> Json<CacheStats> {
    Json(diag.stats().await)
}

/// Handler for GET /debug/cache/keys
pub async fn cache_keys_handler(State(diag): State<CacheDiagnostics>) -> Json<CacheKeysResponse> {
    Json(CacheKeysResponse::new(diag.keys().await))
}

/// Handler for DELETE /debug/cache
pub async fn cache_clear_handler(State(diag): State<CacheDiagnostics>) -> Json<ClearResponse> {
    Json(ClearResponse::new(diag.clear().await))
}

/// Fallback for unknown paths.
pub async fn not_found_handler() -> ApiError {
    ApiError::NotFound("route".to_string())
}
