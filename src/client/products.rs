//! Catalog API Client
//!
//! Cached access to the storefront REST API. Reads go through the shared
//! response cache; admin writes go straight to the network and invalidate
//! the cached endpoints they affect.

use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{self, CacheKey, ResponseCache, SharedCache};
use crate::config::Config;
use crate::diagnostics::CacheDiagnostics;
use crate::error::{ApiError, Result};
use crate::models::{
    Category, CategoryInput, FilterConfig, Product, ProductInput, ProductQuery, Review,
};

// Cached endpoint prefixes, used for invalidation after admin writes
const CATEGORIES: &str = "/categories";
const PRODUCTS: &str = "/products";
const FILTERS: &str = "/filters";

/// Client for the storefront catalog API.
///
/// The cache is injected, so several clients (or a client and the
/// diagnostics routes) can share one. Concurrent misses for the same key are
/// not coalesced: each caller fetches independently and the last response
/// to arrive is the one left in the cache.
#[derive(Clone)]
pub struct ProductsApi {
    http: Client,
    base_url: String,
    token: Option<String>,
    cache: SharedCache,
    diagnostics: bool,
    monitor_interval: Duration,
}

impl ProductsApi {
    /// Creates a client over an existing cache.
    pub fn new(config: &Config, cache: SharedCache) -> Result<Self> {
        let http = Client::builder()
            .timeout(config.request_timeout_duration())
            .build()
            .map_err(|e| ApiError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            token: config.api_token.clone(),
            cache,
            diagnostics: config.cache_diagnostics,
            monitor_interval: Duration::from_secs(config.monitor_interval.max(1)),
        })
    }

    /// Creates a client together with a fresh cache sized from the config.
    pub fn from_config(config: &Config) -> Result<Self> {
        let cache = cache::shared(ResponseCache::new(
            config.cache_max_size,
            config.cache_ttl_duration(),
        ));
        Self::new(config, cache)
    }

    pub fn cache(&self) -> &SharedCache {
        &self.cache
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics
    }

    /// Diagnostics handle, only when enabled in the configuration.
    pub fn diagnostics(&self) -> Option<CacheDiagnostics> {
        self.diagnostics
            .then(|| CacheDiagnostics::new(self.cache.clone(), self.monitor_interval))
    }

    // == Catalog reads ==

    pub async fn categories(&self) -> Result<Vec<Category>> {
        self.get_cached("categories", CATEGORIES, &[]).await
    }

    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>> {
        if let Some(msg) = query.validate() {
            return Err(ApiError::InvalidRequest(msg));
        }
        self.get_cached("products", PRODUCTS, &query.to_params())
            .await
    }

    pub async fn product(&self, id: u64) -> Result<Product> {
        let path = format!("{}/{}", PRODUCTS, id);
        self.get_cached(&format!("product {}", id), &path, &[])
            .await
    }

    pub async fn product_reviews(&self, id: u64) -> Result<Vec<Review>> {
        let path = format!("{}/{}/reviews", PRODUCTS, id);
        self.get_cached(&format!("reviews for product {}", id), &path, &[])
            .await
    }

    pub async fn featured_products(&self) -> Result<Vec<Product>> {
        let path = format!("{}/featured", PRODUCTS);
        self.get_cached("featured products", &path, &[]).await
    }

    pub async fn filter_config(&self) -> Result<FilterConfig> {
        self.get_cached("filter configuration", FILTERS, &[]).await
    }

    // == Admin writes ==

    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category> {
        validate(input.validate())?;
        let body = self
            .send_admin(Method::POST, "category", "/admin/categories", Some(input))
            .await?;
        self.invalidate(&[CATEGORIES, FILTERS]).await;
        decode("category", body)
    }

    pub async fn update_category(&self, id: u64, input: &CategoryInput) -> Result<Category> {
        validate(input.validate())?;
        let path = format!("/admin/categories/{}", id);
        let body = self
            .send_admin(Method::PUT, "category", &path, Some(input))
            .await?;
        self.invalidate(&[CATEGORIES, FILTERS, PRODUCTS]).await;
        decode("category", body)
    }

    pub async fn delete_category(&self, id: u64) -> Result<()> {
        let path = format!("/admin/categories/{}", id);
        self.send_admin::<()>(Method::DELETE, "category", &path, None)
            .await?;
        self.invalidate(&[CATEGORIES, FILTERS, PRODUCTS]).await;
        Ok(())
    }

    pub async fn create_product(&self, input: &ProductInput) -> Result<Product> {
        validate(input.validate())?;
        let body = self
            .send_admin(Method::POST, "product", "/admin/products", Some(input))
            .await?;
        self.invalidate(&[PRODUCTS, FILTERS]).await;
        decode("product", body)
    }

    pub async fn update_product(&self, id: u64, input: &ProductInput) -> Result<Product> {
        validate(input.validate())?;
        let path = format!("/admin/products/{}", id);
        let body = self
            .send_admin(Method::PUT, "product", &path, Some(input))
            .await?;
        self.invalidate(&[PRODUCTS, FILTERS]).await;
        decode("product", body)
    }

    pub async fn delete_product(&self, id: u64) -> Result<()> {
        let path = format!("/admin/products/{}", id);
        self.send_admin::<()>(Method::DELETE, "product", &path, None)
            .await?;
        self.invalidate(&[PRODUCTS, FILTERS]).await;
        Ok(())
    }

    pub async fn approve_review(&self, id: u64) -> Result<()> {
        let path = format!("/admin/reviews/{}/approve", id);
        self.send_admin::<()>(Method::PUT, "review", &path, None)
            .await?;
        self.invalidate(&[PRODUCTS]).await;
        Ok(())
    }

    pub async fn delete_review(&self, id: u64) -> Result<()> {
        let path = format!("/admin/reviews/{}", id);
        self.send_admin::<()>(Method::DELETE, "review", &path, None)
            .await?;
        self.invalidate(&[PRODUCTS]).await;
        Ok(())
    }

    // == Internals ==

    /// Serves from cache or fetches, decodes and stores.
    ///
    /// The cache lock is released before the network call. The fetched value
    /// is only stored if no invalidation ran while it was in flight.
    async fn get_cached<T: DeserializeOwned>(
        &self,
        resource: &str,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<T> {
        let key = CacheKey::new(path, params);

        let (cached, generation) = {
            let mut cache = self.cache.write().await;
            (cache.get(&key), cache.generation())
        };
        if let Some(value) = cached {
            debug!(key = %key, "cache hit");
            return decode(resource, value);
        }

        debug!(key = %key, "cache miss, fetching from upstream");
        let value = self.fetch(resource, path, params).await?;
        let decoded = decode(resource, value.clone())?;
        let stored = self
            .cache
            .write()
            .await
            .set_if_generation(key.clone(), value, generation);
        if !stored {
            debug!(key = %key, "cache invalidated during fetch, response not stored");
        }
        Ok(decoded)
    }

    async fn fetch(
        &self,
        resource: &str,
        path: &str,
        params: &[(&'static str, String)],
    ) -> Result<Value> {
        let request = self.request(Method::GET, path).query(params);
        let response = request
            .send()
            .await
            .map_err(|e| ApiError::fetch(resource, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Upstream returned {} for {}", status, path);
            return Err(ApiError::from_status(resource, status));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ApiError::fetch(resource, e))
    }

    async fn send_admin<B: Serialize>(
        &self,
        method: Method,
        resource: &str,
        path: &str,
        body: Option<&B>,
    ) -> Result<Value> {
        if self.token.is_none() {
            return Err(ApiError::Unauthorized(format!(
                "admin {} operations require an API token",
                resource
            )));
        }

        let mut request = self.request(method.clone(), path);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| ApiError::fetch(resource, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("Admin {} {} rejected with {}", method, path, status);
            return Err(ApiError::from_status(resource, status));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ApiError::fetch(resource, e))?;
        info!("Admin {} {} succeeded", method, path);

        if bytes.is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_slice(&bytes).map_err(|e| ApiError::Decode {
            resource: resource.to_string(),
            message: e.to_string(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        let request = self.http.request(method, url);
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn invalidate(&self, prefixes: &[&str]) {
        let mut cache = self.cache.write().await;
        let removed: usize = prefixes
            .iter()
            .map(|prefix| cache.invalidate_prefix(prefix))
            .sum();
        debug!("Invalidated {} cached responses under {:?}", removed, prefixes);
    }
}

fn validate(problem: Option<String>) -> Result<()> {
    match problem {
        Some(msg) => Err(ApiError::InvalidRequest(msg)),
        None => Ok(()),
    }
}

fn decode<T: DeserializeOwned>(resource: &str, value: Value) -> Result<T> {
    serde_json::from_value(value).map_err(|e| ApiError::Decode {
        resource: resource.to_string(),
        message: e.to_string(),
    })
}
