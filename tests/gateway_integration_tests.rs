//! Integration Tests for the Catalog Gateway
//!
//! Drives the full router against a stub upstream API listening on an
//! ephemeral port, counting how often each upstream path is hit.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderMap, Request, StatusCode, Uri},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::{json, Value};
use storefront_cache::{
    api::create_router, cache, models::ProductQuery, AppState, Config, ProductsApi, ResponseCache,
};
use tower::ServiceExt;

const TOKEN: &str = "secret-token";

// == Stub Upstream ==

#[derive(Clone, Default)]
struct Upstream {
    hits: Arc<Mutex<HashMap<String, usize>>>,
    last_auth: Arc<Mutex<Option<String>>>,
    /// Product ids the upstream currently lists
    catalog: Arc<Mutex<Vec<u64>>>,
}

impl Upstream {
    fn record(&self, uri: &Uri, headers: &HeaderMap) {
        *self
            .hits
            .lock()
            .unwrap()
            .entry(uri.path().to_string())
            .or_default() += 1;
        *self.last_auth.lock().unwrap() = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
    }

    fn hits(&self, path: &str) -> usize {
        self.hits.lock().unwrap().get(path).copied().unwrap_or(0)
    }

    fn last_auth(&self) -> Option<String> {
        self.last_auth.lock().unwrap().clone()
    }
}

fn authorized(headers: &HeaderMap) -> bool {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", TOKEN))
}

async fn stub_categories(State(up): State<Upstream>, uri: Uri, headers: HeaderMap) -> Json<Value> {
    up.record(&uri, &headers);
    Json(json!([{"id": 1, "name": "Road"}, {"id": 2, "name": "Mountain"}]))
}

async fn stub_products(
    State(up): State<Upstream>,
    uri: Uri,
    headers: HeaderMap,
    Query(query): Query<HashMap<String, String>>,
) -> Json<Value> {
    up.record(&uri, &headers);
    let listed = up.catalog.lock().unwrap().clone();
    // A slow search answers with the catalog as it was when the request arrived
    if query.get("search").map(String::as_str) == Some("slow") {
        tokio::time::sleep(Duration::from_millis(200)).await;
    }
    let brand = query.get("brand").cloned();
    let products: Vec<Value> = listed
        .iter()
        .map(|id| json!({"id": id, "name": "Roadster", "price": 999.0, "brand": brand}))
        .collect();
    Json(Value::Array(products))
}

async fn stub_featured(State(up): State<Upstream>, uri: Uri, headers: HeaderMap) -> Json<Value> {
    up.record(&uri, &headers);
    tokio::time::sleep(Duration::from_millis(100)).await;
    Json(json!([{"id": 3, "name": "Gravel Pro", "price": 1899.0, "featured": true}]))
}

async fn stub_product(
    State(up): State<Upstream>,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> axum::response::Response {
    up.record(&uri, &headers);
    match id {
        404 => StatusCode::NOT_FOUND.into_response(),
        500 => (StatusCode::OK, "<html>not json</html>").into_response(),
        _ => Json(json!({"id": id, "name": "Roadster", "price": 999.0})).into_response(),
    }
}

async fn stub_reviews(
    State(up): State<Upstream>,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> Json<Value> {
    up.record(&uri, &headers);
    Json(json!([{"id": 10, "product_id": id, "rating": 4, "comment": "Smooth ride"}]))
}

async fn stub_filters(State(up): State<Upstream>, uri: Uri, headers: HeaderMap) -> Json<Value> {
    up.record(&uri, &headers);
    Json(json!({"brands": ["Trek"], "price_range": {"min": 100, "max": 5000}}))
}

async fn stub_create_category(
    State(up): State<Upstream>,
    uri: Uri,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> axum::response::Response {
    up.record(&uri, &headers);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    let created = json!({"id": 3, "name": body["name"]});
    (StatusCode::CREATED, Json(created)).into_response()
}

async fn stub_delete_product(
    State(up): State<Upstream>,
    uri: Uri,
    headers: HeaderMap,
    Path(id): Path<u64>,
) -> StatusCode {
    up.record(&uri, &headers);
    if !authorized(&headers) {
        return StatusCode::UNAUTHORIZED;
    }
    up.catalog.lock().unwrap().retain(|listed| *listed != id);
    StatusCode::NO_CONTENT
}

async fn spawn_upstream() -> (SocketAddr, Upstream) {
    let upstream = Upstream::default();
    upstream.catalog.lock().unwrap().push(1);
    let app = Router::new()
        .route("/api/categories", get(stub_categories))
        .route("/api/products", get(stub_products))
        .route("/api/products/featured", get(stub_featured))
        .route("/api/products/:id", get(stub_product))
        .route("/api/products/:id/reviews", get(stub_reviews))
        .route("/api/filters", get(stub_filters))
        .route("/api/admin/categories", post(stub_create_category))
        .route("/api/admin/products/:id", delete(stub_delete_product))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, upstream)
}

// == Helper Functions ==

fn test_config(addr: SocketAddr) -> Config {
    Config {
        api_base_url: format!("http://{}/api", addr),
        cache_diagnostics: true,
        ..Config::default()
    }
}

fn app_with(config: &Config, max_size: usize, ttl: Duration) -> (Router, ProductsApi) {
    let shared = cache::shared(ResponseCache::new(max_size, ttl));
    let api = ProductsApi::new(config, shared).unwrap();
    (create_router(AppState::new(api.clone())), api)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

// == Caching ==

#[tokio::test]
async fn test_repeated_read_hits_upstream_once() {
    let (addr, upstream) = spawn_upstream().await;
    let (app, _) = app_with(&test_config(addr), 100, Duration::from_secs(60));

    let (status, first) = send(&app, "GET", "/categories", None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = send(&app, "GET", "/categories", None).await;

    assert_eq!(first, second);
    assert_eq!(first[0]["name"], "Road");
    assert_eq!(upstream.hits("/api/categories"), 1);

    let (_, stats) = send(&app, "GET", "/debug/cache/stats", None).await;
    assert_eq!(stats["requests"], 2);
    assert_eq!(stats["hits"], 1);
    assert_eq!(stats["misses"], 1);
    assert_eq!(stats["hit_rate"], 0.5);
}

#[tokio::test]
async fn test_query_order_shares_cache_entry() {
    let (addr, upstream) = spawn_upstream().await;
    let (app, _) = app_with(&test_config(addr), 100, Duration::from_secs(60));

    let (status, first) = send(&app, "GET", "/products?search=bell&brand=Trek", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first[0]["brand"], "Trek");
    send(&app, "GET", "/products?brand=Trek&search=bell", None).await;
    send(&app, "GET", "/products?brand=Giant&search=bell", None).await;

    assert_eq!(upstream.hits("/api/products"), 2);

    let (_, keys) = send(&app, "GET", "/debug/cache/keys", None).await;
    assert_eq!(keys["count"], 2);
    assert_eq!(keys["keys"][0], "/products?brand=Giant&search=bell");
}

#[tokio::test]
async fn test_expired_entry_is_refetched() {
    let (addr, upstream) = spawn_upstream().await;
    let (app, _) = app_with(&test_config(addr), 100, Duration::from_millis(100));

    send(&app, "GET", "/filters", None).await;
    send(&app, "GET", "/filters", None).await;
    assert_eq!(upstream.hits("/api/filters"), 1);

    tokio::time::sleep(Duration::from_millis(150)).await;

    let (status, filters) = send(&app, "GET", "/filters", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(filters["brands"][0], "Trek");
    assert_eq!(upstream.hits("/api/filters"), 2);
}

#[tokio::test]
async fn test_capacity_evicts_least_recently_used() {
    let (addr, upstream) = spawn_upstream().await;
    let (app, _) = app_with(&test_config(addr), 2, Duration::from_secs(60));

    send(&app, "GET", "/categories", None).await;
    send(&app, "GET", "/filters", None).await;
    send(&app, "GET", "/products/7/reviews", None).await;

    let (_, stats) = send(&app, "GET", "/debug/cache/stats", None).await;
    assert_eq!(stats["evictions"], 1);
    assert_eq!(stats["size"], 2);
    assert_eq!(stats["max_size"], 2);

    // The first entry was evicted, so this goes back upstream
    send(&app, "GET", "/categories", None).await;
    assert_eq!(upstream.hits("/api/categories"), 2);
    assert_eq!(upstream.hits("/api/filters"), 1);
}

// Identical misses in flight at the same time are not coalesced: each one
// reaches the upstream, and later reads are served from the cache.
#[tokio::test]
async fn test_concurrent_misses_fetch_independently() {
    let (addr, upstream) = spawn_upstream().await;
    let (_, api) = app_with(&test_config(addr), 100, Duration::from_secs(60));

    let (a, b) = tokio::join!(api.featured_products(), api.featured_products());
    assert_eq!(a.unwrap(), b.unwrap());
    assert_eq!(upstream.hits("/api/products/featured"), 2);

    let cached = api.featured_products().await.unwrap();
    assert_eq!(cached[0].name, "Gravel Pro");
    assert_eq!(upstream.hits("/api/products/featured"), 2);
    assert_eq!(api.cache().read().await.len(), 1);
}

#[tokio::test]
async fn test_client_products_query() {
    let (addr, upstream) = spawn_upstream().await;
    let (_, api) = app_with(&test_config(addr), 100, Duration::from_secs(60));

    let query = ProductQuery {
        brand: Some("Trek".to_string()),
        max_price: Some(1500.0),
        ..Default::default()
    };
    let products = api.products(&query).await.unwrap();
    assert_eq!(products[0].brand.as_deref(), Some("Trek"));

    api.products(&query).await.unwrap();
    assert_eq!(upstream.hits("/api/products"), 1);
}

// A read that started before an admin delete must not write the pre-delete
// listing back into the cache once the delete has invalidated it.
#[tokio::test]
async fn test_read_in_flight_during_admin_delete_is_not_cached() {
    let (addr, upstream) = spawn_upstream().await;
    let config = Config {
        api_token: Some(TOKEN.to_string()),
        ..test_config(addr)
    };
    let (_, api) = app_with(&config, 100, Duration::from_secs(60));

    let query = ProductQuery {
        search: Some("slow".to_string()),
        ..Default::default()
    };

    let reader = api.clone();
    let slow_query = query.clone();
    let in_flight = tokio::spawn(async move { reader.products(&slow_query).await });

    // Let the slow read reach the upstream before deleting
    tokio::time::sleep(Duration::from_millis(50)).await;
    api.delete_product(1).await.unwrap();

    let stale = in_flight.await.unwrap().unwrap();
    assert_eq!(stale.len(), 1);
    assert!(api.cache().read().await.is_empty());

    let fresh = api.products(&query).await.unwrap();
    assert!(fresh.is_empty());
    assert_eq!(upstream.hits("/api/products"), 2);
}

// == Failures ==

#[tokio::test]
async fn test_upstream_not_found_is_not_cached() {
    let (addr, upstream) = spawn_upstream().await;
    let (app, _) = app_with(&test_config(addr), 100, Duration::from_secs(60));

    let (status, body) = send(&app, "GET", "/products/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("product 404"));

    send(&app, "GET", "/products/404", None).await;
    assert_eq!(upstream.hits("/api/products/404"), 2);
}

#[tokio::test]
async fn test_invalid_upstream_body_is_bad_gateway() {
    let (addr, upstream) = spawn_upstream().await;
    let (app, api) = app_with(&test_config(addr), 100, Duration::from_secs(60));

    let (status, body) = send(&app, "GET", "/products/500", None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("product 500"));
    assert!(api.cache().read().await.is_empty());
    assert_eq!(upstream.hits("/api/products/500"), 1);
}

#[tokio::test]
async fn test_invalid_price_range_rejected() {
    let (addr, upstream) = spawn_upstream().await;
    let (app, _) = app_with(&test_config(addr), 100, Duration::from_secs(60));

    let (status, _) = send(&app, "GET", "/products?min_price=900&max_price=100", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(upstream.hits("/api/products"), 0);
}

// == Admin ==

#[tokio::test]
async fn test_admin_without_token_never_reaches_upstream() {
    let (addr, upstream) = spawn_upstream().await;
    let (app, _) = app_with(&test_config(addr), 100, Duration::from_secs(60));

    let (status, body) = send(
        &app,
        "POST",
        "/admin/categories",
        Some(json!({"name": "Helmets"})),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body["error"].as_str().unwrap().contains("API token"));
    assert_eq!(upstream.hits("/api/admin/categories"), 0);
}

#[tokio::test]
async fn test_admin_write_invalidates_cached_reads() {
    let (addr, upstream) = spawn_upstream().await;
    let config = Config {
        api_token: Some(TOKEN.to_string()),
        ..test_config(addr)
    };
    let (app, _) = app_with(&config, 100, Duration::from_secs(60));

    send(&app, "GET", "/categories", None).await;
    send(&app, "GET", "/products/7", None).await;
    assert_eq!(upstream.last_auth(), Some(format!("Bearer {}", TOKEN)));

    let (status, created) = send(
        &app,
        "POST",
        "/admin/categories",
        Some(json!({"name": "Helmets"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], "Helmets");

    // Categories were invalidated, the product entry was not
    send(&app, "GET", "/categories", None).await;
    send(&app, "GET", "/products/7", None).await;
    assert_eq!(upstream.hits("/api/categories"), 2);
    assert_eq!(upstream.hits("/api/products/7"), 1);
}

#[tokio::test]
async fn test_admin_delete_with_empty_body() {
    let (addr, upstream) = spawn_upstream().await;
    let config = Config {
        api_token: Some(TOKEN.to_string()),
        ..test_config(addr)
    };
    let (app, _) = app_with(&config, 100, Duration::from_secs(60));

    send(&app, "GET", "/products/7", None).await;

    let (status, body) = send(&app, "DELETE", "/admin/products/7", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Product 7 deleted");

    send(&app, "GET", "/products/7", None).await;
    assert_eq!(upstream.hits("/api/products/7"), 2);
}

// == Diagnostics ==

#[tokio::test]
async fn test_clear_resets_cache_and_counters() {
    let (addr, upstream) = spawn_upstream().await;
    let (app, _) = app_with(&test_config(addr), 100, Duration::from_secs(60));

    send(&app, "GET", "/categories", None).await;
    send(&app, "GET", "/categories", None).await;

    let (status, cleared) = send(&app, "DELETE", "/debug/cache", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["cleared"], 1);

    let (_, stats) = send(&app, "GET", "/debug/cache/stats", None).await;
    assert_eq!(stats["requests"], 0);
    assert_eq!(stats["hits"], 0);
    assert_eq!(stats["size"], 0);
    assert_eq!(stats["hit_rate"], 0.0);

    send(&app, "GET", "/categories", None).await;
    assert_eq!(upstream.hits("/api/categories"), 2);
}

#[tokio::test]
async fn test_diagnostics_disabled_hides_debug_routes() {
    let (addr, _) = spawn_upstream().await;
    let config = Config {
        cache_diagnostics: false,
        ..test_config(addr)
    };
    let (app, _) = app_with(&config, 100, Duration::from_secs(60));

    let (status, _) = send(&app, "GET", "/debug/cache/stats", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, "DELETE", "/debug/cache", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["diagnostics"], false);
}
