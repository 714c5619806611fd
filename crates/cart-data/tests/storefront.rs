//! Storefront client integration tests.
//!
//! Starts an axum server that plays the storefront API and exercises it
//! through `StorefrontClient`.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use cart_cache::MemoryStore;
use cart_core::catalog::{CatalogService, StockService};
use cart_core::notice::NoticeLog;
use cart_core::{CartStore, ProductId, ServiceError};
use cart_data::{
    DependencyTag, FetchClient, FetchError, FetchPolicy, RetryPolicy, StorefrontClient,
    TimeoutConfig,
};

#[derive(Default)]
struct Hits {
    stock: AtomicUsize,
    flaky: AtomicUsize,
}

fn product_json(id: u64) -> Value {
    json!({
        "id": id,
        "title": format!("Tênis {id}"),
        "price": 139.9,
        "image": format!("https://cdn.example.com/{id}.jpg"),
    })
}

async fn stock(State(hits): State<Arc<Hits>>, Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    hits.stock.fetch_add(1, Ordering::SeqCst);
    match id {
        1 => Ok(Json(json!({ "amount": 3 }))),
        2 => Ok(Json(json!({ "id": 2, "amount": 5 }))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn product(Path(id): Path<u64>) -> Result<Json<Value>, StatusCode> {
    match id {
        1 | 2 => Ok(Json(product_json(id))),
        _ => Err(StatusCode::NOT_FOUND),
    }
}

async fn products() -> Json<Value> {
    Json(json!([product_json(1), product_json(2)]))
}

/// Fails with 503 on the first call, then answers.
async fn flaky(State(hits): State<Arc<Hits>>) -> Result<Json<Value>, StatusCode> {
    if hits.flaky.fetch_add(1, Ordering::SeqCst) == 0 {
        return Err(StatusCode::SERVICE_UNAVAILABLE);
    }
    Ok(Json(json!({ "id": 7, "amount": 1 })))
}

async fn slow() -> Json<Value> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!({ "id": 8, "amount": 1 }))
}

async fn garbled() -> &'static str {
    "{\"id\": 9"
}

/// Bind to port 0 and return the base URL plus the hit counters.
async fn start_server() -> (String, Arc<Hits>) {
    let hits = Arc::new(Hits::default());
    let app = Router::new()
        .route("/stock/:id", get(stock))
        .route("/products/:id", get(product))
        .route("/products", get(products))
        .route("/flaky", get(flaky))
        .route("/slow", get(slow))
        .route("/garbled", get(garbled))
        .with_state(hits.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}"), hits)
}

#[tokio::test]
async fn stock_and_product_lookups() {
    let (base, _) = start_server().await;
    let client = StorefrontClient::new(base).unwrap();

    let quote = client.get_stock(ProductId::new(1)).await.unwrap();
    assert_eq!(quote.product_id, ProductId::new(1));
    assert_eq!(quote.available, 3);

    let product = client.get_product(ProductId::new(2)).await.unwrap();
    assert_eq!(product.id, ProductId::new(2));
    assert_eq!(product.title, "Tênis 2");
    assert_eq!(product.price, 139.9);
}

#[tokio::test]
async fn stock_reply_without_id_uses_requested_id() {
    let (base, _) = start_server().await;
    let client = StorefrontClient::new(base).unwrap();

    // Product 1 answers `{"amount": 3}`, product 2 also echoes its id.
    let quote = client.stock(ProductId::new(1)).await.unwrap();
    assert_eq!(quote.product_id, ProductId::new(1));
    assert_eq!(quote.available, 3);

    let quote = client.stock(ProductId::new(2)).await.unwrap();
    assert_eq!(quote.product_id, ProductId::new(2));
    assert_eq!(quote.available, 5);
}

#[tokio::test]
async fn product_listing() {
    let (base, _) = start_server().await;
    let client = StorefrontClient::new(base).unwrap();

    let listed = client.list_products().await.unwrap();
    let ids: Vec<u64> = listed.iter().map(|p| p.id.get()).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[tokio::test]
async fn not_found_is_unavailable_and_not_retried() {
    let (base, hits) = start_server().await;
    let client = StorefrontClient::new(base).unwrap();

    let err = client.get_stock(ProductId::new(99)).await.unwrap_err();
    assert!(matches!(err, ServiceError::Unavailable(_)));
    assert_eq!(hits.stock.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn server_errors_are_retried() {
    let (base, hits) = start_server().await;
    let client = FetchClient::new(base).unwrap();

    let value: Value = client.fetch("flaky", DependencyTag::Inventory).await.unwrap();
    assert_eq!(value["amount"], 1);
    assert_eq!(hits.flaky.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn custom_dependencies_do_not_retry() {
    let (base, hits) = start_server().await;
    let client = FetchClient::new(base).unwrap();

    let err = client
        .fetch::<Value>("flaky", DependencyTag::Custom("flaky"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Http { status: 503, .. }));
    assert_eq!(hits.flaky.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn slow_responses_time_out() {
    let (base, _) = start_server().await;
    let policy = FetchPolicy::new(TimeoutConfig::from_millis(50), RetryPolicy::none());
    let client = FetchClient::new(base)
        .unwrap()
        .with_policy(DependencyTag::Custom("slow"), policy);

    let err = client
        .fetch::<Value>("slow", DependencyTag::Custom("slow"))
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Timeout(_)), "got {err:?}");
}

#[tokio::test]
async fn malformed_bodies_are_invalid_responses() {
    let (base, _) = start_server().await;
    let client = FetchClient::new(base).unwrap();

    let err = client
        .fetch::<Value>("garbled", DependencyTag::Catalog)
        .await
        .unwrap_err();
    assert!(matches!(err, FetchError::Deserialization(_)));
    assert!(matches!(ServiceError::from(err), ServiceError::InvalidResponse(_)));
}

#[tokio::test]
async fn cart_store_over_http() {
    let (base, _) = start_server().await;
    let storefront = Arc::new(StorefrontClient::new(base).unwrap());
    let notices = NoticeLog::new();
    let store = CartStore::builder(storefront.clone(), storefront, Arc::new(MemoryStore::new()))
        .notifier(notices.clone())
        .open()
        .unwrap();

    for _ in 0..3 {
        store.add_product(ProductId::new(1)).await.unwrap();
    }
    assert_eq!(store.cart().amount_of(ProductId::new(1)), 3);

    // Stock for product 1 is 3, so a fourth unit is refused.
    assert!(store.add_product(ProductId::new(1)).await.is_err());
    assert_eq!(store.cart().amount_of(ProductId::new(1)), 3);
    assert_eq!(
        notices.last().map(|n| n.message),
        Some("Requested quantity is out of stock".to_string())
    );
}
