//! Handler tests for the products domain
//!
//! Drive the router through `oneshot()` over the in-memory repository:
//! - Request deserialization and validation
//! - HTTP status codes and response bodies
//! - Error envelopes
//!
//! The router is mounted under `/products` the way the binary mounts it.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use domain_products::*;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use test_utils::assertions::{assert_non_decreasing, assert_non_increasing};
use tower::ServiceExt; // For oneshot()

fn app() -> Router {
    let service = ProductService::new(InMemoryProductRepository::new());
    Router::new().nest("/products", handlers::router(service))
}

// Helper to parse JSON response body
async fn json_body<T: serde::de::DeserializeOwned>(body: Body) -> T {
    let bytes = body.collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(serde_json::to_string(&value).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn create(app: &Router, name: &str, price: f64) -> Product {
    let (status, body) = send(
        app,
        "POST",
        "/products",
        Some(json!({ "name": name, "description": "test", "price": price })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    serde_json::from_value(body).unwrap()
}

#[tokio::test]
async fn test_create_product_returns_201() {
    let app = app();

    let request = Request::builder()
        .method("POST")
        .uri("/products")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "name": "Widget", "price": 9.99 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let product: Product = json_body(response.into_body()).await;
    assert_eq!(product.name, "Widget");
    assert_eq!(product.description, "");
    assert_eq!(product.price, 9.99);
    assert!(!product.id.is_nil());
}

#[tokio::test]
async fn test_create_product_validates_input() {
    let app = app();

    let (status, body) = send(&app, "POST", "/products", Some(json!({ "name": "", "price": 5 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (status, _) = send(&app, "POST", "/products", Some(json!({ "name": "A", "price": 0 }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/products", Some(json!({ "name": "A" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = send(&app, "GET", "/products", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn test_create_product_rejects_malformed_json() {
    let request = Request::builder()
        .method("POST")
        .uri("/products")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": \"Widget\", "))
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_products_returns_all() {
    let app = app();
    let first = create(&app, "First", 1.0).await;
    let second = create(&app, "Second", 2.0).await;

    let (status, body) = send(&app, "GET", "/products", None).await;
    assert_eq!(status, StatusCode::OK);

    let products: Vec<Product> = serde_json::from_value(body).unwrap();
    assert_eq!(products, vec![first, second]);
}

#[tokio::test]
async fn test_get_product_by_id() {
    let app = app();
    let created = create(&app, "Widget", 3.5).await;

    let (status, body) = send(&app, "GET", &format!("/products/{}", created.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(serde_json::from_value::<Product>(body).unwrap(), created);
}

#[tokio::test]
async fn test_get_product_bad_and_unknown_ids() {
    let app = app();

    let (status, body) = send(&app, "GET", "/products/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_UUID");

    let (status, body) = send(
        &app,
        "GET",
        "/products/0190f1f4-6a2e-7c3b-9d4f-2b1e8a7c6d5e",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_update_product_replaces_fields() {
    let app = app();
    let created = create(&app, "Old", 1.0).await;
    let uri = format!("/products/{}", created.id);

    let (status, body) = send(
        &app,
        "PUT",
        &uri,
        Some(json!({ "name": "New", "description": "fresh", "price": 42.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (_, body) = send(&app, "GET", &uri, None).await;
    let fetched: Product = serde_json::from_value(body).unwrap();
    assert_eq!(fetched.name, "New");
    assert_eq!(fetched.description, "fresh");
    assert_eq!(fetched.price, 42.0);
    assert_eq!(fetched.id, created.id);
    assert_eq!(fetched.created_at, created.created_at);
}

#[tokio::test]
async fn test_update_unknown_product_is_404() {
    let (status, _) = send(
        &app(),
        "PUT",
        "/products/0190f1f4-6a2e-7c3b-9d4f-2b1e8a7c6d5e",
        Some(json!({ "name": "New", "price": 1.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_patch_product_sets_subset() {
    let app = app();
    let created = create(&app, "Widget", 10.0).await;
    let uri = format!("/products/{}", created.id);

    let (status, body) = send(&app, "PATCH", &uri, Some(json!({ "price": 12.5 }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (_, body) = send(&app, "GET", &uri, None).await;
    let fetched: Product = serde_json::from_value(body).unwrap();
    assert_eq!(fetched.price, 12.5);
    assert_eq!(fetched.name, "Widget");
}

#[tokio::test]
async fn test_patch_with_string_price_leaves_record_unchanged() {
    let app = app();
    let created = create(&app, "Widget", 10.0).await;
    let uri = format!("/products/{}", created.id);

    let (status, body) = send(
        &app,
        "PATCH",
        &uri,
        Some(json!({ "name": "Renamed", "price": "12" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");

    let (_, body) = send(&app, "GET", &uri, None).await;
    assert_eq!(serde_json::from_value::<Product>(body).unwrap(), created);
}

#[tokio::test]
async fn test_patch_rejects_protected_fields() {
    let app = app();
    let created = create(&app, "Widget", 10.0).await;

    let (status, _) = send(
        &app,
        "PATCH",
        &format!("/products/{}", created.id),
        Some(json!({ "created_at": "2020-01-01T00:00:00Z" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_delete_product_twice() {
    let app = app();
    let created = create(&app, "Widget", 10.0).await;
    let uri = format!("/products/{}", created.id);

    let (status, body) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, _) = send(&app, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_search_by_name_is_case_insensitive() {
    let app = app();
    create(&app, "widget", 1.0).await;
    create(&app, "WIDGET-2", 2.0).await;
    create(&app, "Gadget", 3.0).await;

    let (status, body) = send(&app, "GET", "/products/search?name=Widget", None).await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<String> = serde_json::from_value::<Vec<Product>>(body)
        .unwrap()
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, vec!["widget", "WIDGET-2"]);
}

#[tokio::test]
async fn test_search_price_range_and_order() {
    let app = app();
    for price in [5.0, 10.0, 15.0, 20.0, 25.0] {
        create(&app, "Item", price).await;
    }

    let (status, body) = send(
        &app,
        "GET",
        "/products/search?minPrice=10&maxPrice=20&sort=desc",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let prices: Vec<f64> = serde_json::from_value::<Vec<Product>>(body)
        .unwrap()
        .into_iter()
        .map(|p| p.price)
        .collect();
    assert_eq!(prices.len(), 3);
    assert!(prices.iter().all(|p| (10.0..=20.0).contains(p)));
    assert_non_increasing(&prices, "sort=desc");

    let (_, body) = send(&app, "GET", "/products/search?sort=asc", None).await;
    let prices: Vec<f64> = serde_json::from_value::<Vec<Product>>(body)
        .unwrap()
        .into_iter()
        .map(|p| p.price)
        .collect();
    assert_eq!(prices.len(), 5);
    assert_non_decreasing(&prices, "sort=asc");
}

#[tokio::test]
async fn test_search_zero_bound_means_unbounded() {
    let app = app();
    create(&app, "Cheap", 0.5).await;

    let (_, body) = send(&app, "GET", "/products/search?minPrice=0&maxPrice=0", None).await;
    assert_eq!(body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_search_rejects_malformed_bound() {
    let (status, body) = send(&app(), "GET", "/products/search?minPrice=cheap", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "VALIDATION_ERROR");
}
