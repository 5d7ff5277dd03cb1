//! Integration Tests for API Endpoints
//!
//! Tests the full request/response cycle for each endpoint against an
//! in-memory fetcher.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use serde_json::Value;
use tokio_test::assert_ok;
use tower::ServiceExt;
use weather_cache::{
    api::create_router, models::WeatherData, AppState, CacheConfig, FetchError, Mode, Registry,
    WeatherFetcher,
};

// == Helper Types ==

/// Answers every city except "atlantis", counting calls.
#[derive(Default)]
struct CountingFetcher {
    calls: AtomicUsize,
}

#[async_trait]
impl WeatherFetcher for CountingFetcher {
    async fn fetch(&self, city: &str) -> Result<WeatherData, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if city.eq_ignore_ascii_case("atlantis") {
            return Err(FetchError::NotFound(city.to_string()));
        }
        Ok(WeatherData {
            name: Some(city.to_string()),
            ..WeatherData::default()
        })
    }
}

// == Helper Functions ==

fn create_test_app() -> (Router, Arc<CountingFetcher>) {
    let fetcher = Arc::new(CountingFetcher::default());
    let registry = Registry::with_fetcher(CacheConfig::default(), fetcher.clone());
    (create_router(AppState::new(registry)), fetcher)
}

async fn body_to_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

fn create_client_request(body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/clients")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn weather_request(city: &str, api_key: &str) -> Request<Body> {
    Request::builder()
        .uri(format!("/weather/{}", city))
        .header("x-api-key", api_key)
        .body(Body::empty())
        .unwrap()
}

// == Client Registration Tests ==

#[tokio::test]
async fn test_create_client_success() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(create_client_request(r#"{"api_key":"key-1","mode":"on_demand"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["mode"], "on_demand");
}

#[tokio::test]
async fn test_create_client_is_idempotent() {
    let (app, _) = create_test_app();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(create_client_request(r#"{"api_key":" key-1 ","mode":"on_demand"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}

#[tokio::test]
async fn test_create_client_mode_conflict() {
    let (app, _) = create_test_app();

    app.clone()
        .oneshot(create_client_request(r#"{"api_key":"key-1","mode":"on_demand"}"#))
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(create_client_request(r#"{"api_key":"key-1","mode":"polling"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("on_demand"));

    let stats = app
        .oneshot(
            Request::builder()
                .uri("/stats")
                .header("x-api-key", "key-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let json = body_to_json(stats.into_body()).await;
    assert_eq!(json["mode"], "on_demand");
}

#[tokio::test]
async fn test_create_client_missing_mode() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(create_client_request(r#"{"api_key":"key-1"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_client_blank_key() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(create_client_request(r#"{"api_key":"   ","mode":"polling"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// == Weather Endpoint Tests ==

#[tokio::test]
async fn test_weather_is_cached_per_city() {
    let (app, fetcher) = create_test_app();

    app.clone()
        .oneshot(create_client_request(r#"{"api_key":"key-1","mode":"on_demand"}"#))
        .await
        .unwrap();

    for city in ["Paris", "paris", "%20PARIS%20"] {
        let response = app.clone().oneshot(weather_request(city, "key-1")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_to_json(response.into_body()).await;
        assert_eq!(json["weather"]["name"], "Paris");
    }

    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_weather_city_not_found() {
    let (app, _) = create_test_app();

    app.clone()
        .oneshot(create_client_request(r#"{"api_key":"key-1","mode":"on_demand"}"#))
        .await
        .unwrap();

    let response = app.oneshot(weather_request("Atlantis", "key-1")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_to_json(response.into_body()).await;
    assert!(json["error"].as_str().unwrap().contains("Atlantis"));
}

#[tokio::test]
async fn test_weather_requires_registered_client() {
    let (app, fetcher) = create_test_app();

    let response = app.oneshot(weather_request("Paris", "nobody")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
}

// == Delete Endpoint Tests ==

#[tokio::test]
async fn test_delete_client() {
    let (app, _) = create_test_app();

    app.clone()
        .oneshot(create_client_request(r#"{"api_key":"key-1","mode":"polling"}"#))
        .await
        .unwrap();

    let delete = || {
        Request::builder()
            .method("DELETE")
            .uri("/clients")
            .header("x-api-key", "key-1")
            .body(Body::empty())
            .unwrap()
    };

    let first = app.clone().oneshot(delete()).await.unwrap();
    let json = body_to_json(first.into_body()).await;
    assert_eq!(json["deleted"], true);

    let second = app.clone().oneshot(delete()).await.unwrap();
    let json = body_to_json(second.into_body()).await;
    assert_eq!(json["deleted"], false);

    let response = app.oneshot(weather_request("Paris", "key-1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// == Stats Endpoint Tests ==

#[tokio::test]
async fn test_stats_reflect_lookups() {
    let (app, _) = create_test_app();

    app.clone()
        .oneshot(create_client_request(r#"{"api_key":"key-1","mode":"on_demand"}"#))
        .await
        .unwrap();
    app.clone().oneshot(weather_request("Rome", "key-1")).await.unwrap();
    app.clone().oneshot(weather_request("Rome", "key-1")).await.unwrap();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/stats")
                .header("x-api-key", "key-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["size"], 1);
    assert_eq!(json["capacity"], 10);
    assert_eq!(json["hits"], 1);
    assert_eq!(json["misses"], 1);
}

// == Library Surface Tests ==

#[tokio::test]
async fn test_registry_library_surface() {
    let fetcher = Arc::new(CountingFetcher::default());
    let registry = Registry::with_fetcher(CacheConfig::default(), fetcher);

    let client = assert_ok!(registry.create("key", Mode::OnDemand).await);
    assert_ok!(client.lookup("Lima").await);

    assert_eq!(client.size().await, 1);
    assert!(registry.delete("key").await);
    assert!(registry.get("key").await.is_none());
}

// == Health Endpoint Tests ==

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = create_test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_to_json(response.into_body()).await;
    assert_eq!(json["status"], "healthy");
}
