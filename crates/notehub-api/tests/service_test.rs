//! Health, rate limiting, request ids and API docs.
//!
//! Run with: `cargo test -p notehub-api --test service_test`

mod helpers;

use helpers::{default_settings, setup_test_app, setup_test_app_with};
use notehub_api::RouterSettings;
use serde_json::{json, Value};

#[tokio::test]
async fn test_health_ok() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 200);
    assert_eq!(
        response.json::<Value>(),
        json!({ "status": "ok", "database": true })
    );
}

#[tokio::test]
async fn test_health_degraded_when_database_down() {
    let app = setup_test_app();
    app.health.set_healthy(false);

    let response = app.client().get("/health").await;

    assert_eq!(response.status_code(), 503);
    assert_eq!(
        response.json::<Value>(),
        json!({ "status": "degraded", "database": false })
    );
}

#[tokio::test]
async fn test_rate_limit_per_client_ip() {
    let app = setup_test_app_with(RouterSettings {
        rate_limit_per_window: 2,
        ..default_settings()
    });

    for _ in 0..2 {
        let response = app
            .client()
            .get("/health")
            .add_header("X-Forwarded-For", "203.0.113.7")
            .await;
        assert_eq!(response.status_code(), 200);
    }

    let limited = app
        .client()
        .get("/health")
        .add_header("X-Forwarded-For", "203.0.113.7")
        .await;
    assert_eq!(limited.status_code(), 429);
    assert!(limited.maybe_header("retry-after").is_some());
    assert_eq!(
        limited.json::<Value>(),
        json!({ "success": false, "message": "Too many requests, please try again later." })
    );

    let other_client = app
        .client()
        .get("/health")
        .add_header("X-Forwarded-For", "198.51.100.20")
        .await;
    assert_eq!(other_client.status_code(), 200);
}

#[tokio::test]
async fn test_rate_limit_headers_present() {
    let app = setup_test_app();

    let response = app.client().get("/health").await;

    assert_eq!(response.header("x-ratelimit-limit"), "1000");
    assert!(response.maybe_header("x-ratelimit-remaining").is_some());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let app = setup_test_app();

    let response = app
        .client()
        .get("/health")
        .add_header("x-request-id", "trace-abc-123")
        .await;
    assert_eq!(response.header("x-request-id"), "trace-abc-123");

    let generated = app.client().get("/health").await;
    assert!(!generated.header("x-request-id").is_empty());
}

#[tokio::test]
async fn test_openapi_document_served() {
    let app = setup_test_app();

    let response = app.client().get("/api/openapi.json").await;

    assert_eq!(response.status_code(), 200);
    let doc: Value = response.json();
    assert!(doc["paths"].get("/delete-note").is_some());
    assert!(doc["paths"].get("/health").is_some());
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = setup_test_app();

    let response = app.client().get("/api/v0/nothing-here").await;

    assert_eq!(response.status_code(), 404);
}
