#![cfg(test)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use concierge_bot::service::{
    db::{DbClient, DbSession, GenericDbClient},
    http,
};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

// Mocks.

// A session provider whose engine is unreachable.

struct UnreachableDb;

#[async_trait]
impl GenericDbClient for UnreachableDb {
    async fn acquire(&self) -> concierge_bot::base::types::Res<DbSession> {
        Err(anyhow::anyhow!("connection refused"))
    }
}

// Helpers.

async fn memory_router() -> axum::Router {
    let db = DbClient::memory().await.expect("Failed to create DB client");
    http::router(db)
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// Tests.

#[tokio::test]
async fn root_returns_the_service_banner() {
    let app = memory_router().await;

    let response = app.oneshot(Request::builder().uri("/").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"message": "AI Concierge API", "status": "running"}));
}

#[tokio::test]
async fn root_ignores_request_headers() {
    let app = memory_router().await;

    let request = Request::builder()
        .uri("/")
        .header("x-whatever", "ignored")
        .header("authorization", "Bearer nonsense")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"message": "AI Concierge API", "status": "running"}));
}

#[tokio::test]
async fn health_reports_connected_when_a_session_is_acquirable() {
    let app = memory_router().await;

    let response = app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!({"status": "healthy", "database": "connected"}));
}

#[tokio::test]
async fn health_propagates_session_acquisition_failure() {
    let app = http::router(DbClient::new(Arc::new(UnreachableDb)));

    let response = app.oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap()).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn responses_permit_any_origin_with_credentials() {
    for path in ["/", "/health"] {
        let app = memory_router().await;

        let request = Request::builder().uri(path).header("origin", "https://example.com").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();

        let headers = response.headers();
        assert_eq!(headers.get("access-control-allow-origin").and_then(|v| v.to_str().ok()), Some("https://example.com"));
        assert_eq!(headers.get("access-control-allow-credentials").and_then(|v| v.to_str().ok()), Some("true"));
    }
}

#[tokio::test]
async fn preflight_mirrors_requested_method_and_headers() {
    let app = memory_router().await;

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/health")
        .header("origin", "https://app.example.com")
        .header("access-control-request-method", "GET")
        .header("access-control-request-headers", "x-custom-header")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").and_then(|v| v.to_str().ok()), Some("https://app.example.com"));
    assert_eq!(headers.get("access-control-allow-methods").and_then(|v| v.to_str().ok()), Some("GET"));
    assert_eq!(headers.get("access-control-allow-headers").and_then(|v| v.to_str().ok()), Some("x-custom-header"));
}
