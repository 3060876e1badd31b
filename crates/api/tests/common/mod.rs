#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use tracker_api::config::ServerConfig;
use tracker_api::router::build_app_router;
use tracker_api::service::LedgerService;
use tracker_api::state::AppState;
use tracker_core::clock::SystemClock;
use tracker_core::revision::LogicRevision;
use tracker_core::state::LedgerState;
use tracker_events::EventBus;

/// Identity that initializes every test ledger.
pub const OWNER: u64 = 1;

/// Build a test `ServerConfig` with safe defaults and no database.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        database_url: None,
        logic_revision: LogicRevision::LATEST,
    }
}

/// An in-memory app plus a handle on its event bus.
pub struct TestApp {
    pub router: Router,
    pub event_bus: Arc<EventBus>,
}

/// Build the full application router on a fresh in-memory ledger running
/// `revision`.
pub fn build_test_app_with(revision: LogicRevision) -> TestApp {
    let config = test_config();
    let event_bus = Arc::new(EventBus::default());
    let ledger = LedgerService::new(
        LedgerState::new(revision),
        Arc::new(SystemClock),
        None,
        Arc::clone(&event_bus),
    );

    let state = AppState {
        ledger: Arc::new(ledger),
        pool: None,
        config: Arc::new(config.clone()),
        event_bus: Arc::clone(&event_bus),
    };

    TestApp {
        router: build_app_router(state, &config).unwrap(),
        event_bus,
    }
}

pub fn build_test_app() -> TestApp {
    build_test_app_with(LogicRevision::LATEST)
}

/// Same as [`build_test_app`], with `OWNER` already holding every role.
pub async fn initialized_app() -> TestApp {
    let app = build_test_app();
    let response = post(&app.router, "/api/v1/ledger/initialize", Some(OWNER), None).await;
    assert_eq!(response.status(), axum::http::StatusCode::NO_CONTENT);
    app
}

pub async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    caller: Option<u64>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(caller) = caller {
        builder = builder.header("x-caller-id", caller.to_string());
    }
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    router.clone().oneshot(request).await.unwrap()
}

pub async fn get(router: &Router, uri: &str) -> Response<Body> {
    send(router, Method::GET, uri, None, None).await
}

pub async fn post(
    router: &Router,
    uri: &str,
    caller: Option<u64>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    send(router, Method::POST, uri, caller, body).await
}

pub async fn put(
    router: &Router,
    uri: &str,
    caller: Option<u64>,
    body: serde_json::Value,
) -> Response<Body> {
    send(router, Method::PUT, uri, caller, Some(body)).await
}

pub async fn delete(router: &Router, uri: &str, caller: Option<u64>) -> Response<Body> {
    send(router, Method::DELETE, uri, caller, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// A valid project creation body with a far-future deadline.
pub fn project_body(id: u64, total_tasks: u64, milestone_ids: &[u64]) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "deadline": "2100-01-01T00:00:00Z",
        "updated_at": "2026-01-01T00:00:00Z",
        "completed_at": "2026-01-01T00:00:00Z",
        "total_tasks": total_tasks,
        "client_id": 100,
        "developer_id": 200,
        "cost": 5000,
        "milestone_ids": milestone_ids,
    })
}
