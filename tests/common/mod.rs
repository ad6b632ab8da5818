//! Shared helpers for integration tests.

#![allow(dead_code)]

use axum::{body::Body, http::Request, Router};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use apiserver::api::{create_router, AppState};
use apiserver::config::DbConfig;
use apiserver::infra::Database;

/// Fresh in-memory database with the schema applied.
pub async fn test_database() -> Database {
    Database::connect(&DbConfig::sqlite_memory())
        .await
        .expect("in-memory database")
}

/// Full router over a fresh database.
pub async fn test_app() -> Router {
    let db = test_database().await;
    create_router(AppState::from_database(db), false)
}

/// Send one request through the router and return status, headers and raw body.
pub async fn send(
    app: &Router,
    request: Request<Body>,
) -> (axum::http::StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.expect("router is infallible");
    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("readable body")
        .to_bytes()
        .to_vec();
    (status, headers, body)
}

/// Send a request and parse the body as JSON.
pub async fn send_json(app: &Router, request: Request<Body>) -> (axum::http::StatusCode, Value) {
    let (status, _, body) = send(app, request).await;
    let json = serde_json::from_slice(&body).expect("JSON body");
    (status, json)
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("valid request")
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("valid request")
}
