//! Integration tests for API endpoints.
//!
//! Most tests run the full router over an in-memory SQLite database; a
//! hand-written service covers paths storage cannot trigger.

mod common;

use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request, http::StatusCode};
use serde_json::{json, Value};

use apiserver::api::{create_router, AppState};
use apiserver::domain::{NewUser, User};
use apiserver::errors::AppResult;
use apiserver::services::UserService;

use common::{get, json_request, send, send_json, test_app};

// =============================================================================
// Mock Services for Testing
// =============================================================================

/// Service whose every call panics, to exercise the recovery layer
struct PanickingUserService;

#[async_trait]
impl UserService for PanickingUserService {
    async fn create_user(&self, _user: NewUser) -> AppResult<User> {
        panic!("create exploded")
    }

    async fn update_user(&self, _id: i64, _user: NewUser) -> AppResult<User> {
        panic!("update exploded")
    }

    async fn delete_user(&self, _id: i64) -> AppResult<()> {
        panic!("delete exploded")
    }

    async fn get_user(&self, _id: i64) -> AppResult<Option<User>> {
        panic!("get exploded")
    }

    async fn get_user_by_name(&self, _username: &str) -> AppResult<Option<User>> {
        panic!("get by name exploded")
    }

    async fn list_users(&self, _filter: Option<String>, _page: i64) -> AppResult<(Vec<User>, u64)> {
        panic!("list exploded")
    }
}

// =============================================================================
// User endpoints
// =============================================================================

#[tokio::test]
async fn test_create_user_envelope() {
    let app = test_app().await;

    let (status, body) = send_json(
        &app,
        json_request("POST", "/v1/user", json!({"username": "alice", "password": "pw1"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({"code": 0, "message": "OK", "data": {"username": "alice"}})
    );
}

#[tokio::test]
async fn test_duplicate_create_returns_non_zero_code() {
    let app = test_app().await;
    let payload = json!({"username": "alice", "password": "pw1"});

    send_json(&app, json_request("POST", "/v1/user", payload.clone())).await;
    let (status, body) = send_json(&app, json_request("POST", "/v1/user", payload)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], 20002);
    assert_eq!(body["message"], "Database error.");
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn test_missing_field_is_bind_error() {
    let app = test_app().await;

    let (status, body) =
        send_json(&app, json_request("POST", "/v1/user", json!({"username": "alice"}))).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10002);
}

#[tokio::test]
async fn test_malformed_json_is_bind_error() {
    let app = test_app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/v1/user")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = send_json(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10002);
}

#[tokio::test]
async fn test_empty_username_is_validation_error() {
    let app = test_app().await;

    let (status, body) = send_json(
        &app,
        json_request("POST", "/v1/user", json!({"username": "", "password": "pw1"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 20001);
    assert_eq!(body["message"], "Validation failed.");
}

#[tokio::test]
async fn test_get_user_by_username() {
    let app = test_app().await;
    send_json(
        &app,
        json_request("POST", "/v1/user", json!({"username": "kong", "password": "secret"})),
    )
    .await;

    let (status, body) = send_json(&app, get("/v1/user/kong")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["username"], "kong");
    assert!(body["data"]["id"].as_i64().unwrap() > 0);
    assert!(body["data"].get("password").is_none());
}

#[tokio::test]
async fn test_get_unknown_user_is_not_found() {
    let app = test_app().await;

    let (status, body) = send_json(&app, get("/v1/user/ghost")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 20102);
}

#[tokio::test]
async fn test_list_users() {
    let app = test_app().await;
    for name in ["kong", "king", "alice"] {
        send_json(
            &app,
            json_request("POST", "/v1/user", json!({"username": name, "password": "pw"})),
        )
        .await;
    }

    let (status, body) = send_json(&app, get("/v1/user?username=k&page=1")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["totalCount"], 2);
    let names: Vec<&str> = body["data"]["userList"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["username"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["king", "kong"]);

    let (_, body) = send_json(&app, get("/v1/user")).await;
    assert_eq!(body["data"]["totalCount"], 3);
}

#[tokio::test]
async fn test_list_users_malformed_page_is_bind_error() {
    let app = test_app().await;

    let (status, body) = send_json(&app, get("/v1/user?page=abc")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10002);
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn test_list_users_max_page_is_empty() {
    let app = test_app().await;
    send_json(
        &app,
        json_request("POST", "/v1/user", json!({"username": "kong", "password": "pw"})),
    )
    .await;

    let (status, body) = send_json(&app, get("/v1/user?page=9223372036854775807")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["totalCount"], 1);
    assert_eq!(body["data"]["userList"], json!([]));
}

#[tokio::test]
async fn test_update_then_delete_user() {
    let app = test_app().await;
    send_json(
        &app,
        json_request("POST", "/v1/user", json!({"username": "kong", "password": "secret"})),
    )
    .await;
    let (_, body) = send_json(&app, get("/v1/user/kong")).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send_json(
        &app,
        json_request(
            "PUT",
            &format!("/v1/user/{}", id),
            json!({"username": "king", "password": "new"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"code": 0, "message": "OK", "data": null}));

    let (status, _) = send_json(&app, get("/v1/user/king")).await;
    assert_eq!(status, StatusCode::OK);

    let request = Request::builder()
        .method("DELETE")
        .uri(format!("/v1/user/{}", id))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send_json(&app, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], Value::Null);

    let (status, _) = send_json(&app, get("/v1/user/king")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_non_numeric_id_is_bind_error() {
    let app = test_app().await;
    let request = Request::builder()
        .method("DELETE")
        .uri("/v1/user/abc")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send_json(&app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 10002);
}

#[tokio::test]
async fn test_delete_unknown_id_is_not_found() {
    let app = test_app().await;
    let request = Request::builder()
        .method("DELETE")
        .uri("/v1/user/999")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send_json(&app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], 20102);
}

// =============================================================================
// Service endpoints and middleware
// =============================================================================

#[tokio::test]
async fn test_root_and_version() {
    let app = test_app().await;

    let (status, body) = send_json(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["text"], "Welcome to api server.");

    let (status, body) = send_json(&app, get("/version")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_health_probe() {
    let app = test_app().await;

    let (status, _, body) = send(&app, get("/sd/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn test_unknown_route_is_plain_404() {
    let app = test_app().await;

    let (status, headers, body) = send(&app, get("/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!body.is_empty());
    assert!(serde_json::from_slice::<Value>(&body).is_err());
    // Middleware still applies to the fallback
    assert!(headers.contains_key("x-apiserver-version"));
}

#[tokio::test]
async fn test_response_headers() {
    let app = test_app().await;

    let (_, headers, _) = send(&app, get("/")).await;

    assert_eq!(headers["x-apiserver-version"], env!("CARGO_PKG_VERSION"));
    assert!(headers.contains_key("x-request-id"));
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert!(headers["cache-control"]
        .to_str()
        .unwrap()
        .contains("no-store"));
}

#[tokio::test]
async fn test_client_request_id_is_echoed() {
    let app = test_app().await;
    let request = Request::builder()
        .uri("/")
        .header("x-request-id", "trace-123")
        .body(Body::empty())
        .unwrap();

    let (_, headers, _) = send(&app, request).await;

    assert_eq!(headers["x-request-id"], "trace-123");
}

#[tokio::test]
async fn test_cors_preflight() {
    let app = test_app().await;
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/v1/user")
        .header("origin", "http://example.com")
        .header("access-control-request-method", "POST")
        .body(Body::empty())
        .unwrap();

    let (status, headers, _) = send(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers["access-control-allow-origin"], "*");
    assert!(headers.contains_key("access-control-allow-methods"));
}

#[tokio::test]
async fn test_swagger_only_in_debug() {
    let db = common::test_database().await;

    let release = create_router(AppState::from_database(db.clone()), false);
    let (status, _, _) = send(&release, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let debug = create_router(AppState::from_database(db), true);
    let (status, _, _) = send(&debug, get("/api-docs/openapi.json")).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_panic_is_recovered_as_internal_error() {
    let app = create_router(AppState::new(Arc::new(PanickingUserService)), false);

    let (status, body) = send_json(&app, get("/v1/user/kong")).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], 10001);

    // The router keeps serving after a panic
    let (status, _, _) = send(&app, get("/sd/health")).await;
    assert_eq!(status, StatusCode::OK);
}
