//! End-to-end tests for the review API
//!
//! The router runs against an in-memory backend and a scripted provider,
//! so every scenario is deterministic and offline.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use reviewd::providers::{FakeProvider, GenerationOptions};
use reviewd::review::ReviewService;
use reviewd::server::{build_router, AppState};
use reviewd::store::{MemoryBackend, SessionStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_app() -> (Router, Arc<FakeProvider>, Arc<MemoryBackend>) {
    let backend = Arc::new(MemoryBackend::new());
    let store = Arc::new(SessionStore::new(backend.clone()));
    let provider = Arc::new(FakeProvider::new());
    let service = ReviewService::new(
        store,
        provider.clone(),
        GenerationOptions {
            max_tokens: 1024,
            temperature: 0.3,
        },
    );
    let app = build_router(Arc::new(AppState { service }));
    (app, provider, backend)
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("failed to build request");

    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("body was not JSON")
    };
    (status, value)
}

#[tokio::test]
async fn test_health_always_succeeds() {
    let (app, _, _) = test_app();
    let (status, body) = send(&app, "GET", "/api/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_submit_without_session_id_creates_session() {
    let (app, _, _) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/review",
        Some(json!({
            "code": "function add(a,b){return a+b}",
            "language": "javascript"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert!(!body["sessionId"].as_str().unwrap().is_empty());
    assert!(!body["reviewId"].as_str().unwrap().is_empty());
    assert!(!body["review"].as_str().unwrap().is_empty());
    assert_eq!(body["isFollowUp"], false);
}

#[tokio::test]
async fn test_second_submission_is_follow_up_and_listed_in_order() {
    let (app, provider, _) = test_app();
    provider.push_response("initial review");
    provider.push_response("follow-up review");

    let (_, first) = send(
        &app,
        "POST",
        "/api/review",
        Some(json!({"code": "function add(a,b){return a+b}", "language": "javascript"})),
    )
    .await;
    let session_id = first["sessionId"].as_str().unwrap().to_string();

    let (status, second) = send(
        &app,
        "POST",
        "/api/review",
        Some(json!({
            "code": "function add(a,b){return Number(a)+Number(b)}",
            "language": "javascript",
            "sessionId": session_id
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(second["isFollowUp"], true);
    assert_eq!(second["sessionId"].as_str().unwrap(), session_id);

    // The follow-up prompt embedded the first review's text.
    let calls = provider.calls();
    assert!(calls[1].messages[1].content.contains("initial review"));

    let (status, listed) = send(
        &app,
        "GET",
        &format!("/api/sessions/{}/reviews", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let entries = listed.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["review"], "initial review");
    assert_eq!(entries[1]["review"], "follow-up review");
}

#[tokio::test]
async fn test_clear_then_list_returns_empty() {
    let (app, _, _) = test_app();
    let (_, first) = send(
        &app,
        "POST",
        "/api/review",
        Some(json!({"code": "x", "language": "python"})),
    )
    .await;
    let session_id = first["sessionId"].as_str().unwrap().to_string();

    let (status, cleared) = send(
        &app,
        "DELETE",
        &format!("/api/sessions/{}/reviews", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cleared["cleared"], true);

    let (status, listed) = send(
        &app,
        "GET",
        &format!("/api/sessions/{}/reviews", session_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_language_is_rejected_without_side_effects() {
    let (app, _, _) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/review",
        Some(json!({"code": "x = 1", "sessionId": "sx"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("language"));

    let (_, listed) = send(&app, "GET", "/api/sessions/sx/reviews", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_missing_code_is_rejected() {
    let (app, _, _) = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/api/review",
        Some(json!({"language": "go"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("code"));
}

#[tokio::test]
async fn test_provider_failure_returns_502_and_stores_nothing() {
    let (app, provider, _) = test_app();
    provider.push_failure("model overloaded");

    let (status, body) = send(
        &app,
        "POST",
        "/api/review",
        Some(json!({"code": "x", "language": "rust", "sessionId": "s-err"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(!body["error"].as_str().unwrap().is_empty());

    let (_, listed) = send(&app, "GET", "/api/sessions/s-err/reviews", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_storage_failure_returns_500() {
    let (app, _, backend) = test_app();
    backend.fail_writes(true);

    let (status, body) = send(
        &app,
        "POST",
        "/api/review",
        Some(json!({"code": "x", "language": "rust"})),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!body["error"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_sessions_do_not_observe_each_other() {
    let (app, _, _) = test_app();
    send(
        &app,
        "POST",
        "/api/review",
        Some(json!({"code": "a", "language": "rust", "sessionId": "session-a"})),
    )
    .await;

    let (_, listed_b) = send(&app, "GET", "/api/sessions/session-b/reviews", None).await;
    assert!(listed_b.as_array().unwrap().is_empty());

    let (_, listed_a) = send(&app, "GET", "/api/sessions/session-a/reviews", None).await;
    assert_eq!(listed_a.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_session_metadata_endpoint() {
    let (app, _, _) = test_app();
    send(
        &app,
        "POST",
        "/api/review",
        Some(json!({"code": "a", "language": "rust", "sessionId": "meta-s"})),
    )
    .await;
    send(
        &app,
        "POST",
        "/api/review",
        Some(json!({"code": "b", "language": "rust", "sessionId": "meta-s"})),
    )
    .await;

    let (status, meta) = send(&app, "GET", "/api/sessions/meta-s", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(meta["reviewCount"], 2);
    assert!(meta["createdAt"].as_i64().unwrap() > 0);
    assert!(meta["lastAccessedAt"].as_i64().unwrap() >= meta["createdAt"].as_i64().unwrap());
}

#[tokio::test]
async fn test_entries_carry_submission_fields() {
    let (app, _, _) = test_app();
    send(
        &app,
        "POST",
        "/api/review",
        Some(json!({
            "code": "SELECT 1",
            "language": "sql",
            "context": "migration check",
            "sessionId": "fields-s"
        })),
    )
    .await;

    let (_, listed) = send(&app, "GET", "/api/sessions/fields-s/reviews", None).await;
    let entry = &listed.as_array().unwrap()[0];
    assert_eq!(entry["code"], "SELECT 1");
    assert_eq!(entry["language"], "sql");
    assert_eq!(entry["context"], "migration check");
    assert!(entry["timestamp"].as_i64().unwrap() > 0);
}
