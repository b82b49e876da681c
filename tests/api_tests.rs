//! Integration tests for the REST endpoints.
//!
//! Requests go through the Axum `Router` via `tower::ServiceExt` without
//! a TCP listener; `MockConnectInfo` supplies the peer address.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]

mod common;

use std::net::SocketAddr;

use axum::Router;
use axum::body::Body;
use axum::extract::connect_info::MockConnectInfo;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use common::{ADMIN_PASSWORD, TestApp};

fn with_peer(router: Router) -> Router {
    router.layer(MockConnectInfo(SocketAddr::from(([203, 0, 113, 7], 40_000))))
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn post_empty(uri: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn increment_returns_running_count() {
    let app = TestApp::new().await;
    let router = with_peer(app.router());

    let (status, body) = send(&router, post_empty("/increment-interest")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"count": 1}));

    let (_, body) = send(&router, post_empty("/increment-interest")).await;
    assert_eq!(body, json!({"count": 2}));
}

#[tokio::test]
async fn increment_without_connect_info_records_unknown_origin() {
    let app = TestApp::new().await;
    let router = app.router();

    let (status, _) = send(&router, post_empty("/increment-interest")).await;
    assert_eq!(status, StatusCode::OK);

    let recent = tokio_test::assert_ok!(
        app.state
            .interest_service
            .store()
            .recent_interest(Some(1))
            .await
    );
    assert_eq!(recent.first().map(|e| e.origin.as_str()), Some("unknown"));
}

#[tokio::test]
async fn subscribe_accepts_then_rejects_duplicate() {
    let app = TestApp::new().await;
    let router = app.router();
    let body = json!({"email": "a@example.com"});

    let (status, resp) = send(&router, post_json("/subscribe", &body)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp, json!({"message": "Successfully subscribed!"}));

    let (status, resp) = send(&router, post_json("/subscribe", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"]["message"], "Email already subscribed");
    assert_eq!(resp["detail"], "Email already subscribed");
    assert_eq!(resp["error"]["code"], 2001);
}

#[tokio::test]
async fn subscribe_requires_email() {
    let app = TestApp::new().await;
    let router = app.router();

    for body in [json!({}), json!({"email": ""}), json!({"email": null})] {
        let (status, resp) = send(&router, post_json("/subscribe", &body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}");
        assert_eq!(resp["error"]["message"], "Email is required");
    }
}

#[tokio::test]
async fn subscribe_treats_malformed_body_as_missing_email() {
    let app = TestApp::new().await;
    let router = app.router();

    let request = Request::builder()
        .method("POST")
        .uri("/subscribe")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, resp) = send(&router, request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["error"]["message"], "Email is required");
}

#[tokio::test]
async fn admin_endpoints_reject_missing_or_wrong_credential() {
    let app = TestApp::new().await;
    let router = app.router();

    for uri in [
        "/admin/stats",
        "/admin/stats?password=wrong",
        "/export-data",
        "/export-data?password=",
    ] {
        let (status, resp) = send(&router, get(uri)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "uri {uri}");
        assert_eq!(resp["error"]["code"], 1002);
    }
}

#[tokio::test]
async fn admin_stats_report_totals_and_recent_rows() {
    let app = TestApp::new().await;
    let router = with_peer(app.router());

    for _ in 0..3 {
        send(&router, post_empty("/increment-interest")).await;
    }
    send(
        &router,
        post_json("/subscribe", &json!({"email": "a@example.com"})),
    )
    .await;

    let (status, stats) = send(
        &router,
        get(&format!("/admin/stats?password={ADMIN_PASSWORD}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["total_interest"], 3);
    assert_eq!(stats["unique_visitors"], 1);
    assert_eq!(stats["total_subscribers"], 1);
    assert_eq!(stats["recent_interest"].as_array().map(Vec::len), Some(3));
    assert_eq!(stats["recent_interest"][0][0], "203.0.113.7");
    assert_eq!(stats["recent_subscribers"][0][0], "a@example.com");
}

#[tokio::test]
async fn export_accepts_bearer_token() {
    let app = TestApp::new().await;
    let router = with_peer(app.router());

    send(&router, post_empty("/increment-interest")).await;
    send(
        &router,
        post_json("/subscribe", &json!({"email": "b@example.com"})),
    )
    .await;

    let request = Request::builder()
        .uri("/export-data")
        .header(header::AUTHORIZATION, format!("Bearer {ADMIN_PASSWORD}"))
        .body(Body::empty())
        .unwrap();
    let (status, export) = send(&router, request).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(export["summary"]["total_interest"], 1);
    assert_eq!(export["interest_data"][0]["ip_address"], "203.0.113.7");
    assert_eq!(export["email_data"][0]["email"], "b@example.com");
}

#[tokio::test]
async fn landing_renders_branding_and_count() {
    let app = TestApp::new().await;
    let router = with_peer(app.router());
    send(&router, post_empty("/increment-interest")).await;

    let (status, body) = send(&router, get("/landing")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["app_name"], "Test Product");
    assert_eq!(body["app_email"], "hello@example.com");
    assert_eq!(body["interest_count"], 1);
}

#[tokio::test]
async fn sp500_data_degrades_to_empty_arrays() {
    let app = TestApp::new().await;
    let (status, body) = send(&app.router(), get("/sp500-data")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"dates": [], "prices": []}));
}

#[tokio::test]
async fn health_reports_live_connections() {
    let app = TestApp::new().await;
    let (status, body) = send(&app.router(), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["live_connections"], 0);
}

#[tokio::test]
async fn every_write_leaves_a_snapshot() {
    let app = TestApp::new().await;
    let router = with_peer(app.router());

    send(&router, post_empty("/increment-interest")).await;
    send(
        &router,
        post_json("/subscribe", &json!({"email": "c@example.com"})),
    )
    .await;
    send(
        &router,
        post_json("/subscribe", &json!({"email": "c@example.com"})),
    )
    .await;

    let backups = tokio_test::assert_ok!(app.snapshotter.backups());
    assert_eq!(backups.len(), 2);
}
