//! Endpoint tests for the snapshot views, health, and status API.

mod helpers;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use helpers::{comment, get_json, mount_auth, mount_graph, post, user};
use pulse::state::ServiceStatus;
use pulse::web::create_router;
use serde_json::json;
use tower::ServiceExt;
use wiremock::MockServer;

/// u1 authors two posts, u2 one, u3 none; p1 carries the most comments.
async fn graph_server() -> MockServer {
    let server = MockServer::start().await;
    mount_auth(&server).await;
    mount_graph(
        &server,
        json!([user("u1", "Ada"), user("u2", "Brin"), user("u3", "Cass")]),
        json!([
            post("p1", "u1", "Oldest", "2026-01-01T00:00:00Z"),
            post("p2", "u1", "Middle", "2026-01-02T00:00:00Z"),
            post("p3", "u2", "Newest", "2026-01-03T00:00:00Z"),
        ]),
        json!([
            comment("c1", "p1", "u2"),
            comment("c2", "p1", "u3"),
            comment("c3", "p3", "u1"),
        ]),
    )
    .await;
    server
}

#[tokio::test]
async fn test_top_users_ordered_by_post_count() {
    let server = graph_server().await;
    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/views/top-users").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);

    let users = body["users"].as_array().expect("users array");
    assert_eq!(users[0]["id"], "u1");
    assert_eq!(users[0]["postCount"], 2);
    assert_eq!(users[1]["id"], "u2");
    assert_eq!(users[1]["postCount"], 1);
    assert_eq!(users[2]["id"], "u3");
    assert_eq!(users[2]["postCount"], 0, "zero-post users still rank");
}

#[tokio::test]
async fn test_latest_posts_newest_first_with_counts() {
    let server = graph_server().await;
    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/views/latest-posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 3);

    let posts = body["posts"].as_array().expect("posts array");
    assert_eq!(posts[0]["id"], "p3");
    assert_eq!(posts[0]["commentCount"], 1);
    assert_eq!(posts[0]["userName"], "Brin");
    assert_eq!(posts[1]["id"], "p2");
    assert_eq!(posts[1]["commentCount"], 0);
    assert_eq!(posts[2]["id"], "p1");
    assert_eq!(posts[2]["commentCount"], 2);
    assert_eq!(posts[2]["userName"], "Ada");
}

#[tokio::test]
async fn test_popular_posts_are_the_tied_maximum() {
    let server = graph_server().await;
    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/views/popular-posts").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1, "only p1 holds the comment maximum");
    assert_eq!(body["posts"][0]["id"], "p1");
    assert_eq!(body["posts"][0]["commentCount"], 2);
}

#[tokio::test]
async fn test_health_endpoint() {
    // The upstream is never touched by the health check.
    let server = MockServer::start().await;
    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
async fn test_status_reports_snapshot_freshness() {
    let server = graph_server().await;
    let state = helpers::app_state(&server, 60_000);
    state.views.ensure_fresh(true).await.expect("initial fill");
    state.service_statuses.set("web", ServiceStatus::Active);
    state.service_statuses.set("refresher", ServiceStatus::Active);

    let router = create_router(state);
    let (status, body) = get_json(&router, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "active");
    assert_eq!(body["services"]["web"]["status"], "active");
    assert_eq!(body["services"]["refresher"]["status"], "active");
    assert_eq!(body["snapshot"]["users"], 3);
    assert_eq!(body["snapshot"]["posts"], 3);
    assert_eq!(body["snapshot"]["comments"], 3);
    assert_eq!(body["snapshot"]["fresh"], true);
}

#[tokio::test]
async fn test_status_before_first_snapshot() {
    let server = MockServer::start().await;
    let router = helpers::router(&server);
    let (status, body) = get_json(&router, "/api/status").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "disabled", "no services registered here");
    assert!(body["snapshot"].is_null());
}

#[tokio::test]
async fn test_inbound_request_id_echoed_with_cache_control() {
    let server = graph_server().await;
    let router = helpers::router(&server);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/views/top-users")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router is infallible");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("abc-123"),
    );
    assert_eq!(
        response
            .headers()
            .get("cache-control")
            .and_then(|v| v.to_str().ok()),
        Some("public, max-age=5, stale-while-revalidate=30"),
    );
}

#[tokio::test]
async fn test_request_id_generated_when_missing() {
    let server = MockServer::start().await;
    let router = helpers::router(&server);

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router is infallible");

    let header = response
        .headers()
        .get("x-request-id")
        .expect("x-request-id present");
    assert!(!header.to_str().expect("ascii").is_empty());
}
