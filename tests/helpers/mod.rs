//! Shared scaffolding for integration tests: a mocked upstream platform and
//! constructors for the client, cache, and router under test.

#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use pulse::analytics::Period;
use pulse::cache::ViewCache;
use pulse::social::{Credentials, SocialApi};
use pulse::state::{ApiDefaults, AppState};
use pulse::web::create_router;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "tok-integration-1";

/// Mount the token grant every client interaction starts with.
pub async fn mount_auth(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "accessToken": TOKEN,
            "expiresIn": 3600,
        })))
        .mount(server)
        .await;
}

/// Mount the three raw graph collections.
pub async fn mount_graph(server: &MockServer, users: Value, posts: Value, comments: Value) {
    for (route, body) in [("/users", users), ("/posts", posts), ("/comments", comments)] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(server)
            .await;
    }
}

/// Mount the engagement insights dataset, whatever window is asked for.
pub async fn mount_insights(server: &MockServer, posts: Value) {
    Mock::given(method("GET"))
        .and(path("/insights/posts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(posts))
        .mount(server)
        .await;
}

pub fn user(id: &str, name: &str) -> Value {
    json!({ "id": id, "name": name, "email": format!("{id}@example.com") })
}

pub fn post(id: &str, user_id: &str, title: &str, created_at: &str) -> Value {
    json!({
        "id": id,
        "userId": user_id,
        "title": title,
        "content": "body",
        "createdAt": created_at,
    })
}

pub fn comment(id: &str, post_id: &str, user_id: &str) -> Value {
    json!({
        "id": id,
        "postId": post_id,
        "userId": user_id,
        "content": "nice",
        "createdAt": "2026-01-10T12:00:00Z",
    })
}

/// An engagement-annotated post created just now, so it falls inside every
/// analysis window.
pub fn engagement(
    id: &str,
    user_id: &str,
    content: &str,
    (likes, comments, shares, views): (u64, u64, u64, u64),
) -> Value {
    json!({
        "id": id,
        "userId": user_id,
        "content": content,
        "likes": likes,
        "comments": comments,
        "shares": shares,
        "views": views,
        "createdAt": chrono::Utc::now().to_rfc3339(),
    })
}

pub fn social_api(server: &MockServer) -> Arc<SocialApi> {
    let api = SocialApi::new(
        &server.uri(),
        Credentials {
            client_id: "integration".to_string(),
            client_secret: "shhh".to_string(),
        },
    )
    .expect("Failed to build client against mock server");
    Arc::new(api)
}

pub fn view_cache(server: &MockServer, freshness_window_ms: u64) -> ViewCache {
    ViewCache::new(social_api(server), freshness_window_ms)
}

pub fn app_state(server: &MockServer, freshness_window_ms: u64) -> AppState {
    let api = social_api(server);
    let views = ViewCache::new(api.clone(), freshness_window_ms);
    AppState::new(
        api,
        views,
        ApiDefaults {
            popular_period: Period::Week,
            trending_period: Period::Day,
            comparison_period: Period::Month,
            limit: 10,
        },
    )
}

pub fn router(server: &MockServer) -> Router {
    create_router(app_state(server, 60_000))
}

/// Drive one request through the router and decode the JSON body.
pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .uri(uri)
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("router is infallible");

    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("response was not JSON")
    };
    (status, value)
}
