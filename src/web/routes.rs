//! Web API router construction and shared response utilities.

use axum::{
    Router,
    http::HeaderValue,
    response::{IntoResponse, Json, Response},
    routing::get,
};

use std::time::Duration;

use crate::state::AppState;
use crate::web::middleware::request_id::RequestIdLayer;
use crate::web::{analytics, status, views};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer};

/// Cache-Control presets for public endpoints.
///
/// CDNs respect `stale-while-revalidate` for serving stale content while
/// re-fetching in the background, which matches how the service itself
/// treats freshness.
pub mod cache {
    /// Snapshot views: the server already bounds staleness, so edge caching
    /// only needs to absorb bursts.
    pub const VIEWS: &str = "public, max-age=5, stale-while-revalidate=30";
    /// Windowed analytics hit the upstream per request; cache a bit longer.
    pub const ANALYTICS: &str = "public, max-age=30, stale-while-revalidate=60";
}

/// Wraps a JSON response with a `Cache-Control` header.
pub fn with_cache_control<T: serde::Serialize>(value: T, header: &'static str) -> Response {
    let mut response = Json(value).into_response();
    response.headers_mut().insert(
        axum::http::header::CACHE_CONTROL,
        HeaderValue::from_static(header),
    );
    response
}

/// Creates the web server router
pub fn create_router(app_state: AppState) -> Router {
    let api_router = Router::new()
        .route("/health", get(status::health))
        .route("/status", get(status::status))
        .route("/views/top-users", get(views::top_users))
        .route("/views/latest-posts", get(views::latest_posts))
        .route("/views/popular-posts", get(views::popular_posts))
        .route("/analytics/popular-posts", get(analytics::popular_posts))
        .route("/analytics/trending-topics", get(analytics::topics))
        .route(
            "/analytics/users/{user_id}/engagement",
            get(analytics::user_engagement),
        )
        .with_state(app_state);

    let router = Router::new().nest("/api", api_router);

    router.layer((
        // Outermost: per-request ID span + severity-proportional response logging.
        RequestIdLayer,
        // Read-only public API, no credentials involved.
        CorsLayer::permissive(),
        CompressionLayer::new()
            .zstd(true)
            .br(true)
            .gzip(true)
            .quality(tower_http::CompressionLevel::Fastest),
        TimeoutLayer::new(Duration::from_secs(30)),
    ))
}
