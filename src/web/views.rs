//! Snapshot-view endpoints.
//!
//! Each handler freshens the cache implicitly through the accessor, so a
//! burst of traffic after the freshness window still triggers exactly one
//! upstream fetch.

use axum::extract::State;
use axum::response::Response;
use serde::Serialize;

use crate::analytics::views::{PostSummary, TopUser};
use crate::state::AppState;
use crate::web::error::{ApiError, upstream_error};
use crate::web::routes::{cache, with_cache_control};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TopUsersResponse {
    users: Vec<TopUser>,
    count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostsResponse {
    posts: Vec<PostSummary>,
    count: usize,
}

/// `GET /api/views/top-users`
pub(super) async fn top_users(State(state): State<AppState>) -> Result<Response, ApiError> {
    let users = state
        .views
        .top_users()
        .await
        .map_err(|e| upstream_error("Top users view", e))?;
    Ok(with_cache_control(
        TopUsersResponse {
            count: users.len(),
            users,
        },
        cache::VIEWS,
    ))
}

/// `GET /api/views/latest-posts`
pub(super) async fn latest_posts(State(state): State<AppState>) -> Result<Response, ApiError> {
    let posts = state
        .views
        .latest_posts()
        .await
        .map_err(|e| upstream_error("Latest posts view", e))?;
    Ok(with_cache_control(
        PostsResponse {
            count: posts.len(),
            posts,
        },
        cache::VIEWS,
    ))
}

/// `GET /api/views/popular-posts`
pub(super) async fn popular_posts(State(state): State<AppState>) -> Result<Response, ApiError> {
    let posts = state
        .views
        .popular_posts()
        .await
        .map_err(|e| upstream_error("Popular posts view", e))?;
    Ok(with_cache_control(
        PostsResponse {
            count: posts.len(),
            posts,
        },
        cache::VIEWS,
    ))
}
