//! Windowed engagement analytics endpoints.
//!
//! These query the upstream insights dataset per request (the snapshot cache
//! only covers the raw graph views) and run the pure engines over the result.

use axum::extract::{Path, Query, State};
use axum::response::Response;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::analytics::Period;
use crate::analytics::engagement::{EngagementRecord, rank_posts};
use crate::analytics::percentile::{EngagementStanding, rank_user};
use crate::analytics::topics::{Topic, trending_topics};
use crate::config::MAX_LIMIT;
use crate::state::AppState;
use crate::web::error::{ApiError, ApiErrorCode, OptionNotFoundExt, upstream_error};
use crate::web::routes::{cache, with_cache_control};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PopularPostsParams {
    period: Option<String>,
    user_id: Option<String>,
    limit: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingTopicsParams {
    period: Option<String>,
    limit: Option<i64>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonParams {
    period: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PopularPostsResponse {
    period: Period,
    posts: Vec<EngagementRecord>,
    average_engagement_rate: f64,
    count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TrendingTopicsResponse {
    period: Period,
    topics: Vec<Topic>,
    count: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComparisonResponse {
    user_id: String,
    user_name: String,
    period: Period,
    #[serde(flatten)]
    standing: EngagementStanding,
}

fn resolve_period(raw: Option<&str>, default: Period) -> Result<Period, ApiError> {
    match raw {
        None => Ok(default),
        Some(s) => Period::parse(s).ok_or_else(|| {
            ApiError::new(
                ApiErrorCode::InvalidPeriod,
                format!("Invalid period '{s}'. Valid: {}", Period::VALID),
            )
        }),
    }
}

fn resolve_limit(raw: Option<i64>, default: usize) -> Result<usize, ApiError> {
    match raw {
        None => Ok(default),
        Some(l) if l >= 1 && (l as usize) <= MAX_LIMIT => Ok(l as usize),
        Some(l) => Err(ApiError::new(
            ApiErrorCode::InvalidLimit,
            format!("Invalid limit '{l}'. Valid: 1-{MAX_LIMIT}"),
        )),
    }
}

/// `GET /api/analytics/popular-posts`
pub(super) async fn popular_posts(
    State(state): State<AppState>,
    Query(params): Query<PopularPostsParams>,
) -> Result<Response, ApiError> {
    let period = resolve_period(params.period.as_deref(), state.defaults.popular_period)?;
    let limit = resolve_limit(params.limit, state.defaults.limit)?;

    let until = Utc::now();
    let posts = state
        .api
        .fetch_engagement(params.user_id.as_deref(), period.window_start(until), until)
        .await
        .map_err(|e| upstream_error("Engagement data", e))?;

    let summary = rank_posts(&posts, limit);
    Ok(with_cache_control(
        PopularPostsResponse {
            period,
            count: summary.posts.len(),
            average_engagement_rate: summary.average_engagement_rate,
            posts: summary.posts,
        },
        cache::ANALYTICS,
    ))
}

/// `GET /api/analytics/trending-topics`
pub(super) async fn topics(
    State(state): State<AppState>,
    Query(params): Query<TrendingTopicsParams>,
) -> Result<Response, ApiError> {
    let period = resolve_period(params.period.as_deref(), state.defaults.trending_period)?;
    let limit = resolve_limit(params.limit, state.defaults.limit)?;

    let until = Utc::now();
    let posts = state
        .api
        .fetch_engagement(None, period.window_start(until), until)
        .await
        .map_err(|e| upstream_error("Engagement data", e))?;

    let topics = trending_topics(&posts, limit);
    Ok(with_cache_control(
        TrendingTopicsResponse {
            period,
            count: topics.len(),
            topics,
        },
        cache::ANALYTICS,
    ))
}

/// `GET /api/analytics/users/{user_id}/engagement`
pub(super) async fn user_engagement(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    Query(params): Query<ComparisonParams>,
) -> Result<Response, ApiError> {
    let period = resolve_period(params.period.as_deref(), state.defaults.comparison_period)?;

    let user = state
        .api
        .fetch_user(&user_id)
        .await
        .map_err(|e| upstream_error("User lookup", e))?
        .or_not_found("User", &user_id)?;

    // The standing needs every author's posts in the window, not just the
    // target user's, so no userId filter here.
    let until = Utc::now();
    let posts = state
        .api
        .fetch_engagement(None, period.window_start(until), until)
        .await
        .map_err(|e| upstream_error("Engagement data", e))?;

    let standing = rank_user(&user.id, &posts);
    Ok(with_cache_control(
        ComparisonResponse {
            user_id: user.id,
            user_name: user.name,
            period,
            standing,
        },
        cache::ANALYTICS,
    ))
}
