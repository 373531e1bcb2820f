//! Health and status handlers.

use axum::extract::State;
use axum::response::Json;
use serde::Serialize;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use tracing::trace;

use crate::state::{AppState, ServiceStatus};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInfo {
    name: String,
    status: ServiceStatus,
    updated_seconds_ago: u64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotStatus {
    fetched_at: String,
    age_seconds: i64,
    users: usize,
    posts: usize,
    comments: usize,
    fresh: bool,
}

#[derive(Serialize)]
pub struct StatusResponse {
    status: ServiceStatus,
    version: String,
    commit: String,
    services: BTreeMap<String, ServiceInfo>,
    snapshot: Option<SnapshotStatus>,
}

/// Health check endpoint
pub(super) async fn health() -> Json<Value> {
    trace!("health check requested");
    Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Status endpoint showing service health and snapshot freshness
pub(super) async fn status(State(state): State<AppState>) -> Json<StatusResponse> {
    let mut services = BTreeMap::new();

    for (name, entry) in state.service_statuses.all() {
        services.insert(
            name.clone(),
            ServiceInfo {
                name,
                status: entry.status,
                updated_seconds_ago: entry.updated_at.elapsed().as_secs(),
            },
        );
    }

    let overall_status = if services
        .values()
        .any(|s| matches!(s.status, ServiceStatus::Error))
    {
        ServiceStatus::Error
    } else if services.is_empty() {
        ServiceStatus::Disabled
    } else if services
        .values()
        .all(|s| matches!(s.status, ServiceStatus::Active))
    {
        ServiceStatus::Active
    } else {
        ServiceStatus::Starting
    };

    let snapshot = state.views.snapshot_info().map(|info| SnapshotStatus {
        fetched_at: info.fetched_at.to_rfc3339(),
        age_seconds: (chrono::Utc::now() - info.fetched_at).num_seconds(),
        users: info.users,
        posts: info.posts,
        comments: info.comments,
        fresh: info.fresh,
    });

    Json(StatusResponse {
        status: overall_status,
        version: env!("CARGO_PKG_VERSION").to_string(),
        commit: env!("GIT_COMMIT_HASH").to_string(),
        services,
        snapshot,
    })
}
