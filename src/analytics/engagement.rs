//! Post ranking by raw engagement volume.

use serde::Serialize;
use std::cmp::Ordering;

use crate::social::models::PostEngagement;

use super::{engagement_rate, round2};

/// One ranked post with its derived counters.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementRecord {
    pub post_id: String,
    pub user_id: String,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub views: u64,
    pub total_engagements: u64,
    pub engagement_rate: f64,
}

/// The ranked page plus its average rate.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementSummary {
    pub posts: Vec<EngagementRecord>,
    /// Mean engagement rate of the returned page, not the full input set.
    pub average_engagement_rate: f64,
}

/// Rank posts by total engagements (desc), breaking ties by engagement rate
/// (desc), then keep the top `limit`.
pub fn rank_posts(posts: &[PostEngagement], limit: usize) -> EngagementSummary {
    let mut records: Vec<EngagementRecord> = posts
        .iter()
        .map(|p| {
            let total = p.total_engagements();
            EngagementRecord {
                post_id: p.id.clone(),
                user_id: p.user_id.clone(),
                likes: p.likes,
                comments: p.comments,
                shares: p.shares,
                views: p.views,
                total_engagements: total,
                engagement_rate: engagement_rate(total, p.views),
            }
        })
        .collect();

    records.sort_by(|a, b| {
        b.total_engagements
            .cmp(&a.total_engagements)
            .then_with(|| {
                b.engagement_rate
                    .partial_cmp(&a.engagement_rate)
                    .unwrap_or(Ordering::Equal)
            })
    });
    records.truncate(limit);

    let average_engagement_rate = if records.is_empty() {
        0.0
    } else {
        round2(records.iter().map(|r| r.engagement_rate).sum::<f64>() / records.len() as f64)
    };

    EngagementSummary {
        posts: records,
        average_engagement_rate,
    }
}
