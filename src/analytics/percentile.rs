//! Per-user engagement standing relative to the rest of the platform.

use serde::Serialize;
use std::collections::HashMap;

use crate::social::models::PostEngagement;

use super::{engagement_rate, round2};

/// Where one user's engagement rate sits among all authors in the window.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EngagementStanding {
    /// The user's aggregate rate: total engagements over total views.
    pub engagement_rate: f64,
    /// The platform-wide aggregate rate over every post in the window.
    pub platform_rate: f64,
    /// Share of *other* authors whose rate falls below the user's. A user
    /// who outranks every other author scores exactly 100.
    pub percentile: f64,
    /// Percentage above (+) or below (-) the platform rate. Zero when the
    /// platform rate itself is zero.
    pub comparison: f64,
    /// The user's post count inside the window.
    pub post_count: usize,
}

/// Compute the user's standing from every post in the analysis window.
///
/// Rates are aggregate ratios (sum of engagements over sum of views), so one
/// widely seen post weighs more than many unseen ones. The percentile walks
/// the other authors' rates in ascending order and reports the position of
/// the first rate not below the user's; an equal rate therefore counts
/// against the user.
pub fn rank_user(user_id: &str, posts: &[PostEngagement]) -> EngagementStanding {
    let mut user_sums = (0u64, 0u64);
    let mut platform_sums = (0u64, 0u64);
    let mut by_author: HashMap<&str, (u64, u64)> = HashMap::new();
    let mut post_count = 0usize;

    for post in posts {
        let engagements = post.total_engagements();
        platform_sums.0 += engagements;
        platform_sums.1 += post.views;

        if post.user_id == user_id {
            user_sums.0 += engagements;
            user_sums.1 += post.views;
            post_count += 1;
        } else {
            let entry = by_author.entry(post.user_id.as_str()).or_default();
            entry.0 += engagements;
            entry.1 += post.views;
        }
    }

    let user_rate = engagement_rate(user_sums.0, user_sums.1);
    let platform_rate = engagement_rate(platform_sums.0, platform_sums.1);

    let mut other_rates: Vec<f64> = by_author
        .into_values()
        .map(|(engagements, views)| engagement_rate(engagements, views))
        .collect();
    other_rates.sort_by(f64::total_cmp);

    let percentile = match other_rates.iter().position(|rate| *rate >= user_rate) {
        Some(index) => round2(index as f64 / other_rates.len() as f64 * 100.0),
        None => 100.0,
    };

    let comparison = if platform_rate == 0.0 {
        0.0
    } else {
        round2(user_rate / platform_rate * 100.0 - 100.0)
    };

    EngagementStanding {
        engagement_rate: user_rate,
        platform_rate,
        percentile,
        comparison,
        post_count,
    }
}
