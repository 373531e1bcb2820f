//! Snapshot aggregations: the three precomputed views served straight from
//! the cache.

use serde::Serialize;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::social::models::GraphBundle;

/// Users kept in the `top-users` view.
const TOP_USERS_LIMIT: usize = 5;
/// Posts kept in the `latest-posts` view.
const LATEST_POSTS_LIMIT: usize = 5;

/// A user ranked by authored post count.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub post_count: u64,
}

/// A post enriched with its comment count and, when the author is known,
/// their display name.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub comment_count: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
}

/// All derived views, recomputed wholesale from each snapshot. Never patched
/// incrementally: a refresh replaces the whole struct.
#[derive(Debug, Clone)]
pub struct ComputedViews {
    pub top_users: Vec<TopUser>,
    pub latest_posts: Vec<PostSummary>,
    pub popular_posts: Vec<PostSummary>,
}

/// Build every derived view from one raw bundle.
pub fn compute_views(bundle: &GraphBundle) -> ComputedViews {
    let posts_per_user = count_by(&bundle.posts, |p| p.user_id.as_str());
    let comments_per_post = count_by(&bundle.comments, |c| c.post_id.as_str());
    let names: HashMap<&str, &str> = bundle
        .users
        .iter()
        .map(|u| (u.id.as_str(), u.name.as_str()))
        .collect();

    ComputedViews {
        top_users: top_users(bundle, &posts_per_user),
        latest_posts: latest_posts(bundle, &comments_per_post, &names),
        popular_posts: popular_posts(bundle, &comments_per_post, &names),
    }
}

fn count_by<'a, T>(items: &'a [T], key: impl Fn(&'a T) -> &'a str) -> HashMap<&'a str, u64> {
    let mut counts: HashMap<&str, u64> = HashMap::new();
    for item in items {
        *counts.entry(key(item)).or_default() += 1;
    }
    counts
}

/// Top users by post count, descending. Ties keep the upstream user order
/// (sort is stable), so a user listed earlier by the platform wins the slot.
fn top_users(bundle: &GraphBundle, posts_per_user: &HashMap<&str, u64>) -> Vec<TopUser> {
    let mut ranked: Vec<TopUser> = bundle
        .users
        .iter()
        .map(|u| TopUser {
            id: u.id.clone(),
            name: u.name.clone(),
            email: u.email.clone(),
            post_count: posts_per_user.get(u.id.as_str()).copied().unwrap_or(0),
        })
        .collect();
    ranked.sort_by(|a, b| b.post_count.cmp(&a.post_count));
    ranked.truncate(TOP_USERS_LIMIT);
    ranked
}

fn summarize(
    post: &crate::social::models::Post,
    comments_per_post: &HashMap<&str, u64>,
    names: &HashMap<&str, &str>,
) -> PostSummary {
    PostSummary {
        id: post.id.clone(),
        user_id: post.user_id.clone(),
        title: post.title.clone(),
        created_at: post.created_at,
        comment_count: comments_per_post.get(post.id.as_str()).copied().unwrap_or(0),
        user_name: names.get(post.user_id.as_str()).map(|n| n.to_string()),
    }
}

/// Newest posts first. Equal timestamps keep the upstream post order.
fn latest_posts(
    bundle: &GraphBundle,
    comments_per_post: &HashMap<&str, u64>,
    names: &HashMap<&str, &str>,
) -> Vec<PostSummary> {
    let mut recent: Vec<PostSummary> = bundle
        .posts
        .iter()
        .map(|p| summarize(p, comments_per_post, names))
        .collect();
    recent.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    recent.truncate(LATEST_POSTS_LIMIT);
    recent
}

/// Every post whose comment count equals the maximum. Deliberately unbounded:
/// with no comments at all, every post ties at zero and the view returns the
/// whole corpus.
fn popular_posts(
    bundle: &GraphBundle,
    comments_per_post: &HashMap<&str, u64>,
    names: &HashMap<&str, &str>,
) -> Vec<PostSummary> {
    let max = bundle
        .posts
        .iter()
        .map(|p| comments_per_post.get(p.id.as_str()).copied().unwrap_or(0))
        .max();
    let Some(max) = max else {
        return Vec::new();
    };

    bundle
        .posts
        .iter()
        .map(|p| summarize(p, comments_per_post, names))
        .filter(|s| s.comment_count == max)
        .collect()
}
