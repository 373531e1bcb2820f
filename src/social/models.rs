//! Wire models for the upstream social platform API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A platform account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A post as returned by the raw `/posts` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// A comment as returned by the raw `/comments` collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub post_id: String,
    pub user_id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// An engagement-annotated post from the `/insights/posts` dataset.
///
/// Counter semantics are the platform's: `views` counts impressions and is
/// not an engagement, so it only ever appears in rate denominators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostEngagement {
    pub id: String,
    pub user_id: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub likes: u64,
    pub comments: u64,
    pub shares: u64,
    pub views: u64,
    pub created_at: DateTime<Utc>,
}

impl PostEngagement {
    /// Likes, comments, and shares combined. Views are excluded.
    pub fn total_engagements(&self) -> u64 {
        self.likes + self.comments + self.shares
    }
}

/// The three raw collections fetched together by `SocialApi::fetch_all`.
#[derive(Debug, Clone)]
pub struct GraphBundle {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
}

/// Successful response from `POST /auth/token`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub access_token: String,
    /// Token lifetime in seconds.
    pub expires_in: u64,
}
