//! Client for the upstream social platform API.
//!
//! All analytics data originates here: the raw graph collections (`/users`,
//! `/posts`, `/comments`) and the engagement dataset (`/insights/posts`).
//! The client owns a bearer token obtained from `/auth/token` and renews it
//! transparently, so callers never deal with authentication state.

mod errors;
mod json;
pub mod models;

pub use errors::SocialApiError;

use anyhow::{Context, anyhow};
use chrono::{DateTime, Utc};
use custom_debug_derive::Debug as CustomDebug;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use models::{AuthResponse, Comment, GraphBundle, Post, PostEngagement, User};

/// Tokens within this many seconds of expiry are renewed before use.
const EXPIRY_BUFFER_SECS: i64 = 60;

/// Client credentials for the upstream token grant.
#[derive(Clone, CustomDebug)]
pub struct Credentials {
    pub client_id: String,
    #[debug(skip)]
    pub client_secret: String,
}

/// A bearer token and its absolute expiry.
#[derive(Debug, Clone)]
struct Token {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Token {
    fn from_response(auth: AuthResponse, now: DateTime<Utc>) -> Self {
        Self {
            value: auth.access_token,
            expires_at: now + chrono::Duration::seconds(auth.expires_in as i64),
        }
    }

    /// True once the token is inside the renewal buffer (or past expiry).
    fn is_expiring(&self, now: DateTime<Utc>) -> bool {
        now + chrono::Duration::seconds(EXPIRY_BUFFER_SECS) >= self.expires_at
    }
}

/// Authenticated client for the upstream social platform.
#[derive(Debug)]
pub struct SocialApi {
    http: reqwest::Client,
    base_url: Url,
    credentials: Credentials,
    token: RwLock<Option<Token>>,
}

impl SocialApi {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self, anyhow::Error> {
        let mut base_url: Url = base_url
            .parse()
            .with_context(|| format!("invalid upstream base URL '{base_url}'"))?;
        // Url::join treats a path without a trailing slash as a file and
        // would replace its last segment.
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to build reqwest client")?;

        Ok(Self {
            http,
            base_url,
            credentials,
            token: RwLock::new(None),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, SocialApiError> {
        self.base_url
            .join(path)
            .map_err(|e| SocialApiError::RequestFailed(anyhow!("invalid endpoint '{path}': {e}")))
    }

    /// Exchange client credentials for a fresh bearer token.
    async fn authenticate(&self) -> Result<Token, SocialApiError> {
        let url = self.endpoint("auth/token")?;
        let response = self
            .http
            .post(url)
            .json(&serde_json::json!({
                "clientId": self.credentials.client_id,
                "clientSecret": self.credentials.client_secret,
            }))
            .send()
            .await
            .map_err(|e| SocialApiError::AuthFailed(format!("token request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SocialApiError::AuthFailed(format!(
                "token endpoint returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SocialApiError::AuthFailed(format!("token response unreadable: {e}")))?;
        let auth: AuthResponse = json::decode_with_path(&body)
            .map_err(|e| SocialApiError::AuthFailed(format!("token response malformed: {e}")))?;

        debug!(expires_in = auth.expires_in, "authenticated with upstream");
        Ok(Token::from_response(auth, Utc::now()))
    }

    /// Return a usable bearer token, authenticating on first use and
    /// re-authenticating inside the expiry buffer.
    async fn ensure_token(&self) -> Result<String, SocialApiError> {
        {
            let guard = self.token.read().await;
            if let Some(token) = guard.as_ref()
                && !token.is_expiring(Utc::now())
            {
                return Ok(token.value.clone());
            }
        }

        let mut guard = self.token.write().await;
        // Another caller may have renewed while we waited for the lock.
        if let Some(token) = guard.as_ref()
            && !token.is_expiring(Utc::now())
        {
            return Ok(token.value.clone());
        }

        let token = self.authenticate().await?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    /// Issue an authenticated GET. A 401 drops the cached token so the next
    /// call re-authenticates.
    async fn send_get(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<reqwest::Response, SocialApiError> {
        let token = self.ensure_token().await?;
        let url = self.endpoint(path)?;

        let mut request = self.http.get(url).bearer_auth(token);
        if !query.is_empty() {
            request = request.query(query);
        }

        let response = request
            .send()
            .await
            .map_err(|e| SocialApiError::RequestFailed(anyhow!("GET {path} failed: {e}")))?;

        if response.status() == StatusCode::UNAUTHORIZED {
            *self.token.write().await = None;
            return Err(SocialApiError::AuthFailed(
                "bearer token rejected (401)".to_string(),
            ));
        }

        Ok(response)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SocialApiError> {
        let response = self.send_get(path, query).await?;
        let status = response.status();
        let url = response.url().to_string();

        if !status.is_success() {
            return Err(SocialApiError::RequestFailed(anyhow!(
                "GET {url} returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SocialApiError::RequestFailed(anyhow!("GET {url} body unreadable: {e}")))?;

        json::decode_with_path(&body).map_err(|source| SocialApiError::ParseFailed {
            status: status.as_u16(),
            url,
            source,
        })
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>, SocialApiError> {
        self.get_json("users", &[]).await
    }

    pub async fn fetch_posts(&self) -> Result<Vec<Post>, SocialApiError> {
        self.get_json("posts", &[]).await
    }

    pub async fn fetch_comments(&self) -> Result<Vec<Comment>, SocialApiError> {
        self.get_json("comments", &[]).await
    }

    /// Fetch the three raw collections concurrently. Fails as a unit: if any
    /// collection fails, the whole bundle is discarded.
    pub async fn fetch_all(&self) -> Result<GraphBundle, SocialApiError> {
        let (users, posts, comments) =
            tokio::try_join!(self.fetch_users(), self.fetch_posts(), self.fetch_comments())?;
        Ok(GraphBundle {
            users,
            posts,
            comments,
        })
    }

    /// Fetch a single user. `Ok(None)` when the platform has no such account.
    pub async fn fetch_user(&self, user_id: &str) -> Result<Option<User>, SocialApiError> {
        let response = self.send_get(&format!("users/{user_id}"), &[]).await?;
        let status = response.status();
        let url = response.url().to_string();

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(SocialApiError::RequestFailed(anyhow!(
                "GET {url} returned {status}"
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SocialApiError::RequestFailed(anyhow!("GET {url} body unreadable: {e}")))?;
        let user = json::decode_with_path(&body).map_err(|source| SocialApiError::ParseFailed {
            status: status.as_u16(),
            url,
            source,
        })?;
        Ok(Some(user))
    }

    /// Fetch engagement-annotated posts created inside `[since, until]`,
    /// optionally restricted to a single author.
    pub async fn fetch_engagement(
        &self,
        user_id: Option<&str>,
        since: DateTime<Utc>,
        until: DateTime<Utc>,
    ) -> Result<Vec<PostEngagement>, SocialApiError> {
        let mut query = vec![
            ("since", since.to_rfc3339()),
            ("until", until.to_rfc3339()),
        ];
        if let Some(id) = user_id {
            query.push(("userId", id.to_string()));
        }
        self.get_json("insights/posts", &query).await
    }
}
