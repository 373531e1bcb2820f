//! Freshness-bounded snapshot cache over the upstream social graph.
//!
//! Holds the latest raw bundle (users, posts, comments) together with every
//! derived view, swapped atomically as one generation. `ensure_fresh` is the
//! only write path: at most one upstream fetch runs at a time, and every
//! caller that arrives while it is in flight awaits the same outcome instead
//! of stacking duplicate fetches. Readers clone an `Arc` off a watch channel
//! and never block each other.
//!
//! Refresh failures keep the previous generation. View accessors degrade to
//! those stale views and only surface the error when the cache has never
//! been filled.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, watch};
use tracing::{debug, info, warn};

use crate::analytics::views::{ComputedViews, PostSummary, TopUser, compute_views};
use crate::social::models::{Comment, GraphBundle, Post, User};
use crate::social::{SocialApi, SocialApiError};
use crate::utils::{fmt_duration, log_if_slow};

/// Outcome of one refresh attempt, shared with every caller that joined it.
/// String payloads keep it `Clone` so a single result can fan out.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("upstream authentication failed: {0}")]
    Auth(String),
    #[error("upstream fetch failed: {0}")]
    Upstream(String),
}

impl From<SocialApiError> for FetchError {
    fn from(err: SocialApiError) -> Self {
        match err {
            SocialApiError::AuthFailed(msg) => FetchError::Auth(msg),
            SocialApiError::ParseFailed {
                status,
                url,
                source,
            } => FetchError::Upstream(format!("parse failed ({status} {url}): {source:#}")),
            SocialApiError::RequestFailed(e) => FetchError::Upstream(format!("{e:#}")),
        }
    }
}

/// The raw collections exactly as fetched, plus when the fetch completed.
///
/// Immutable once built. `fetched_at` strictly increases across successful
/// refreshes since each is stamped at completion.
#[derive(Debug, Clone)]
pub struct RawSnapshot {
    pub users: Vec<User>,
    pub posts: Vec<Post>,
    pub comments: Vec<Comment>,
    pub fetched_at: DateTime<Utc>,
}

impl RawSnapshot {
    fn new(bundle: GraphBundle, fetched_at: DateTime<Utc>) -> Self {
        Self {
            users: bundle.users,
            posts: bundle.posts,
            comments: bundle.comments,
            fetched_at,
        }
    }
}

/// One cache generation: snapshot and views always swap together.
#[derive(Debug)]
struct Generation {
    snapshot: RawSnapshot,
    views: ComputedViews,
}

/// Freshness and size of the current snapshot, for the status endpoint.
#[derive(Debug, Clone)]
pub struct SnapshotInfo {
    pub fetched_at: DateTime<Utc>,
    pub users: usize,
    pub posts: usize,
    pub comments: usize,
    pub fresh: bool,
}

type RefreshOutcome = Result<(), FetchError>;

struct Inner {
    api: Arc<SocialApi>,
    /// Snapshots older than this are refreshed before serving.
    freshness: chrono::Duration,
    rx: watch::Receiver<Option<Arc<Generation>>>,
    tx: watch::Sender<Option<Arc<Generation>>>,
    /// Singleflight slot: `Some` while a refresh task is in flight. Late
    /// callers subscribe to the sender and await its broadcast outcome.
    inflight: Mutex<Option<Arc<watch::Sender<Option<RefreshOutcome>>>>>,
}

/// Shared view cache. Clone-cheap (all internals behind one `Arc`).
#[derive(Clone)]
pub struct ViewCache {
    inner: Arc<Inner>,
}

impl ViewCache {
    /// Create an empty cache; the first `ensure_fresh` fills it.
    pub fn new(api: Arc<SocialApi>, freshness_window_ms: u64) -> Self {
        let (tx, rx) = watch::channel(None);
        Self {
            inner: Arc::new(Inner {
                api,
                freshness: chrono::Duration::milliseconds(freshness_window_ms as i64),
                rx,
                tx,
                inflight: Mutex::new(None),
            }),
        }
    }

    fn current(&self) -> Option<Arc<Generation>> {
        self.inner.rx.borrow().clone()
    }

    fn is_fresh(&self) -> bool {
        self.inner
            .rx
            .borrow()
            .as_ref()
            .is_some_and(|generation| {
                Utc::now() - generation.snapshot.fetched_at < self.inner.freshness
            })
    }

    /// Guarantee the snapshot is younger than the freshness window, fetching
    /// if needed. With `force` the window check is skipped and a refresh
    /// always runs (or is joined).
    ///
    /// Exactly one upstream fetch is in flight at a time; concurrent callers
    /// converge on it and all observe its result, error included.
    pub async fn ensure_fresh(&self, force: bool) -> Result<(), FetchError> {
        if !force && self.is_fresh() {
            return Ok(());
        }

        let mut outcome_rx = {
            let mut inflight = self.inner.inflight.lock().await;
            match inflight.as_ref() {
                Some(state) => {
                    debug!("joining in-flight snapshot refresh");
                    state.subscribe()
                }
                None => {
                    // A refresh may have completed while we waited for the
                    // lock; re-check before starting another.
                    if !force && self.is_fresh() {
                        return Ok(());
                    }

                    let (state_tx, state_rx) = watch::channel(None);
                    let state = Arc::new(state_tx);
                    *inflight = Some(state.clone());

                    // The fetch runs in its own task so a caller hanging up
                    // mid-request cannot cancel it for everyone else.
                    let cache = self.clone();
                    tokio::spawn(async move {
                        // refresh() runs behind a JoinHandle so a panic inside
                        // it becomes a broadcast failure instead of unwinding
                        // past the slot cleanup and wedging every caller.
                        let handle = tokio::spawn({
                            let cache = cache.clone();
                            async move { cache.refresh().await }
                        });
                        let outcome = match handle.await {
                            Ok(outcome) => outcome,
                            Err(e) => Err(FetchError::Upstream(format!(
                                "snapshot refresh task died: {e}"
                            ))),
                        };
                        if let Err(e) = &outcome {
                            warn!(error = %e, "snapshot refresh failed");
                        }
                        // Clear the slot before broadcasting: anyone arriving
                        // after the outcome lands starts a new refresh rather
                        // than joining this finished one.
                        *cache.inner.inflight.lock().await = None;
                        let _ = state.send(Some(outcome));
                    });
                    state_rx
                }
            }
        };

        loop {
            {
                let outcome = outcome_rx.borrow_and_update();
                if let Some(outcome) = outcome.as_ref() {
                    return outcome.clone();
                }
            }
            if outcome_rx.changed().await.is_err() {
                return Err(FetchError::Upstream(
                    "snapshot refresh task aborted".to_string(),
                ));
            }
        }
    }

    /// Fetch a new bundle, recompute every view, and publish the generation.
    async fn refresh(&self) -> Result<(), FetchError> {
        let start = std::time::Instant::now();
        let bundle = self.inner.api.fetch_all().await?;

        let views = compute_views(&bundle);
        let snapshot = RawSnapshot::new(bundle, Utc::now());
        info!(
            users = snapshot.users.len(),
            posts = snapshot.posts.len(),
            comments = snapshot.comments.len(),
            elapsed = fmt_duration(start.elapsed()),
            "snapshot refreshed"
        );

        self.inner
            .tx
            .send_replace(Some(Arc::new(Generation { snapshot, views })));

        // A refresh slower than the window means callers always find the
        // snapshot stale and every request pays the wait.
        log_if_slow(
            start,
            self.inner.freshness.to_std().unwrap_or_default(),
            "snapshot refresh",
        );
        Ok(())
    }

    /// Shared accessor path: freshen, then read. A failed refresh falls back
    /// to the previous generation; only an empty cache propagates the error.
    async fn generation(&self) -> Result<Arc<Generation>, FetchError> {
        if let Err(e) = self.ensure_fresh(false).await {
            return match self.current() {
                Some(generation) => {
                    warn!(error = %e, "refresh failed, serving stale views");
                    Ok(generation)
                }
                None => Err(e),
            };
        }
        self.current()
            .ok_or_else(|| FetchError::Upstream("no snapshot after refresh".to_string()))
    }

    pub async fn top_users(&self) -> Result<Vec<TopUser>, FetchError> {
        Ok(self.generation().await?.views.top_users.clone())
    }

    pub async fn latest_posts(&self) -> Result<Vec<PostSummary>, FetchError> {
        Ok(self.generation().await?.views.latest_posts.clone())
    }

    pub async fn popular_posts(&self) -> Result<Vec<PostSummary>, FetchError> {
        Ok(self.generation().await?.views.popular_posts.clone())
    }

    /// Freshness metadata for `/api/status`. `None` until the first
    /// successful refresh.
    pub fn snapshot_info(&self) -> Option<SnapshotInfo> {
        let generation = self.current()?;
        Some(SnapshotInfo {
            fetched_at: generation.snapshot.fetched_at,
            users: generation.snapshot.users.len(),
            posts: generation.snapshot.posts.len(),
            comments: generation.snapshot.comments.len(),
            fresh: self.is_fresh(),
        })
    }
}
