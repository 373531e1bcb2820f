//! Background snapshot refresher.
//!
//! Forces a refresh every freshness window so request handlers almost
//! always hit a warm snapshot instead of paying the fetch themselves.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::broadcast;
use tracing::info;

use super::Service;
use crate::cache::ViewCache;
use crate::state::{ServiceStatus, ServiceStatusRegistry};
use crate::utils::fmt_duration;

pub struct RefreshService {
    cache: ViewCache,
    interval: Duration,
    statuses: ServiceStatusRegistry,
}

impl RefreshService {
    pub fn new(cache: ViewCache, interval: Duration, statuses: ServiceStatusRegistry) -> Self {
        Self {
            cache,
            interval,
            statuses,
        }
    }
}

#[async_trait]
impl Service for RefreshService {
    async fn run(self: Box<Self>, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        info!(
            interval = fmt_duration(self.interval),
            "snapshot refresher started"
        );
        self.statuses.set("refresher", ServiceStatus::Active);

        let mut ticker = tokio::time::interval(self.interval);
        ticker.tick().await; // skip the immediate first tick, startup already fetched once

        loop {
            tokio::select! {
                _ = shutdown_rx.recv() => {
                    info!("snapshot refresher received shutdown signal, exiting gracefully");
                    break;
                }
                _ = ticker.tick() => {
                    match self.cache.ensure_fresh(true).await {
                        Ok(()) => self.statuses.set("refresher", ServiceStatus::Active),
                        // The cache logs the failure; readers keep serving the
                        // previous snapshot until a later refresh succeeds.
                        Err(_) => self.statuses.set("refresher", ServiceStatus::Error),
                    }
                }
            }
        }

        Ok(())
    }
}
