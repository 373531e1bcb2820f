//! HTTP server service.

use anyhow::Context;
use async_trait::async_trait;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tracing::info;

use super::Service;
use crate::state::{AppState, ServiceStatus};
use crate::web::create_router;

pub struct WebService {
    port: u16,
    state: AppState,
}

impl WebService {
    pub fn new(port: u16, state: AppState) -> Self {
        Self { port, state }
    }
}

#[async_trait]
impl Service for WebService {
    async fn run(self: Box<Self>, mut shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()> {
        let WebService { port, state } = *self;
        let statuses = state.service_statuses.clone();
        let router = create_router(state);

        let listener = TcpListener::bind(("0.0.0.0", port))
            .await
            .with_context(|| format!("failed to bind port {port}"))?;
        info!(port, "web server listening");
        statuses.set("web", ServiceStatus::Active);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.recv().await;
                info!("web server received shutdown signal, draining connections");
            })
            .await
            .context("web server error")?;

        Ok(())
    }
}
