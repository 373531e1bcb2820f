//! Service registration and coordinated shutdown.

use std::time::Duration;

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use super::Service;

/// Owns every registered [`Service`], spawns them onto the runtime, and
/// drains them when shutdown is requested.
pub struct ServiceManager {
    pending: Vec<(&'static str, Box<dyn Service>)>,
    running: Vec<(&'static str, JoinHandle<anyhow::Result<()>>)>,
    shutdown_tx: broadcast::Sender<()>,
}

impl ServiceManager {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);
        Self {
            pending: Vec::new(),
            running: Vec::new(),
            shutdown_tx,
        }
    }

    pub fn register_service(&mut self, name: &'static str, service: Box<dyn Service>) {
        info!(service = name, "registered service");
        self.pending.push((name, service));
    }

    /// Spawn every registered service onto the runtime. Each gets its own
    /// subscription to the shutdown channel.
    pub fn spawn_all(&mut self) {
        for (name, service) in self.pending.drain(..) {
            let shutdown_rx = self.shutdown_tx.subscribe();
            info!(service = name, "starting service");
            let handle = tokio::spawn(async move { service.run(shutdown_rx).await });
            self.running.push((name, handle));
        }
    }

    /// Broadcast the shutdown signal and wait up to `timeout` for each
    /// service to stop. Returns `false` if any service errored, panicked,
    /// or had to be aborted.
    pub async fn shutdown(self, timeout: Duration) -> bool {
        info!("shutting down services");
        let _ = self.shutdown_tx.send(());

        let mut clean = true;
        for (name, handle) in self.running {
            let abort = handle.abort_handle();
            match tokio::time::timeout(timeout, handle).await {
                Ok(Ok(Ok(()))) => info!(service = name, "service stopped"),
                Ok(Ok(Err(e))) => {
                    error!(service = name, error = %e, "service exited with error");
                    clean = false;
                }
                Ok(Err(e)) => {
                    error!(service = name, error = %e, "service task panicked");
                    clean = false;
                }
                Err(_) => {
                    warn!(
                        service = name,
                        timeout_secs = timeout.as_secs(),
                        "service did not stop in time, aborting"
                    );
                    abort.abort();
                    clean = false;
                }
            }
        }
        clean
    }
}

impl Default for ServiceManager {
    fn default() -> Self {
        Self::new()
    }
}
