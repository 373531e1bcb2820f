//! Long-running service lifecycle: registration, spawning, shutdown.

pub mod manager;
pub mod refresher;
pub mod signals;
pub mod web;

use async_trait::async_trait;
use tokio::sync::broadcast;

/// A long-running task owned by the `ServiceManager`.
///
/// `run` is handed a shutdown receiver and must exit promptly once the
/// signal fires; the manager aborts stragglers after the drain timeout.
#[async_trait]
pub trait Service: Send {
    async fn run(self: Box<Self>, shutdown_rx: broadcast::Receiver<()>) -> anyhow::Result<()>;
}
