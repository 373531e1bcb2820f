//! OS signal handling for graceful shutdown.

use std::process::ExitCode;
use std::time::Duration;

use tokio::signal;
use tracing::info;

use super::manager::ServiceManager;

/// Block until Ctrl+C or SIGTERM arrives, then drain the registered
/// services within `shutdown_timeout` seconds.
pub async fn handle_shutdown_signals(manager: ServiceManager, shutdown_timeout: u64) -> ExitCode {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("received Ctrl+C, shutting down"),
        _ = terminate => info!("received SIGTERM, shutting down"),
    }

    if manager.shutdown(Duration::from_secs(shutdown_timeout)).await {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
