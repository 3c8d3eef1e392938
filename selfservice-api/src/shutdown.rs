//! Graceful shutdown handling
//!
//! In-flight requests finish on SIGTERM/SIGINT; a provisioning run that is
//! already talking to the platform is not interrupted.

use tracing::{error, info};

/// Resolves once the process is asked to stop
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm = match signal(SignalKind::terminate()) {
            Ok(sigterm) => sigterm,
            Err(e) => {
                error!("Failed to register SIGTERM handler: {}", e);
                return ctrl_c().await;
            }
        };

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = ctrl_c() => {}
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;

    info!("Initiating graceful shutdown...");
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl+C"),
        Err(e) => {
            error!("Failed to register Ctrl+C handler: {}", e);
            std::future::pending::<()>().await
        }
    }
}
