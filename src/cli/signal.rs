//! Cancellation on SIGINT / SIGTERM

use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Cancel `token` when the process receives a termination signal
///
/// The listener runs on a background task; in-flight fetches observe the
/// token and return promptly, and the cache lock is released on unwind.
pub fn cancel_on_signal(token: CancellationToken) {
    tokio::spawn(async move {
        wait_for_signal().await;
        token.cancel();
    });
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => debug!("Received SIGTERM"),
                _ = sigint.recv() => debug!("Received SIGINT"),
            }
        }
        (Err(e), _) | (_, Err(e)) => {
            warn!("Could not register signal handlers, using ctrl_c: {}", e);
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
