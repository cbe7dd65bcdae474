// Signal handling module
//
// Supported signals:
// - SIGHUP:  Rebuild the site (re-read the root, new build time)
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)

use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// Swap in a freshly loaded site, keeping the current one on failure
#[cfg(unix)]
async fn rebuild(state: &AppState) {
    match state.rebuild_site().await {
        Ok(site) => logger::log_site_rebuilt(&site),
        Err(e) => logger::log_error(&format!("Site rebuild failed, still serving previous build: {e}")),
    }
}

/// Start signal handlers (Unix only)
///
/// | Signal  | Action           |
/// |---------|------------------|
/// | SIGHUP  | Rebuild site     |
/// | SIGTERM | Graceful stop    |
/// | SIGINT  | Graceful stop    |
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sighup = signal(SignalKind::hangup())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tracing::info!(
        pid = std::process::id(),
        "Signal handlers registered (SIGHUP: rebuild site, SIGTERM/SIGINT: shutdown)"
    );

    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = sighup.recv() => {
                    tracing::info!("SIGHUP received, rebuilding site");
                    rebuild(&state).await;
                }

                _ = sigterm.recv() => {
                    tracing::info!("SIGTERM received");
                    state.shutdown.notify_one();
                    break;
                }

                _ = sigint.recv() => {
                    tracing::info!("SIGINT received");
                    state.shutdown.notify_one();
                    break;
                }
            }
        }
    });

    Ok(())
}

/// Fallback for other platforms - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(state: Arc<AppState>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            tracing::info!("Ctrl+C received");
            state.shutdown.notify_one();
        }
    });

    Ok(())
}
