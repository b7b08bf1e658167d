// Signal handling module
//
// Supported signals:
// - SIGINT:  stop serving (Ctrl+C)
// - SIGTERM: stop serving
//
// There is no graceful drain: the accept loop ends and the process exits.

use crate::logger;

/// Resolve when the process is asked to terminate
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let (mut sigint, mut sigterm) =
        match (signal(SignalKind::interrupt()), signal(SignalKind::terminate())) {
            (Ok(sigint), Ok(sigterm)) => (sigint, sigterm),
            (Err(e), _) | (_, Err(e)) => {
                logger::log_warning(&format!(
                    "Failed to register signal handlers ({e}), falling back to Ctrl+C only"
                ));
                ctrl_c().await;
                return;
            }
        };

    tokio::select! {
        _ = sigint.recv() => logger::log_info("\n[SIGNAL] SIGINT received (Ctrl+C)"),
        _ = sigterm.recv() => logger::log_info("\n[SIGNAL] SIGTERM received"),
    }
}

/// Non-Unix fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger::log_info("\n[SIGNAL] Ctrl+C received"),
        Err(e) => {
            logger::log_error(&format!("Cannot listen for Ctrl+C: {e}"));
            // Without a signal source, serve until killed
            std::future::pending::<()>().await;
        }
    }
}
