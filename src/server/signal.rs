// Signal handling module
//
// SIGTERM and SIGINT both mean the same thing here: stop accepting, drain
// in-flight connections, exit. There is nothing to reload at runtime.

use std::sync::Arc;
use tokio::sync::Notify;

use crate::logger;

/// Start the signal listener (Unix).
///
/// The first termination signal notifies `shutdown` and the task exits;
/// a second signal therefore terminates the process the default way.
#[cfg(unix)]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");

        tokio::select! {
            _ = sigterm.recv() => logger::log_shutdown_requested("SIGTERM"),
            _ = sigint.recv() => logger::log_shutdown_requested("SIGINT"),
        }

        // notify_one stores a permit, so the accept loop picks the signal
        // up even if it is busy accepting right now.
        shutdown.notify_one();
    });
}

/// Windows fallback - only handles Ctrl+C
#[cfg(not(unix))]
pub fn start_signal_handler(shutdown: Arc<Notify>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_shutdown_requested("Ctrl+C");
            shutdown.notify_one();
        }
    });
}
