// Server module entry
// Listener construction, accept loop and graceful shutdown

pub mod connection;
pub mod listener;
pub mod signal;

// Re-export commonly used functions
pub use listener::create_listener;
pub use signal::start_signal_handler;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::config::AppState;
use crate::logger;

/// Accept connections until a shutdown signal arrives, then drain.
///
/// Each accepted connection runs on its own task; an accept error is logged
/// and the loop keeps going.
pub async fn run(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        connection::accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                        );
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => break,
        }
    }

    // Close the listening socket before draining so no new connections land.
    drop(listener);
    drain_connections(
        &active_connections,
        state.config.performance.shutdown_timeout,
    )
    .await;
}

/// Wait for in-flight connections to finish, bounded by the grace period.
/// Connection tasks also carry their own timeout, so stragglers here are
/// clients that stopped reading.
async fn drain_connections(active_connections: &AtomicUsize, grace_secs: u64) {
    let deadline = tokio::time::Instant::now() + std::time::Duration::from_secs(grace_secs);

    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 {
            logger::log_shutdown_complete();
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_shutdown_timeout(active);
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(50)).await;
    }
}
