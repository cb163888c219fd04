// Server loop module
// Accepts connections until a shutdown is requested, then drains in-flight work

use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How often the drain phase re-checks the active connection count
const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Accept connections until `shutdown` is notified, then drain.
///
/// Must run inside a `LocalSet`: connections are served with `spawn_local`.
pub async fn start_server_loop(listener: TcpListener, state: Arc<AppState>, shutdown: Arc<Notify>) {
    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => accept_connection(stream, peer_addr, &state),
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = shutdown.notified() => break,
        }
    }

    // Stop accepting before draining
    drop(listener);
    let remaining = drain_connections(&state).await;
    logger::log_shutdown_complete(remaining);
}

/// Wait for active connections to finish, up to the configured grace period.
///
/// Returns the number of connections still open when waiting stopped.
async fn drain_connections(state: &AppState) -> usize {
    let deadline = tokio::time::Instant::now()
        + Duration::from_secs(state.config.performance.shutdown_grace_period);

    while state.active_connections() > 0 && tokio::time::Instant::now() < deadline {
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }

    state.active_connections()
}
