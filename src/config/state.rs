// Application state module
// Shared, read-only configuration plus the active connection counter

use std::sync::atomic::{AtomicUsize, Ordering};

use super::types::Config;

/// Application state, shared by every connection task behind an `Arc`
pub struct AppState {
    pub config: Config,
    /// Route the function is bound to, computed once at startup
    pub function_route: String,
    active_connections: AtomicUsize,
}

impl AppState {
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            function_route: config.function.route(),
            active_connections: AtomicUsize::new(0),
        }
    }

    /// Reserve a connection slot.
    ///
    /// Increments first, then checks the limit and rolls back on failure, so two
    /// concurrent accepts cannot both slip under the limit.
    /// Returns the number of connections that were active before this one on rejection.
    pub fn try_acquire_connection(&self) -> Result<(), usize> {
        let prev_count = self.active_connections.fetch_add(1, Ordering::SeqCst);
        if let Some(max_conn) = self.config.performance.max_connections {
            if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
                self.active_connections.fetch_sub(1, Ordering::SeqCst);
                return Err(prev_count);
            }
        }
        Ok(())
    }

    /// Case-insensitive match against the function route, tolerating one trailing slash
    pub fn is_function_route(&self, path: &str) -> bool {
        let path = path.strip_suffix('/').unwrap_or(path);
        path.eq_ignore_ascii_case(&self.function_route)
    }

    pub fn release_connection(&self) {
        self.active_connections.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn active_connections(&self) -> usize {
        self.active_connections.load(Ordering::SeqCst)
    }
}
