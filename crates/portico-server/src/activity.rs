//! Request activity tracking and the inactivity watchdog.
//!
//! Every inbound request stamps the tracker; a background task compares the
//! stamp against the configured timeout and triggers graceful shutdown when
//! the server has been idle long enough.

use crate::state::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::oneshot;
use tracing::{debug, info};

const POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Monotonic last-activity stamp, shared between the middleware and the
/// watchdog.
pub struct ActivityTracker {
    started: Instant,
    last_seen_secs: AtomicU64,
}

impl ActivityTracker {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            last_seen_secs: AtomicU64::new(0),
        }
    }

    /// Record activity now.
    pub fn touch(&self) {
        self.last_seen_secs
            .store(self.started.elapsed().as_secs(), Ordering::Relaxed);
    }

    /// How long the server has been idle. Counts from process start until
    /// the first request arrives.
    pub fn idle(&self) -> Duration {
        let now = self.started.elapsed().as_secs();
        let last = self.last_seen_secs.load(Ordering::Relaxed);
        Duration::from_secs(now.saturating_sub(last))
    }
}

impl Default for ActivityTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Middleware: stamp the tracker on every request.
pub async fn track(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    state.activity.touch();
    next.run(req).await
}

/// Spawn the watchdog task. Sends on `shutdown` once the idle timeout is
/// exceeded, then exits.
pub fn spawn_idle_watchdog(state: Arc<AppState>, shutdown: oneshot::Sender<()>) {
    tokio::spawn(async move {
        let timeout = Duration::from_secs(state.config.idle_timeout_secs);
        let mut ticker = tokio::time::interval(POLL_INTERVAL);
        ticker.tick().await; // first tick completes immediately

        loop {
            ticker.tick().await;
            let idle = state.activity.idle();
            if idle >= timeout {
                info!(
                    target: "portico::activity",
                    "Inactive for {}s, shutting down",
                    idle.as_secs()
                );
                let _ = shutdown.send(());
                return;
            }
            debug!(target: "portico::activity", "Idle for {}s", idle.as_secs());
        }
    });
}
