//! In-memory sliding-window rate limiter.
//!
//! Each (user, action) pair owns a queue of recent attempt timestamps;
//! a check prunes timestamps older than the action's window and refuses
//! the attempt when the queue is full. State is per-process and ephemeral:
//! a restart clears all windows, which is acceptable for abuse throttling.
//!
//! Uses [`tokio::time::Instant`] so tests can drive the clock
//! deterministically with `tokio::time::pause`.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use std::time::Duration;

use stayhub_core::rate_limit::policy;
use stayhub_core::types::DbId;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Interval between stale-window sweeps (in seconds).
const PURGE_INTERVAL_SECS: u64 = 300;

/// Sliding-window counters keyed by (user, action).
pub struct RateLimiter {
    windows: RwLock<HashMap<(DbId, &'static str), VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Create a new, empty limiter.
    pub fn new() -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
        }
    }

    /// Record an attempt for (user, action) and report whether it is allowed.
    ///
    /// Returns `true` (and counts the attempt) when the user is under the
    /// action's policy, `false` when the window is full. Actions without a
    /// policy are always allowed and never recorded.
    pub async fn check(&self, user_id: DbId, action: &'static str) -> bool {
        let Some(policy) = policy(action) else {
            return true;
        };
        let now = Instant::now();
        let window = Duration::from_secs(policy.window_secs);

        let mut windows = self.windows.write().await;
        let attempts = windows.entry((user_id, action)).or_default();

        while let Some(oldest) = attempts.front() {
            if now.duration_since(*oldest) >= window {
                attempts.pop_front();
            } else {
                break;
            }
        }

        if attempts.len() >= policy.max_requests as usize {
            tracing::warn!(user_id, action, "Rate limit exceeded");
            return false;
        }

        attempts.push_back(now);
        true
    }

    /// Drop (user, action) entries whose attempts have all left the window.
    ///
    /// Keeps the map from accumulating a key per user that ever acted.
    pub async fn purge_stale(&self) {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        windows.retain(|(_, action), attempts| {
            let Some(policy) = policy(action) else {
                return false;
            };
            let window = Duration::from_secs(policy.window_secs);
            attempts
                .back()
                .is_some_and(|last| now.duration_since(*last) < window)
        });
    }

    /// Number of tracked (user, action) windows. Used by tests and metrics logging.
    pub async fn tracked_windows(&self) -> usize {
        self.windows.read().await.len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

/// Spawn a background task that periodically sweeps stale windows.
///
/// The task runs until `cancel` is triggered.
pub fn start_purge_task(
    limiter: Arc<RateLimiter>,
    cancel: CancellationToken,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(PURGE_INTERVAL_SECS));

        loop {
            tokio::select! {
                _ = interval.tick() => {
                    limiter.purge_stale().await;
                    let tracked = limiter.tracked_windows().await;
                    tracing::debug!(tracked, "Rate limiter sweep complete");
                }
                _ = cancel.cancelled() => {
                    tracing::info!("Rate limiter purge task shutting down");
                    break;
                }
            }
        }
    })
}
