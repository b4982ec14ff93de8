//! Utility functions for rate limiter

use super::limiter::RateLimiter;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::debug;

impl RateLimiter {
    /// Drop keys with no attempts left inside their window
    pub async fn cleanup(&self) {
        let now = Instant::now();

        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| {
            let window = entry.window;
            entry.timestamps.retain(|&t| now.duration_since(t) < window);
            !entry.timestamps.is_empty()
        });

        let removed = before - entries.len();
        if removed > 0 {
            debug!("Rate limiter cleanup removed {} idle keys", removed);
        }
    }

    /// Start background cleanup task
    pub fn start_cleanup_task(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                self.cleanup().await;
            }
        })
    }

    /// Number of tracked keys
    pub async fn tracked_keys(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Check if rate limiting is enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
