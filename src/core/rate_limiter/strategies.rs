//! Rate limiting strategy implementations

use super::limiter::RateLimiter;
use super::types::{RateLimitEntry, RateLimitPolicy, RateLimitResult};
use crate::utils::current_timestamp_millis;
use std::time::{Duration, Instant};
use tracing::debug;

impl RateLimiter {
    /// Sliding window: count attempts in the trailing `window`
    pub(super) fn sliding_window(
        entry: &mut RateLimitEntry,
        policy: &RateLimitPolicy,
    ) -> RateLimitResult {
        let now = Instant::now();
        entry
            .timestamps
            .retain(|&t| now.duration_since(t) < policy.window);

        let current_count = entry.timestamps.len() as u32;
        let allowed = current_count < policy.limit;
        if allowed {
            entry.timestamps.push(now);
        }

        // Oldest surviving attempt is the next to leave the window
        let reset_after = entry
            .timestamps
            .first()
            .map(|&oldest| policy.window.saturating_sub(now.duration_since(oldest)))
            .unwrap_or(policy.window);

        Self::build_result(allowed, entry.timestamps.len() as u32, policy, reset_after)
    }

    /// Fixed window anchored at the first attempt after a reset
    pub(super) fn fixed_window(
        entry: &mut RateLimitEntry,
        policy: &RateLimitPolicy,
    ) -> RateLimitResult {
        let now = Instant::now();

        if let Some(&first) = entry.timestamps.first() {
            if now.duration_since(first) >= policy.window {
                entry.timestamps.clear();
            }
        }

        let current_count = entry.timestamps.len() as u32;
        let allowed = current_count < policy.limit;
        if allowed {
            entry.timestamps.push(now);
        }

        let window_start = entry.timestamps.first().copied().unwrap_or(now);
        let reset_after = policy.window.saturating_sub(now.duration_since(window_start));

        Self::build_result(allowed, entry.timestamps.len() as u32, policy, reset_after)
    }

    fn build_result(
        allowed: bool,
        used: u32,
        policy: &RateLimitPolicy,
        reset_after: Duration,
    ) -> RateLimitResult {
        let retry_after_secs = if allowed {
            None
        } else {
            debug!("Rate limit exceeded: {}/{} in {:?}", used, policy.limit, policy.window);
            Some(reset_after.as_secs_f64().ceil().max(1.0) as u64)
        };

        RateLimitResult {
            success: allowed,
            limit: policy.limit,
            remaining: policy.limit.saturating_sub(used),
            reset: current_timestamp_millis() + reset_after.as_millis() as u64,
            retry_after_secs,
        }
    }
}
