//! Rate limiter types and data structures

use crate::config::models::rate_limit::RateLimitConfig;
use serde::Serialize;
use std::time::{Duration, Instant};

/// Limit applied to one scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    /// Maximum attempts per window
    pub limit: u32,
    /// Window length
    pub window: Duration,
}

impl RateLimitPolicy {
    pub fn new(limit: u32, window: Duration) -> Self {
        Self { limit, window }
    }

    /// Ten batches per minute
    pub fn batch_default() -> Self {
        Self::new(10, Duration::from_secs(60))
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.batch_limit, Duration::from_secs(config.window_secs))
    }
}

/// Rate limit result
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub success: bool,
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Remaining requests in the window
    pub remaining: u32,
    /// Unix timestamp in milliseconds at which the window frees up
    pub reset: u64,
    /// Seconds to wait before retrying, only set when rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub retry_after_secs: Option<u64>,
}

/// Rate limit entry for tracking request counts
#[derive(Debug, Clone)]
pub(super) struct RateLimitEntry {
    /// Request timestamps inside the current window
    pub(super) timestamps: Vec<Instant>,
    /// Window of the last policy applied to this key
    pub(super) window: Duration,
}

impl RateLimitEntry {
    pub(super) fn new(window: Duration) -> Self {
        Self {
            timestamps: Vec::new(),
            window,
        }
    }
}
