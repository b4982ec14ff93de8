//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Enable rate limiting
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Batches a single caller may submit per window
    #[serde(default = "default_batch_rate_limit")]
    pub batch_limit: u32,
    /// Window length in seconds
    #[serde(default = "default_rate_limit_window")]
    pub window_secs: u64,
    /// Rate limiting strategy
    #[serde(default)]
    pub strategy: RateLimitStrategy,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            batch_limit: default_batch_rate_limit(),
            window_secs: default_rate_limit_window(),
            strategy: RateLimitStrategy::default(),
        }
    }
}

/// Rate limiting strategy
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RateLimitStrategy {
    /// Sliding window over individual request timestamps
    #[default]
    SlidingWindow,
    /// Fixed window anchored at the first request
    FixedWindow,
}
