//! Batch processor configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Hard upper bound on sub-requests in one batch
pub const MAX_BATCH_SIZE_LIMIT: usize = 20;
/// Smallest per-unit timeout a caller may request, in milliseconds
pub const MIN_TIMEOUT_MS: u64 = 100;
/// Largest per-unit timeout a caller may request, in milliseconds
pub const MAX_TIMEOUT_MS: u64 = 30_000;

/// Process-wide batch processor settings, read-only once the server starts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorConfig {
    /// Maximum sub-requests accepted per batch
    #[serde(default = "default_max_batch_size")]
    pub max_batch_size: usize,
    /// Collection window in milliseconds, reported to clients
    #[serde(default = "default_batch_window")]
    pub batch_window: u64,
    /// Default per-unit timeout in milliseconds
    #[serde(default = "default_batch_timeout")]
    pub timeout: u64,
    /// Collapse identical sub-requests into one unit of work
    #[serde(default = "default_true")]
    pub enable_deduplication: bool,
    /// Serve cacheable GET units from the result cache
    #[serde(default = "default_true")]
    pub use_cache: bool,
    /// Units dispatched at once in parallel mode
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,
    /// TTL in seconds for results whose handler does not set one
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl: u64,
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            max_batch_size: default_max_batch_size(),
            batch_window: default_batch_window(),
            timeout: default_batch_timeout(),
            enable_deduplication: true,
            use_cache: true,
            max_concurrency: default_max_concurrency(),
            cache_ttl: default_cache_ttl(),
        }
    }
}

impl ProcessorConfig {
    /// Default per-unit timeout
    pub fn timeout_duration(&self) -> Duration {
        Duration::from_millis(self.timeout)
    }

    /// Fallback TTL for cached results
    pub fn cache_ttl_duration(&self) -> Duration {
        Duration::from_secs(self.cache_ttl)
    }
}
