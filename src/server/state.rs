//! Application state shared across HTTP handlers

use crate::config::Config;
use crate::core::batch::BatchProcessor;
use crate::core::cache_manager::CacheManager;
use crate::core::rate_limiter::{RateLimitCheck, RateLimitPolicy};
use std::sync::Arc;
use std::time::Instant;

/// HTTP server state shared across handlers
///
/// Every field is cheap to clone; actix clones the state per worker.
#[derive(Clone)]
pub struct AppState {
    /// Gateway configuration (shared read-only)
    pub config: Arc<Config>,
    /// Batch processor
    pub processor: Arc<BatchProcessor>,
    /// Caller-level limiter consulted before every batch
    pub rate_limiter: Arc<dyn RateLimitCheck>,
    /// Policy applied to `POST /api/batch`
    pub batch_policy: RateLimitPolicy,
    /// Concrete cache, when statistics are available
    pub cache: Option<Arc<CacheManager>>,
    /// Process start, for uptime reporting
    pub started_at: Instant,
}

impl AppState {
    /// Create a new AppState with shared resources
    pub fn new(
        config: Config,
        processor: BatchProcessor,
        rate_limiter: Arc<dyn RateLimitCheck>,
    ) -> Self {
        let batch_policy = RateLimitPolicy::from_config(config.rate_limit());
        Self {
            config: Arc::new(config),
            processor: Arc::new(processor),
            rate_limiter,
            batch_policy,
            cache: None,
            started_at: Instant::now(),
        }
    }

    /// Expose cache statistics on the health endpoint
    pub fn with_cache_stats(mut self, cache: Arc<CacheManager>) -> Self {
        self.cache = Some(cache);
        self
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
