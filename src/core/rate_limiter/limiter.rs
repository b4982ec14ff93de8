//! Core rate limiter implementation

use super::RateLimitCheck;
use super::types::{RateLimitEntry, RateLimitPolicy, RateLimitResult};
use crate::config::models::rate_limit::{RateLimitConfig, RateLimitStrategy};
use crate::utils::current_timestamp_millis;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory rate limiter keyed by `scope:identifier`
pub struct RateLimiter {
    pub(super) enabled: bool,
    pub(super) strategy: RateLimitStrategy,
    pub(super) entries: Arc<RwLock<HashMap<String, RateLimitEntry>>>,
}

impl RateLimiter {
    /// Create a new rate limiter
    pub fn new(config: &RateLimitConfig) -> Self {
        Self {
            enabled: config.enabled,
            strategy: config.strategy,
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub(super) fn entry_key(scope: &str, identifier: &str) -> String {
        format!("{}:{}", scope, identifier)
    }

    /// Atomically check and record an attempt
    pub async fn check_and_record(
        &self,
        scope: &str,
        identifier: &str,
        policy: &RateLimitPolicy,
    ) -> RateLimitResult {
        if !self.enabled {
            return RateLimitResult {
                success: true,
                limit: policy.limit,
                remaining: policy.limit,
                reset: current_timestamp_millis(),
                retry_after_secs: None,
            };
        }

        let key = Self::entry_key(scope, identifier);
        let mut entries = self.entries.write().await;
        let entry = entries
            .entry(key)
            .or_insert_with(|| RateLimitEntry::new(policy.window));
        entry.window = policy.window;

        match self.strategy {
            RateLimitStrategy::SlidingWindow => Self::sliding_window(entry, policy),
            RateLimitStrategy::FixedWindow => Self::fixed_window(entry, policy),
        }
    }
}

#[async_trait]
impl RateLimitCheck for RateLimiter {
    async fn check_limit(
        &self,
        scope: &str,
        identifier: &str,
        policy: &RateLimitPolicy,
    ) -> RateLimitResult {
        self.check_and_record(scope, identifier, policy).await
    }
}

impl Clone for RateLimiter {
    fn clone(&self) -> Self {
        Self {
            enabled: self.enabled,
            strategy: self.strategy,
            entries: self.entries.clone(),
        }
    }
}
