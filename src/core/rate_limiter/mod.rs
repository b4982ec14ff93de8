//! Rate Limiting Implementation
//!
//! Provides sliding and fixed window rate limiting behind the
//! [`RateLimitCheck`] capability the batch gateway consumes.

mod limiter;
mod strategies;
mod types;
mod utils;


pub use limiter::RateLimiter;
pub use types::{RateLimitPolicy, RateLimitResult};

use async_trait::async_trait;

/// Caller-level rate limiting capability
///
/// `scope` namespaces independent limits (one per endpoint family) so the
/// same identifier can be tracked separately in each.
#[async_trait]
pub trait RateLimitCheck: Send + Sync {
    /// Atomically check the limit for `identifier` and record the attempt if allowed
    async fn check_limit(
        &self,
        scope: &str,
        identifier: &str,
        policy: &RateLimitPolicy,
    ) -> RateLimitResult;
}
