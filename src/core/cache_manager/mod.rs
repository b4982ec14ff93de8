//! Result cache capability and its in-memory implementation
//!
//! The batch processor only ever talks to [`ResultCache`]; storage and
//! eviction live behind it. [`CacheManager`] is the default two-tier
//! in-memory implementation (hot LRU in front of a TTL map).

pub mod manager;
pub mod types;


pub use manager::CacheManager;
pub use types::{CacheEntry, CacheStats, CachedResponse};

use crate::utils::error::Result;
use async_trait::async_trait;
use std::time::Duration;

/// TTL key-value cache consulted for cacheable GET units
///
/// Implementations must be safe to share between concurrent batches.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ResultCache: Send + Sync {
    /// Look up a cached response, `Ok(None)` on a miss
    async fn get(&self, key: &str) -> Result<Option<CachedResponse>>;

    /// Store a response for `ttl`
    async fn set(&self, key: &str, value: CachedResponse, ttl: Duration) -> Result<()>;
}
