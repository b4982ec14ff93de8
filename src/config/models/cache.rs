//! Result cache configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// In-memory result cache configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Enable the cache; a disabled cache always misses
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Maximum number of entries kept in memory
    #[serde(default = "default_cache_max_entries")]
    pub max_entries: usize,
    /// TTL in seconds applied when a caller passes none
    #[serde(default = "default_cache_ttl")]
    pub default_ttl: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_entries: default_cache_max_entries(),
            default_ttl: default_cache_ttl(),
        }
    }
}

impl CacheConfig {
    pub fn default_ttl_duration(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }
}
