//! Server types for health reporting

use crate::core::cache_manager::CacheStats;
use serde::Serialize;

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerHealth {
    /// Server status
    pub status: String,
    /// RFC 3339 timestamp
    pub timestamp: String,
    pub version: String,
    /// Server uptime in seconds
    pub uptime: u64,
    /// Result cache counters, when the in-memory cache is in use
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cache: Option<CacheStats>,
    pub rate_limit: RateLimitHealth,
}

/// Limiter settings as seen by callers
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitHealth {
    pub enabled: bool,
    pub batch_limit: u32,
    pub window_secs: u64,
}
