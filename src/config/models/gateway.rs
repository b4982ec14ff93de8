//! Main gateway configuration

#![allow(missing_docs)]

use super::*;
use serde::{Deserialize, Serialize};

/// Main gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GatewayConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Batch processor configuration
    #[serde(default)]
    pub batch: ProcessorConfig,
    /// Result cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}
