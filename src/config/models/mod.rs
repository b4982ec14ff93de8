//! Configuration data models
//!
//! This module defines all configuration structures used throughout the gateway.

#![allow(missing_docs)]

pub mod batch;
pub mod cache;
pub mod gateway;
pub mod rate_limit;
pub mod server;

pub use batch::*;
pub use cache::*;
pub use gateway::*;
pub use rate_limit::*;
pub use server::*;

/// Default values for configuration
pub fn default_host() -> String {
    "0.0.0.0".to_string()
}

/// Default server port
pub fn default_port() -> u16 {
    8000
}

/// Default maximum body size in bytes
pub fn default_max_body_size() -> usize {
    1024 * 1024 // 1MB
}

/// Default maximum number of sub-requests per batch
pub fn default_max_batch_size() -> usize {
    20
}

/// Default batch collection window in milliseconds
pub fn default_batch_window() -> u64 {
    10
}

/// Default per-unit timeout in milliseconds
pub fn default_batch_timeout() -> u64 {
    10_000
}

/// Default number of units dispatched at once
pub fn default_max_concurrency() -> usize {
    20
}

/// Default TTL in seconds for cached sub-request results
pub fn default_cache_ttl() -> u64 {
    300
}

pub fn default_cache_max_entries() -> usize {
    10_000
}

/// Default batches allowed per caller and window
pub fn default_batch_rate_limit() -> u32 {
    10
}

pub fn default_rate_limit_window() -> u64 {
    60
}

pub fn default_true() -> bool {
    true
}
