//! Configuration loading utilities
//!
//! Environment variables layered over file or default configuration.

use super::models::*;
use crate::utils::error::{GatewayError, Result};
use std::env;
use std::str::FromStr;
use tracing::debug;

fn parse_env<T>(name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| GatewayError::Config(format!("Invalid {}: {}", name, e))),
        Err(_) => Ok(None),
    }
}

impl GatewayConfig {
    /// Apply `GATEWAY_*`, `BATCH_*` and `RATE_LIMIT_*` environment overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        debug!("Applying configuration overrides from environment variables");

        if let Ok(host) = env::var("GATEWAY_HOST") {
            self.server.host = host;
        }
        if let Some(port) = parse_env("GATEWAY_PORT")? {
            self.server.port = port;
        }
        if let Some(workers) = parse_env("GATEWAY_WORKERS")? {
            self.server.workers = Some(workers);
        }

        if let Some(timeout) = parse_env("BATCH_TIMEOUT_MS")? {
            self.batch.timeout = timeout;
        }
        if let Some(max) = parse_env("BATCH_MAX_SIZE")? {
            self.batch.max_batch_size = max;
        }
        if let Some(dedup) = parse_env("BATCH_ENABLE_DEDUP")? {
            self.batch.enable_deduplication = dedup;
        }
        if let Some(use_cache) = parse_env("BATCH_USE_CACHE")? {
            self.batch.use_cache = use_cache;
        }
        if let Some(concurrency) = parse_env("BATCH_MAX_CONCURRENCY")? {
            self.batch.max_concurrency = concurrency;
        }

        if let Some(enabled) = parse_env("RATE_LIMIT_ENABLED")? {
            self.rate_limit.enabled = enabled;
        }
        if let Some(limit) = parse_env("RATE_LIMIT_BATCH_LIMIT")? {
            self.rate_limit.batch_limit = limit;
        }

        Ok(())
    }
}
