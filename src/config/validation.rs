//! Configuration validation
//!
//! Every configuration section implements [`Validate`]; `Config::validate`
//! runs them in order and wraps the first failure in a config error.

use super::models::*;

/// Validation trait for configuration structures
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.port == 0 {
            return Err("Port cannot be 0".to_string());
        }

        if self.max_body_size == 0 {
            return Err("Max body size cannot be 0".to_string());
        }

        if let Some(0) = self.workers {
            return Err("Worker count cannot be 0".to_string());
        }

        if self.cors.enabled && self.cors.allows_all_origins() && self.cors.allow_credentials {
            return Err(
                "CORS cannot allow all origins (*) when credentials are enabled".to_string(),
            );
        }

        Ok(())
    }
}

impl Validate for ProcessorConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_batch_size == 0 || self.max_batch_size > MAX_BATCH_SIZE_LIMIT {
            return Err(format!(
                "max_batch_size must be between 1 and {}",
                MAX_BATCH_SIZE_LIMIT
            ));
        }

        if !(MIN_TIMEOUT_MS..=MAX_TIMEOUT_MS).contains(&self.timeout) {
            return Err(format!(
                "timeout must be between {} and {} ms",
                MIN_TIMEOUT_MS, MAX_TIMEOUT_MS
            ));
        }

        if self.max_concurrency == 0 {
            return Err("max_concurrency must be greater than 0".to_string());
        }

        if self.use_cache && self.cache_ttl == 0 {
            return Err("cache_ttl must be greater than 0 when use_cache is set".to_string());
        }

        Ok(())
    }
}

impl Validate for CacheConfig {
    fn validate(&self) -> Result<(), String> {
        if self.max_entries == 0 {
            return Err("Cache max entries must be greater than 0".to_string());
        }

        if self.default_ttl == 0 {
            return Err("Cache TTL must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for RateLimitConfig {
    fn validate(&self) -> Result<(), String> {
        if self.batch_limit == 0 {
            return Err("Batch limit must be greater than 0".to_string());
        }

        if self.window_secs == 0 {
            return Err("Rate limit window must be greater than 0".to_string());
        }

        Ok(())
    }
}
