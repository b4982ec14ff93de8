//! Configuration management for the gateway
//!
//! This module handles loading, validation, and management of all gateway configuration.

pub mod loader;
pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{GatewayError, Result};
use std::path::Path;
use tracing::{debug, info};

/// Main configuration struct for the gateway
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Gateway configuration
    pub gateway: GatewayConfig,
}

impl Config {
    /// Load configuration from file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| GatewayError::Config(format!("Failed to read config file: {}", e)))?;

        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML document
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // An empty document means "all defaults"
        let gateway: GatewayConfig = if content.trim().is_empty() {
            GatewayConfig::default()
        } else {
            serde_yaml::from_str(content)
                .map_err(|e| GatewayError::Config(format!("Failed to parse config: {}", e)))?
        };

        let config = Self { gateway };
        config.validate()?;

        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Load configuration from environment variables on top of the defaults
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut gateway = GatewayConfig::default();
        gateway.apply_env_overrides()?;
        let config = Self { gateway };

        config.validate()?;
        Ok(config)
    }

    /// Get server configuration
    pub fn server(&self) -> &ServerConfig {
        &self.gateway.server
    }

    /// Get batch processor configuration
    pub fn batch(&self) -> &ProcessorConfig {
        &self.gateway.batch
    }

    /// Get result cache configuration
    pub fn cache(&self) -> &CacheConfig {
        &self.gateway.cache
    }

    /// Get rate limit configuration
    pub fn rate_limit(&self) -> &RateLimitConfig {
        &self.gateway.rate_limit
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        debug!("Validating configuration");

        self.gateway
            .server
            .validate()
            .map_err(|e| GatewayError::Config(format!("Server config error: {}", e)))?;

        self.gateway
            .batch
            .validate()
            .map_err(|e| GatewayError::Config(format!("Batch config error: {}", e)))?;

        self.gateway
            .cache
            .validate()
            .map_err(|e| GatewayError::Config(format!("Cache config error: {}", e)))?;

        self.gateway
            .rate_limit
            .validate()
            .map_err(|e| GatewayError::Config(format!("Rate limit config error: {}", e)))?;

        self.gateway.server.cors.warn_if_permissive();

        debug!("Configuration validation completed");
        Ok(())
    }

    /// Convert to YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(&self.gateway)
            .map_err(|e| GatewayError::Config(format!("Failed to serialize config to YAML: {}", e)))
    }
}
