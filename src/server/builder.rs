//! Server builder and run_server function
//!
//! This module provides the ServerBuilder for easier server configuration
//! and the run_server function for automatic configuration loading.

use crate::config::Config;
use crate::core::dispatcher::{HandlerRegistry, register_builtin_handlers};
use crate::server::server::HttpServer;
use crate::utils::error::{GatewayError, Result};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default configuration file
pub const DEFAULT_CONFIG_PATH: &str = "config/gateway.yaml";

/// Server builder for easier configuration
pub struct ServerBuilder {
    config: Option<Config>,
    registry: Option<HandlerRegistry>,
    builtin_handlers: bool,
}

impl ServerBuilder {
    /// Create a new server builder; built-in handlers are registered by default
    pub fn new() -> Self {
        Self {
            config: None,
            registry: None,
            builtin_handlers: true,
        }
    }

    /// Set configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Handlers batches are dispatched to
    pub fn with_registry(mut self, registry: HandlerRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Skip `GET /api/health` and `GET /api/batch/config`
    pub fn without_builtin_handlers(mut self) -> Self {
        self.builtin_handlers = false;
        self
    }

    /// Build the HTTP server
    pub fn build(self) -> Result<HttpServer> {
        let config = self
            .config
            .ok_or_else(|| GatewayError::Config("Configuration is required".to_string()))?;

        let mut registry = self.registry.unwrap_or_default();
        if self.builtin_handlers {
            register_builtin_handlers(&mut registry, config.batch())?;
        }

        HttpServer::new(&config, registry)
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Overrides applied on top of the loaded configuration
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Load configuration, falling back to defaults when the file is missing.
///
/// Environment overrides are applied in both cases.
pub async fn load_config(path: &Path) -> Result<Config> {
    let mut config = if path.exists() {
        info!("Loading configuration file: {}", path.display());
        Config::from_file(path).await?
    } else {
        warn!(
            "Configuration file {} not found, using defaults",
            path.display()
        );
        Config::default()
    };

    config.gateway.apply_env_overrides()?;
    config.validate()?;
    Ok(config)
}

/// Run the server with automatic configuration loading
pub async fn run_server(options: RunOptions) -> Result<()> {
    info!("Starting batch gateway v{}", crate::VERSION);

    let path = options
        .config_path
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));
    let mut config = load_config(&path).await?;

    if let Some(host) = options.host {
        config.gateway.server.host = host;
    }
    if let Some(port) = options.port {
        config.gateway.server.port = port;
    }
    config.validate()?;

    let server = ServerBuilder::new().with_config(config.clone()).build()?;
    info!("Server starting at: http://{}", config.server().address());
    info!("API Endpoints:");
    info!("   GET  /health - Health check");
    info!("   POST /api/batch - Run a batch of sub-requests");
    info!("   GET  /api/batch - Batch processor configuration");

    server.start().await
}
