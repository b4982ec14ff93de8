//! # batch-gateway
//!
//! An HTTP gateway that executes batches of sub-requests against an
//! in-process handler table as one logical unit.
//!
//! ## Features
//!
//! - **Deduplication**: identical sub-requests within a batch run once and
//!   their result is fanned out to every id
//! - **Result caching**: GET handlers can declare a TTL; results are served
//!   from a two-tier in-memory cache on later batches
//! - **Bounded concurrency**: units run in parallel under a semaphore, or
//!   strictly in order
//! - **Failure isolation**: timeouts, handler errors and panics become
//!   per-request results and never abort sibling requests
//! - **failFast**: stop dispatching not-yet-started units after a failure
//! - **Rate limiting**: per-caller sliding or fixed window limits
//!
//! ## Gateway Mode
//!
//! ```rust,no_run
//! use batch_gateway::{Config, Gateway, HandlerRegistry, HttpMethod, DispatchResponse, handler_fn};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/gateway.yaml").await?;
//!
//!     let mut registry = HandlerRegistry::new();
//!     registry.register(
//!         HttpMethod::Get,
//!         "/api/services",
//!         handler_fn(|_req| async {
//!             Ok(DispatchResponse::ok(serde_json::json!(["cut", "color"])))
//!         })
//!         .cacheable(Duration::from_secs(300)),
//!     )?;
//!
//!     let gateway = Gateway::new(config, registry)?;
//!     gateway.run().await?;
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod server;
pub mod utils;

// Re-export main types
pub use config::Config;
pub use core::batch::{
    BatchEnvelope, BatchMetadata, BatchOptions, BatchProcessor, BatchRequest, BatchResponse,
    BatchResult, CacheKey, HttpMethod,
};
pub use core::cache_manager::{CacheManager, CachedResponse, ResultCache};
pub use core::dispatcher::{
    DispatchRequest, DispatchResponse, Handler, HandlerRegistry, RequestDispatcher, handler_fn,
};
pub use core::rate_limiter::{RateLimitCheck, RateLimitPolicy, RateLimiter};
pub use utils::error::{GatewayError, Result};

use tracing::info;

/// A batch gateway serving `POST /api/batch`
pub struct Gateway {
    config: Config,
    server: server::HttpServer,
}

impl Gateway {
    /// Create a new gateway dispatching to `registry` plus the built-in handlers
    pub fn new(config: Config, registry: HandlerRegistry) -> Result<Self> {
        info!("Creating new gateway instance");

        let server = server::builder::ServerBuilder::new()
            .with_config(config.clone())
            .with_registry(registry)
            .build()?;

        Ok(Self { config, server })
    }

    /// Get gateway configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the gateway server
    pub async fn run(self) -> Result<()> {
        info!("Starting batch gateway");
        info!("Configuration: {:#?}", self.config);

        self.server.start().await
    }
}

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Gateway build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// Unix seconds at build time
    pub build_time: &'static str,
    /// Git commit hash
    pub git_hash: &'static str,
    /// Rust version
    pub rust_version: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            build_time: option_env!("BUILD_TIME").unwrap_or("unknown"),
            git_hash: option_env!("GIT_HASH").unwrap_or("unknown"),
            rust_version: option_env!("RUST_VERSION").unwrap_or("unknown"),
        }
    }
}

/// Build metadata recorded by the build script
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
