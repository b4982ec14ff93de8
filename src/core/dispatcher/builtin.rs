//! Handlers registered by default

use super::handler::Handler;
use super::registry::HandlerRegistry;
use super::types::{DispatchRequest, DispatchResponse};
use crate::config::models::batch::ProcessorConfig;
use crate::core::batch::{HttpMethod, ProcessorConfigView};
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::json;

/// `GET /api/health`
pub struct HealthHandler;

#[async_trait]
impl Handler for HealthHandler {
    async fn handle(&self, _request: DispatchRequest) -> Result<DispatchResponse> {
        Ok(DispatchResponse::ok(json!({
            "status": "healthy",
            "timestamp": chrono::Utc::now().to_rfc3339(),
            "version": crate::VERSION,
        })))
    }
}

/// `GET /api/batch/config`
pub struct BatchConfigHandler {
    view: ProcessorConfigView,
}

impl BatchConfigHandler {
    pub fn new(config: &ProcessorConfig) -> Self {
        Self {
            view: ProcessorConfigView::from(config),
        }
    }
}

#[async_trait]
impl Handler for BatchConfigHandler {
    async fn handle(&self, _request: DispatchRequest) -> Result<DispatchResponse> {
        Ok(DispatchResponse::ok(serde_json::to_value(&self.view)?))
    }
}

/// Register the built-in handlers on `registry`
pub fn register_builtin_handlers(
    registry: &mut HandlerRegistry,
    config: &ProcessorConfig,
) -> Result<()> {
    registry
        .register(HttpMethod::Get, "/api/health", HealthHandler)?
        .register(
            HttpMethod::Get,
            "/api/batch/config",
            BatchConfigHandler::new(config),
        )?;
    Ok(())
}
