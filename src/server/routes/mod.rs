//! HTTP route modules
//!
//! This module contains all HTTP route handlers organized by functionality.

pub mod batch;

use crate::core::batch::FieldError;
use crate::server::handlers::health_check;
use actix_web::web;
use serde::{Deserialize, Serialize};

/// Error body shared by the batch routes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Always false
    pub success: bool,
    /// Error message
    pub error: String,
    /// Field-level problems, for validation failures
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
    /// Unix milliseconds at which a rate-limited caller may retry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reset: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ApiError {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            details: None,
            reset: None,
            request_id: None,
        }
    }

    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn with_reset(mut self, reset: u64) -> Self {
        self.reset = Some(reset);
        self
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Register every route served by the gateway
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .configure(batch::configure_batch_routes);
}
