//! HTTP route handlers
//!
//! This module provides HTTP route handler functions.

use crate::server::state::AppState;
use crate::server::types::{RateLimitHealth, ServerHealth};
use actix_web::{HttpResponse, web};

/// Health check endpoint handler
pub async fn health_check(data: web::Data<AppState>) -> HttpResponse {
    let rate_limit = data.config.rate_limit();
    HttpResponse::Ok().json(ServerHealth {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        version: crate::VERSION.to_string(),
        uptime: data.started_at.elapsed().as_secs(),
        cache: data.cache.as_ref().map(|cache| cache.stats()),
        rate_limit: RateLimitHealth {
            enabled: rate_limit.enabled,
            batch_limit: rate_limit.batch_limit,
            window_secs: rate_limit.window_secs,
        },
    })
}
