//! Batch API endpoints
//!
//! `POST /api/batch` runs a batch, `GET /api/batch` reports the effective
//! processor configuration.

use super::ApiError;
use crate::core::batch::{BatchEnvelope, BatchResponse, validate_envelope};
use crate::core::rate_limiter::RateLimitResult;
use crate::server::AppState;
use crate::server::middleware::{REQUEST_ID_HEADER, client_identifier, request_id};
use crate::utils::error::{ErrorResponse, GatewayError};
use actix_web::{HttpRequest, HttpResponse, ResponseError, web};
use serde_json::json;
use std::time::Instant;
use tracing::{Instrument, debug, error, info, info_span, warn};

/// Limiter scope for batch submissions
pub const BATCH_RATE_LIMIT_SCOPE: &str = "batch";

/// Configure batch routes
pub fn configure_batch_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/batch")
            .route(web::post().to(process_batch))
            .route(web::get().to(batch_config)),
    );
}

/// Run a batch
/// POST /api/batch
pub async fn process_batch(
    req: HttpRequest,
    data: web::Data<AppState>,
    payload: web::Json<BatchEnvelope>,
) -> HttpResponse {
    let started = Instant::now();
    let request_id = request_id(&req);
    let envelope = payload.into_inner();

    if let Err(report) = validate_envelope(&envelope, data.processor.config().max_batch_size) {
        let err = GatewayError::from(&report);
        debug!(request_id = %request_id, "Rejected batch: {}", err);
        return HttpResponse::build(err.status_code())
            .insert_header((REQUEST_ID_HEADER, request_id.as_str()))
            .json(ApiError::new("Invalid batch request").with_details(report.errors));
    }

    let caller = client_identifier(req.headers());
    let limit = data
        .rate_limiter
        .check_limit(BATCH_RATE_LIMIT_SCOPE, &caller, &data.batch_policy)
        .await;
    if !limit.success {
        let err = GatewayError::rate_limit(format!(
            "{} batches per {}s",
            data.batch_policy.limit,
            data.batch_policy.window.as_secs()
        ));
        warn!(request_id = %request_id, caller = %caller, "{}", err);
        return rate_limited(&request_id, &limit, &err);
    }

    let batch_size = envelope.requests.len();
    let options = envelope.options.unwrap_or_default();
    let span = info_span!("batch", request_id = %request_id, size = batch_size);

    match data
        .processor
        .process(envelope.requests, &options)
        .instrument(span)
        .await
    {
        Ok(response) => {
            let duration = started.elapsed().as_millis();
            info!(
                request_id = %request_id,
                size = batch_size,
                errors = response.metadata.error_count,
                cached = response.metadata.cached_count,
                duration_ms = duration as u64,
                "Batch completed"
            );
            batch_completed(&request_id, batch_size, duration, &limit, response)
        }
        Err(e) => {
            error!(request_id = %request_id, "Batch processing failed: {}", e);
            HttpResponse::build(e.status_code())
                .insert_header((REQUEST_ID_HEADER, request_id.as_str()))
                .insert_header(("X-Duration", format!("{}ms", started.elapsed().as_millis())))
                .json(ErrorResponse::for_request(&e, &request_id))
        }
    }
}

/// Effective processor configuration
/// GET /api/batch
pub async fn batch_config(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "success": true,
        "config": data.processor.config_view(),
    }))
}

fn batch_completed(
    request_id: &str,
    batch_size: usize,
    duration_ms: u128,
    limit: &RateLimitResult,
    response: BatchResponse,
) -> HttpResponse {
    HttpResponse::Ok()
        .insert_header((REQUEST_ID_HEADER, request_id))
        .insert_header(("X-Batch-Size", batch_size.to_string()))
        .insert_header(("X-Cache-Hits", response.metadata.cached_count.to_string()))
        .insert_header(("X-Duration", format!("{}ms", duration_ms)))
        .insert_header(("X-RateLimit-Limit", limit.limit.to_string()))
        .insert_header(("X-RateLimit-Remaining", limit.remaining.to_string()))
        .json(response)
}

fn rate_limited(request_id: &str, limit: &RateLimitResult, err: &GatewayError) -> HttpResponse {
    let retry_after = limit.retry_after_secs.unwrap_or(1);
    HttpResponse::build(err.status_code())
        .insert_header((REQUEST_ID_HEADER, request_id))
        .insert_header(("X-RateLimit-Limit", limit.limit.to_string()))
        .insert_header(("X-RateLimit-Remaining", limit.remaining.to_string()))
        .insert_header(("X-RateLimit-Reset", limit.reset.to_string()))
        .insert_header(("Retry-After", retry_after.to_string()))
        .json(
            ApiError::new("Too many batch requests, please try again later")
                .with_reset(limit.reset),
        )
}
