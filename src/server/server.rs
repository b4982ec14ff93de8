//! HTTP server core implementation
//!
//! This module provides the HttpServer struct and its core methods.

use crate::config::{Config, ServerConfig};
use crate::core::batch::{BatchProcessor, FieldError};
use crate::core::cache_manager::CacheManager;
use crate::core::dispatcher::{HandlerRegistry, RequestDispatcher};
use crate::core::rate_limiter::RateLimiter;
use crate::server::middleware::{REQUEST_ID_HEADER, RequestIdMiddleware, request_id};
use crate::server::routes::{self, ApiError};
use crate::server::state::AppState;
use crate::utils::error::{GatewayError, Result};
use actix_cors::Cors;
use actix_web::error::{InternalError, JsonPayloadError};
use actix_web::http::StatusCode;
use actix_web::{App, HttpResponse, HttpServer as ActixHttpServer, middleware::DefaultHeaders, web};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use tracing_actix_web::TracingLogger;

/// HTTP server
pub struct HttpServer {
    /// Server configuration
    config: ServerConfig,
    /// Application state
    state: AppState,
    /// Concrete limiter, kept for housekeeping
    limiter: Arc<RateLimiter>,
    /// Concrete cache, kept for housekeeping
    cache: Arc<CacheManager>,
}

impl HttpServer {
    /// Create a new HTTP server dispatching batches to `registry`
    pub fn new(config: &Config, registry: HandlerRegistry) -> Result<Self> {
        info!("Creating HTTP server with {} routes", registry.len());

        let cache = Arc::new(CacheManager::new(config.cache().clone())?);
        let limiter = Arc::new(RateLimiter::new(config.rate_limit()));
        let processor = BatchProcessor::new(
            config.batch().clone(),
            Arc::new(RequestDispatcher::new(registry)),
            cache.clone(),
        );

        let state = AppState::new(config.clone(), processor, limiter.clone())
            .with_cache_stats(cache.clone());

        Ok(Self {
            config: config.gateway.server.clone(),
            state,
            limiter,
            cache,
        })
    }

    /// Create the Actix-web application
    pub fn create_app(
        state: web::Data<AppState>,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = actix_web::dev::ServiceResponse<impl actix_web::body::MessageBody>,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let server_config = &state.config.gateway.server;
        let cors = build_cors(server_config);
        let json_config = json_config(server_config.max_body_size);

        App::new()
            .app_data(state)
            .app_data(json_config)
            .wrap(cors)
            .wrap(RequestIdMiddleware)
            .wrap(TracingLogger::default())
            .wrap(DefaultHeaders::new().add(("Server", "batch-gateway")))
            .configure(routes::configure_routes)
    }

    /// Start the HTTP server
    pub async fn start(self) -> Result<()> {
        let bind_addr = self.config.address();
        let port = self.config.port;
        let workers = self.config.worker_count();

        info!("Starting HTTP server on {} with {} workers", bind_addr, workers);

        let window = self.state.batch_policy.window;
        let _limiter_task = Arc::clone(&self.limiter).start_cleanup_task(window);
        let _cache_task = Self::start_cache_sweeper(Arc::clone(&self.cache), window);

        let state = web::Data::new(self.state);

        let server = ActixHttpServer::new(move || Self::create_app(state.clone()))
            .workers(workers)
            .bind(&bind_addr)
            .map_err(|e| Self::format_bind_error(e, &bind_addr, port))?
            .run();

        info!("HTTP server listening on {}", bind_addr);

        server
            .await
            .map_err(|e| GatewayError::server(format!("Server error: {}", e)))?;

        info!("HTTP server stopped");
        Ok(())
    }

    /// Get server configuration
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Get application state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    fn start_cache_sweeper(
        cache: Arc<CacheManager>,
        every: Duration,
    ) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(every);
            loop {
                interval.tick().await;
                let removed = cache.cleanup_expired();
                if removed > 0 {
                    tracing::debug!("Swept {} expired cache entries", removed);
                }
            }
        })
    }
}

fn build_cors(config: &ServerConfig) -> Cors {
    let cors_config = &config.cors;
    if !cors_config.enabled {
        return Cors::default();
    }

    let mut cors = if cors_config.allows_all_origins() {
        cors_config.warn_if_permissive();
        Cors::default().allow_any_origin()
    } else {
        cors_config
            .allowed_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
    };

    cors = cors
        .allowed_methods(vec!["GET", "POST"])
        .allow_any_header()
        .expose_headers(vec![
            REQUEST_ID_HEADER,
            "x-batch-size",
            "x-cache-hits",
            "x-duration",
            "x-ratelimit-limit",
            "x-ratelimit-remaining",
            "retry-after",
        ])
        .max_age(cors_config.max_age as usize);

    if cors_config.allow_credentials {
        cors = cors.supports_credentials();
    }
    cors
}

/// JSON extractor settings; malformed bodies get the batch error shape
pub fn json_config(max_body_size: usize) -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(max_body_size)
        .error_handler(|err, req| {
            let request_id = request_id(req);
            let status = match &err {
                JsonPayloadError::Overflow { .. } | JsonPayloadError::OverflowKnownLength { .. } => {
                    StatusCode::PAYLOAD_TOO_LARGE
                }
                _ => StatusCode::BAD_REQUEST,
            };
            let body = ApiError::new("Invalid batch request")
                .with_details(vec![FieldError::new("body", err.to_string())])
                .with_request_id(request_id.as_str());
            let response = HttpResponse::build(status)
                .insert_header((REQUEST_ID_HEADER, request_id))
                .json(body);
            InternalError::from_response(err, response).into()
        })
}
