//! Test fixtures and data factories
//!
//! Handlers here are real `Handler` implementations; only their bodies
//! are canned.

use batch_gateway::config::Config;
use batch_gateway::core::batch::{BatchProcessor, BatchRequest, HttpMethod};
use batch_gateway::core::cache_manager::CacheManager;
use batch_gateway::core::dispatcher::{
    DispatchRequest, DispatchResponse, HandlerRegistry, RequestDispatcher, handler_fn,
    register_builtin_handlers,
};
use batch_gateway::core::rate_limiter::RateLimiter;
use batch_gateway::server::AppState;
use actix_web::web;
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Handler table used by the integration tests
///
/// | Route | Behavior |
/// |-------|----------|
/// | `GET /api/services` | counted, cacheable for 60s |
/// | `GET /api/users/{id}` | echoes the id and params, uncached |
/// | `GET /api/sleep/{ms}` | sleeps, then answers |
/// | `GET /api/broken` | 503 with an error body |
/// | `POST /api/bookings` | counted, echoes the body with 201 |
#[derive(Clone)]
pub struct TestHandlers {
    pub service_calls: Arc<AtomicUsize>,
    pub booking_calls: Arc<AtomicUsize>,
}

impl Default for TestHandlers {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHandlers {
    pub fn new() -> Self {
        Self {
            service_calls: Arc::new(AtomicUsize::new(0)),
            booking_calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn services_called(&self) -> usize {
        self.service_calls.load(Ordering::SeqCst)
    }

    pub fn bookings_called(&self) -> usize {
        self.booking_calls.load(Ordering::SeqCst)
    }

    pub fn registry(&self, config: &Config) -> HandlerRegistry {
        let mut registry = HandlerRegistry::new();
        register_builtin_handlers(&mut registry, config.batch()).unwrap();

        let services = Arc::clone(&self.service_calls);
        let bookings = Arc::clone(&self.booking_calls);

        registry
            .register(
                HttpMethod::Get,
                "/api/services",
                handler_fn(move |_req| {
                    let services = Arc::clone(&services);
                    async move {
                        services.fetch_add(1, Ordering::SeqCst);
                        Ok(DispatchResponse::ok(json!({
                            "services": [
                                {"id": 1, "name": "Haircut", "minutes": 30},
                                {"id": 2, "name": "Coloring", "minutes": 90}
                            ]
                        })))
                    }
                })
                .cacheable(Duration::from_secs(60)),
            )
            .unwrap()
            .register(
                HttpMethod::Get,
                "/api/users/{id}",
                handler_fn(|req: DispatchRequest| async move {
                    let id = req.path_param("id").map(str::to_string);
                    Ok(DispatchResponse::ok(json!({
                        "id": id,
                        "params": Value::Object(req.params),
                    })))
                }),
            )
            .unwrap()
            .register(
                HttpMethod::Get,
                "/api/sleep/{ms}",
                handler_fn(|req: DispatchRequest| async move {
                    let ms: u64 = req.path_param("ms").and_then(|v| v.parse().ok()).unwrap_or(0);
                    tokio::time::sleep(Duration::from_millis(ms)).await;
                    Ok(DispatchResponse::ok(json!({"slept": ms})))
                }),
            )
            .unwrap()
            .register(
                HttpMethod::Get,
                "/api/broken",
                handler_fn(|_req| async {
                    Ok(DispatchResponse::with_status(
                        503,
                        json!({"error": "calendar service unavailable"}),
                    ))
                }),
            )
            .unwrap()
            .register(
                HttpMethod::Post,
                "/api/bookings",
                handler_fn(move |req: DispatchRequest| {
                    let bookings = Arc::clone(&bookings);
                    async move {
                        bookings.fetch_add(1, Ordering::SeqCst);
                        Ok(DispatchResponse::with_status(201, req.body.unwrap_or_default()))
                    }
                }),
            )
            .unwrap();

        registry
    }

    pub fn processor(&self, config: &Config) -> BatchProcessor {
        let cache = Arc::new(CacheManager::new(config.cache().clone()).unwrap());
        BatchProcessor::new(
            config.batch().clone(),
            Arc::new(RequestDispatcher::new(self.registry(config))),
            cache,
        )
    }

    /// Shared state wired like the real server
    pub fn app_state(&self, config: Config) -> web::Data<AppState> {
        let cache = Arc::new(CacheManager::new(config.cache().clone()).unwrap());
        let processor = BatchProcessor::new(
            config.batch().clone(),
            Arc::new(RequestDispatcher::new(self.registry(&config))),
            cache.clone(),
        );
        let limiter = Arc::new(RateLimiter::new(config.rate_limit()));
        web::Data::new(AppState::new(config, processor, limiter).with_cache_stats(cache))
    }
}

/// Factory for batch envelopes
pub struct BatchFactory;

impl BatchFactory {
    /// GET requests with ids "1", "2", ...
    pub fn gets(paths: &[&str]) -> Value {
        let requests: Vec<Value> = paths
            .iter()
            .enumerate()
            .map(|(i, path)| json!({"id": (i + 1).to_string(), "method": "GET", "path": path}))
            .collect();
        json!({ "requests": requests })
    }

    /// Same as [`gets`](Self::gets) with options attached
    pub fn gets_with_options(paths: &[&str], options: Value) -> Value {
        let mut envelope = Self::gets(paths);
        envelope["options"] = options;
        envelope
    }

    /// Typed requests for processor-level tests
    pub fn requests(paths: &[&str]) -> Vec<BatchRequest> {
        paths
            .iter()
            .enumerate()
            .map(|(i, path)| BatchRequest::new((i + 1).to_string(), HttpMethod::Get, *path))
            .collect()
    }
}
