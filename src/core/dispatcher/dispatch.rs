//! Panic-safe dispatch of one sub-request

use super::registry::{HandlerRegistry, RouteMatch};
use super::types::{DispatchRequest, DispatchResponse, split_path};
use crate::core::batch::BatchRequest;
use actix_web::ResponseError;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, warn};

/// Routes batch sub-requests to registered handlers
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    registry: Arc<HandlerRegistry>,
}

impl RequestDispatcher {
    pub fn new(registry: HandlerRegistry) -> Self {
        Self {
            registry: Arc::new(registry),
        }
    }

    pub fn from_shared(registry: Arc<HandlerRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &HandlerRegistry {
        &self.registry
    }

    /// Cache TTL for a sub-request; `None` when it must not be cached
    pub fn cache_ttl(&self, request: &BatchRequest) -> Option<Duration> {
        let (route, _) = split_path(&request.path);
        self.registry.cache_ttl(request.method, route)
    }

    /// Dispatch a sub-request. Always yields a response.
    pub async fn dispatch(&self, request: &BatchRequest) -> DispatchResponse {
        let (route, mut params) = split_path(&request.path);

        let (handler, path_params) = match self.registry.resolve(request.method, route) {
            RouteMatch::Found {
                handler,
                path_params,
            } => (handler, path_params),
            RouteMatch::MethodNotAllowed => {
                debug!("No {} handler for {}", request.method, route);
                return DispatchResponse::error(
                    405,
                    format!("Method {} not allowed for {}", request.method, route),
                );
            }
            RouteMatch::NotFound => {
                debug!("No route for {} {}", request.method, route);
                return DispatchResponse::error(
                    404,
                    format!("No handler for {} {}", request.method, route),
                );
            }
        };

        if let Some(explicit) = &request.params {
            params.extend(explicit.iter().map(|(k, v)| (k.clone(), v.clone())));
        }

        let dispatch_request = DispatchRequest {
            method: request.method,
            path: route.to_string(),
            path_params,
            params,
            body: request.body.clone(),
            headers: request.headers.clone().unwrap_or_default(),
        };

        match AssertUnwindSafe(handler.handle(dispatch_request))
            .catch_unwind()
            .await
        {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("Handler for {} {} failed: {}", request.method, route, e);
                DispatchResponse::error(e.status_code().as_u16(), e.to_string())
            }
            Err(_) => {
                error!("Handler for {} {} panicked", request.method, route);
                DispatchResponse::error(500, "Internal error: handler panicked")
            }
        }
    }
}
