//! Handler capability

use super::types::{DispatchRequest, DispatchResponse};
use crate::utils::error::Result;
use async_trait::async_trait;
use std::future::Future;
use std::marker::PhantomData;
use std::time::Duration;

/// Something that can answer a routed sub-request.
///
/// Returning `Err` is equivalent to returning an error response with the
/// status the error maps to.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, request: DispatchRequest) -> Result<DispatchResponse>;

    /// How long successful GET responses of this handler may be cached.
    /// `None` means never cached; `Some(Duration::ZERO)` defers to the
    /// processor's configured TTL.
    fn cache_ttl(&self) -> Option<Duration> {
        None
    }
}

/// Adapter turning an async closure into a [`Handler`]
pub struct FnHandler<F, Fut> {
    func: F,
    _marker: PhantomData<fn() -> Fut>,
}

/// Wrap an async function as a handler
pub fn handler_fn<F, Fut>(func: F) -> FnHandler<F, Fut>
where
    F: Fn(DispatchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<DispatchResponse>> + Send,
{
    FnHandler {
        func,
        _marker: PhantomData,
    }
}

impl<F, Fut> FnHandler<F, Fut> {
    /// Declare the handler's responses cacheable for `ttl`
    pub fn cacheable(self, ttl: Duration) -> Cacheable<Self> {
        Cacheable { inner: self, ttl }
    }
}

#[async_trait]
impl<F, Fut> Handler for FnHandler<F, Fut>
where
    F: Fn(DispatchRequest) -> Fut + Send + Sync,
    Fut: Future<Output = Result<DispatchResponse>> + Send,
{
    async fn handle(&self, request: DispatchRequest) -> Result<DispatchResponse> {
        (self.func)(request).await
    }
}

/// Decorator giving any handler a cache TTL
pub struct Cacheable<H> {
    inner: H,
    ttl: Duration,
}

impl<H: Handler> Cacheable<H> {
    pub fn new(inner: H, ttl: Duration) -> Self {
        Self { inner, ttl }
    }

    /// Cacheable for the processor's configured `cache_ttl`
    pub fn with_default_ttl(inner: H) -> Self {
        Self::new(inner, Duration::ZERO)
    }
}

#[async_trait]
impl<H: Handler> Handler for Cacheable<H> {
    async fn handle(&self, request: DispatchRequest) -> Result<DispatchResponse> {
        self.inner.handle(request).await
    }

    fn cache_ttl(&self) -> Option<Duration> {
        Some(self.ttl)
    }
}
