//! HTTP middleware implementations
//!
//! - Request ID tracking
//! - Caller identification for rate limiting

mod helpers;
mod request_id;


pub use helpers::{ANONYMOUS_CALLER, client_identifier};
pub use request_id::{
    REQUEST_ID_HEADER, RequestId, RequestIdMiddleware, RequestIdMiddlewareService,
    is_valid_request_id, request_id,
};
