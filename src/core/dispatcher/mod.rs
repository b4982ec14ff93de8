//! In-process request dispatcher
//!
//! Sub-requests of a batch are routed to handlers registered in a
//! [`HandlerRegistry`]. The [`RequestDispatcher`] never returns an error:
//! unknown routes, handler errors and handler panics all become a
//! [`DispatchResponse`] with a non-2xx status.

mod builtin;
mod dispatch;
mod handler;
mod registry;
mod types;


pub use builtin::{BatchConfigHandler, HealthHandler, register_builtin_handlers};
pub use dispatch::RequestDispatcher;
pub use handler::{Cacheable, FnHandler, Handler, handler_fn};
pub use registry::{HandlerRegistry, PathPattern, RouteMatch};
pub use types::{DispatchBody, DispatchRequest, DispatchResponse, split_path};
