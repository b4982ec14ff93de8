//! HTTP server implementation
//!
//! This module provides the actix-web server, its shared state and the
//! batch routes.

pub mod middleware;
pub mod routes;

pub mod builder;
mod handlers;
pub mod server;
pub mod state;
pub mod types;
mod utils;


pub use builder::{RunOptions, ServerBuilder, run_server};
pub use server::HttpServer;
pub use state::AppState;
