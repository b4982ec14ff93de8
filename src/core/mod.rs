//! Core functionality for the batch gateway
//!
//! This module contains the batch processing logic and the capabilities
//! it depends on.

pub mod batch;
pub mod cache_manager;
pub mod dispatcher;
pub mod rate_limiter;
