//! Error handling for the batch gateway
//!
//! This module defines the error type shared by every layer of the gateway
//! and its mapping onto HTTP responses.

#![allow(missing_docs)]

mod helpers;
mod response;
mod types;

pub use response::{ErrorDetail, ErrorResponse};
pub use types::{GatewayError, Result};
