//! Helper functions for creating specific error types

use super::types::GatewayError;

/// Constructors shared by the gateway and by request handlers.
///
/// A handler returning one of these settles its sub-request with the
/// variant's HTTP status.
impl GatewayError {
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config(message.into())
    }

    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation(message.into())
    }

    pub fn bad_request<S: Into<String>>(message: S) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn rate_limit<S: Into<String>>(message: S) -> Self {
        Self::RateLimit(message.into())
    }

    pub fn cache<S: Into<String>>(message: S) -> Self {
        Self::Cache(message.into())
    }

    pub fn timeout<S: Into<String>>(message: S) -> Self {
        Self::Timeout(message.into())
    }

    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound(message.into())
    }

    pub fn dispatch<S: Into<String>>(message: S) -> Self {
        Self::Dispatch(message.into())
    }

    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server(message.into())
    }

    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal(message.into())
    }

    /// Machine readable code used in error bodies
    pub fn error_code(&self) -> &'static str {
        match self {
            GatewayError::Config(_) => "CONFIG_ERROR",
            GatewayError::Serialization(_) => "SERIALIZATION_ERROR",
            GatewayError::Yaml(_) => "CONFIG_ERROR",
            GatewayError::Io(_) => "IO_ERROR",
            GatewayError::Validation(_) => "VALIDATION_ERROR",
            GatewayError::BadRequest(_) => "BAD_REQUEST",
            GatewayError::RateLimit(_) => "RATE_LIMIT_EXCEEDED",
            GatewayError::Cache(_) => "CACHE_ERROR",
            GatewayError::Timeout(_) => "TIMEOUT",
            GatewayError::NotFound(_) => "NOT_FOUND",
            GatewayError::Dispatch(_) => "DISPATCH_ERROR",
            GatewayError::Server(_) => "SERVER_ERROR",
            GatewayError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}
