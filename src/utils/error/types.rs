//! Error types for the gateway

use thiserror::Error;

/// Result type alias for the gateway
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(String),

    /// Bad request errors
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Rate limiting errors
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Result cache errors
    #[error("Cache error: {0}")]
    Cache(String),

    /// Timeout errors
    #[error("Timeout error: {0}")]
    Timeout(String),

    /// Not found errors
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failure inside an in-process handler
    #[error("Dispatch error: {0}")]
    Dispatch(String),

    /// HTTP server startup and runtime errors
    #[error("Server error: {0}")]
    Server(String),

    /// Internal server errors
    #[error("Internal server error: {0}")]
    Internal(String),
}
