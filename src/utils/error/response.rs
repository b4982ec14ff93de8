//! HTTP response handling for errors

use super::types::GatewayError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

impl ResponseError for GatewayError {
    fn status_code(&self) -> StatusCode {
        match self {
            GatewayError::Validation(_)
            | GatewayError::BadRequest(_)
            | GatewayError::Serialization(_) => StatusCode::BAD_REQUEST,
            GatewayError::RateLimit(_) => StatusCode::TOO_MANY_REQUESTS,
            GatewayError::NotFound(_) => StatusCode::NOT_FOUND,
            GatewayError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            GatewayError::Dispatch(_) => StatusCode::BAD_GATEWAY,
            GatewayError::Config(_)
            | GatewayError::Yaml(_)
            | GatewayError::Io(_)
            | GatewayError::Cache(_)
            | GatewayError::Server(_)
            | GatewayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error_response = ErrorResponse {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message: self.public_message(),
                timestamp: chrono::Utc::now().timestamp(),
                request_id: None,
            },
        };

        HttpResponse::build(self.status_code()).json(error_response)
    }
}

impl GatewayError {
    /// Message safe to show to clients; cache and IO details stay in the logs
    pub fn public_message(&self) -> String {
        match self {
            GatewayError::Cache(_) => "Result cache is unavailable".to_string(),
            GatewayError::Io(_) | GatewayError::Server(_) | GatewayError::Internal(_) => {
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Standard error response format
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail structure
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    /// Build an error body tagged with the request id
    pub fn for_request(error: &GatewayError, request_id: &str) -> Self {
        Self {
            error: ErrorDetail {
                code: error.error_code().to_string(),
                message: error.public_message(),
                timestamp: chrono::Utc::now().timestamp(),
                request_id: Some(request_id.to_string()),
            },
        }
    }
}
