//! Error handling integration tests
//!
//! Tests for error types and their HTTP mapping. These tests verify
//! that errors reach callers with the right status and without leaking
//! internal detail.

#[cfg(test)]
mod tests {
    use actix_web::ResponseError;
    use actix_web::body::to_bytes;
    use batch_gateway::utils::error::{ErrorResponse, GatewayError};
    use serde_json::Value;

    // ==================== Status Mapping ====================

    /// Test that client-side errors map to 4xx
    #[test]
    fn test_client_error_statuses() {
        assert_eq!(GatewayError::validation("bad").status_code().as_u16(), 400);
        assert_eq!(GatewayError::bad_request("bad").status_code().as_u16(), 400);
        assert_eq!(GatewayError::rate_limit("slow").status_code().as_u16(), 429);
        assert_eq!(GatewayError::not_found("gone").status_code().as_u16(), 404);
    }

    /// Test that server-side errors map to 5xx
    #[test]
    fn test_server_error_statuses() {
        assert_eq!(GatewayError::cache("down").status_code().as_u16(), 500);
        assert_eq!(GatewayError::config("bad").status_code().as_u16(), 500);
        assert_eq!(GatewayError::internal("oops").status_code().as_u16(), 500);
        assert_eq!(GatewayError::timeout("slow").status_code().as_u16(), 504);
        assert_eq!(GatewayError::dispatch("boom").status_code().as_u16(), 502);
    }

    /// Test that serde failures are treated as bad requests
    #[test]
    fn test_serialization_error_is_bad_request() {
        let err: GatewayError = serde_json::from_str::<Value>("{").unwrap_err().into();
        assert_eq!(err.status_code().as_u16(), 400);
        assert_eq!(err.error_code(), "SERIALIZATION_ERROR");
    }

    // ==================== Response Bodies ====================

    /// Test that cache failures do not leak backend detail
    #[actix_web::test]
    async fn test_cache_error_body_is_sanitized() {
        let err = GatewayError::cache("redis://10.0.0.3:6379 connection refused");
        let response = err.error_response();
        assert_eq!(response.status().as_u16(), 500);

        let bytes = to_bytes(response.into_body()).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        let message = body["error"]["message"].as_str().unwrap();
        assert!(!message.contains("10.0.0.3"));
        assert_eq!(body["error"]["code"], "CACHE_ERROR");
    }

    /// Test that validation messages reach the caller verbatim
    #[test]
    fn test_validation_message_is_public() {
        let err = GatewayError::validation("timeout must be between 100 and 30000 ms");
        let body = ErrorResponse::for_request(&err, "req-1");
        assert!(body.error.message.contains("100 and 30000"));
        assert_eq!(body.error.request_id.as_deref(), Some("req-1"));
    }
}
