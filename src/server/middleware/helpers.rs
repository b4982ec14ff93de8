//! Helper functions for middleware

use actix_web::http::header::HeaderMap;

/// Identifier used when no forwarding header is present
pub const ANONYMOUS_CALLER: &str = "anonymous";

/// Caller identity for rate limiting.
///
/// Uses the first address of `X-Forwarded-For`, then `X-Real-IP`.
pub fn client_identifier(headers: &HeaderMap) -> String {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|value| !value.is_empty())
    };

    forwarded
        .or_else(real_ip)
        .unwrap_or(ANONYMOUS_CALLER)
        .to_string()
}
