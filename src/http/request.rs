//! Request handling and transformation.
//!
//! # Responsibilities
//! - Generate unique request IDs (UUID v4)
//! - Derive the externally visible base URL for link rewriting
//!
//! # Design Decisions
//! - Request ID added as early as possible for tracing
//! - `x-forwarded-proto` is trusted so rewritten links survive a TLS
//!   terminator in front of the gateway

use axum::http::{header, HeaderMap, HeaderValue, Request};
use tower_http::request_id::{MakeRequestId, RequestId};
use uuid::Uuid;

/// Header carrying the request ID.
pub const X_REQUEST_ID: &str = "x-request-id";

/// Request ID generator backed by UUID v4.
#[derive(Clone, Copy, Default)]
pub struct MakeRequestUuid;

impl MakeRequestId for MakeRequestUuid {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        let value = HeaderValue::from_str(&Uuid::new_v4().to_string()).ok()?;
        Some(RequestId::new(value))
    }
}

/// The request ID assigned by the middleware, for log correlation.
pub fn request_id(headers: &HeaderMap) -> &str {
    headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
}

/// Base URL the client used to reach us, reconstructed from
/// `x-forwarded-proto` and `Host`. Rewritten image links must point
/// back at this origin, not at the upstream.
pub fn public_base_url(headers: &HeaderMap) -> String {
    let proto = headers
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("http");
    let host = headers
        .get(header::HOST)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("localhost");
    format!("{}://{}", proto, host)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_prefers_forwarded_proto() {
        let mut headers = HeaderMap::new();
        headers.insert(header::HOST, HeaderValue::from_static("gate.example:3002"));
        assert_eq!(public_base_url(&headers), "http://gate.example:3002");

        headers.insert("x-forwarded-proto", HeaderValue::from_static("https"));
        assert_eq!(public_base_url(&headers), "https://gate.example:3002");
    }

    #[test]
    fn base_url_survives_missing_host() {
        assert_eq!(public_base_url(&HeaderMap::new()), "http://localhost");
    }
}
