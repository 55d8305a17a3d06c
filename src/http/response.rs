//! Response helpers.
//!
//! # Responsibilities
//! - Uniform JSON error bodies for the catalog API surface
//! - Plain-text failures for the stream surface (players do not parse
//!   JSON out of a failed <video> request)

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

/// `{"error": message}` with the given status.
pub fn json_error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

/// Plain-text failure with the given status.
pub fn text_error(status: StatusCode, message: &'static str) -> Response {
    (status, message).into_response()
}
