//! Range-aware upstream relay.
//!
//! # Responsibilities
//! - Open the upstream GET, forwarding the client's Range header verbatim
//! - Translate upstream status and headers into the client response
//! - Stream the body through without buffering it
//!
//! # Design Decisions
//! - Upstream 200 answered to a ranged request is relabeled 206 so the
//!   player still receives a decodable partial-content response; the
//!   body itself is not sliced
//! - Dropping the response body (client disconnect) drops the upstream
//!   byte stream with it, aborting the upstream transfer
//! - Errors after the status line has been sent can only terminate the
//!   stream; the relay logs them and ends the response

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};
use axum::response::IntoResponse;
use futures_util::TryStreamExt;

use crate::media::MediaError;
use crate::observability::metrics;

/// Relay an upstream video URL to the client.
///
/// Returns `Err` only when the upstream request fails before a response
/// arrives; once headers are in hand, every outcome is an `Ok` response
/// whose body streams (and possibly terminates) on its own.
pub async fn relay(
    client: &reqwest::Client,
    url: &str,
    range: Option<&HeaderValue>,
) -> Result<axum::response::Response, MediaError> {
    let mut request = client.get(url);
    if let Some(range) = range {
        request = request.header(header::RANGE, range.clone());
    }

    let upstream = request.send().await.map_err(|e| {
        metrics::record_relay_error("connect");
        MediaError::Upstream(e)
    })?;

    let upstream_status = upstream.status();
    let status = if upstream_status == StatusCode::OK && range.is_some() {
        StatusCode::PARTIAL_CONTENT
    } else {
        upstream_status
    };

    let headers = upstream.headers();
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("video/mp4"));
    let accept_ranges = headers
        .get(header::ACCEPT_RANGES)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_static("bytes"));
    let content_length = headers.get(header::CONTENT_LENGTH).cloned();
    let content_range = headers.get(header::CONTENT_RANGE).cloned();

    let mut builder = Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, content_type)
        .header(header::ACCEPT_RANGES, accept_ranges);
    if let Some(value) = content_length {
        builder = builder.header(header::CONTENT_LENGTH, value);
    }
    if let Some(value) = content_range {
        builder = builder.header(header::CONTENT_RANGE, value);
    }

    let logged_url = url.to_string();
    let stream = upstream.bytes_stream().inspect_err(move |e| {
        metrics::record_relay_error("stream");
        tracing::warn!(url = %logged_url, error = %e, "Remote stream error mid-relay");
    });

    Ok(builder
        .body(Body::from_stream(stream))
        .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()))
}
