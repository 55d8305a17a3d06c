//! Route handlers.
//!
//! # Responsibilities
//! - Catalog proxying: /api/search and /api/info with image rewriting
//! - Cover image proxy with placeholder fallback
//! - Stream orchestration: candidates → probe → relay (or test mode)

use std::time::{Duration, Instant};

use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, HeaderValue, Response as HttpResponse, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;

use crate::catalog::{rewrite, CatalogError};
use crate::http::request::{public_base_url, request_id};
use crate::http::response::{json_error, text_error};
use crate::http::server::AppState;
use crate::media::{self, candidates};
use crate::observability::metrics;

/// Query parameters for /api/search. The original UI sends `name`;
/// `q` is accepted as an alias.
#[derive(Deserialize)]
pub struct SearchQuery {
    name: Option<String>,
    q: Option<String>,
}

#[derive(Deserialize)]
pub struct InfoQuery {
    id: Option<String>,
}

/// Query parameters for /stream/{id}/{ep}.
#[derive(Deserialize)]
pub struct StreamQuery {
    test: Option<String>,
}

/// GET /api/search?name=…
pub async fn search(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<SearchQuery>,
) -> Response {
    let start = Instant::now();
    let q = query.name.or(query.q).unwrap_or_default();

    match state.catalog.search(&q).await {
        Ok(data) => {
            let base = public_base_url(&headers);
            let results = rewrite::rewrite_search_results(&base, data);
            metrics::record_request("search", 200, start);
            Json(results).into_response()
        }
        Err(e) => {
            tracing::error!(query = %q, error = %e, "Search proxy failed");
            metrics::record_request("search", 500, start);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch search")
        }
    }
}

/// GET /api/info?id=…
pub async fn info_by_query(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<InfoQuery>,
) -> Response {
    match query.id {
        Some(id) if !id.trim().is_empty() => proxy_info(state, headers, id).await,
        _ => json_error(StatusCode::BAD_REQUEST, "missing id"),
    }
}

/// GET /api/info/{id}
pub async fn info_by_path(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    proxy_info(state, headers, id).await
}

async fn proxy_info(state: AppState, headers: HeaderMap, id: String) -> Response {
    let start = Instant::now();

    match state.catalog.info(&id).await {
        Ok(mut info) => {
            rewrite::rewrite_info(&public_base_url(&headers), &mut info);
            metrics::record_request("info", 200, start);
            Json(info).into_response()
        }
        Err(CatalogError::InvalidPayload) => {
            tracing::error!(id = %id, "Catalog info payload was not an object");
            metrics::record_request("info", 502, start);
            json_error(StatusCode::BAD_GATEWAY, "Invalid info response")
        }
        Err(e) => {
            tracing::error!(id = %id, error = %e, "Info proxy failed");
            metrics::record_request("info", 500, start);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch info")
        }
    }
}

/// GET /api/image/{id}.jpg
///
/// Streams the upstream cover with browser-like headers; any failure
/// falls back to the local placeholder so the UI never shows a broken
/// image icon.
pub async fn image(State(state): State<AppState>, Path(file): Path<String>) -> Response {
    let id = file.strip_suffix(".jpg").unwrap_or(file.as_str());
    let start = Instant::now();
    let url = format!(
        "{}/api/anime/{}/image.jpg",
        state.config.upstream.catalog_base_url.trim_end_matches('/'),
        urlencoding::encode(id)
    );

    let request = state
        .upstream
        .get(&url)
        .header(header::REFERER, state.config.upstream.referer.clone())
        .header(header::ACCEPT, "image/webp,image/apng,image/*,*/*;q=0.8")
        .timeout(Duration::from_secs(state.config.timeouts.image_secs));

    match request.send().await {
        Ok(upstream) if upstream.status().is_success() => {
            let content_type = upstream
                .headers()
                .get(header::CONTENT_TYPE)
                .cloned()
                .unwrap_or_else(|| HeaderValue::from_static("image/jpeg"));
            metrics::record_request("image", 200, start);
            HttpResponse::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .body(Body::from_stream(upstream.bytes_stream()))
                .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response())
        }
        Ok(upstream) => {
            tracing::warn!(id = %id, status = %upstream.status(), "Image proxy got unsuccessful status");
            placeholder_image(&state, start).await
        }
        Err(e) => {
            tracing::warn!(id = %id, error = %e, "Image proxy fetch failed");
            placeholder_image(&state, start).await
        }
    }
}

/// Serve the placeholder file, or 204 when none is installed.
async fn placeholder_image(state: &AppState, start: Instant) -> Response {
    let path = &state.config.assets.placeholder_image;
    match tokio::fs::read(path).await {
        Ok(bytes) => {
            metrics::record_request("image", 200, start);
            ([(header::CONTENT_TYPE, content_type_for(path))], bytes).into_response()
        }
        Err(_) => {
            metrics::record_request("image", 204, start);
            StatusCode::NO_CONTENT.into_response()
        }
    }
}

fn content_type_for(path: &str) -> &'static str {
    match std::path::Path::new(path).extension().and_then(|e| e.to_str()) {
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        _ => "image/jpeg",
    }
}

/// GET /stream/{media_id}/{episode}
///
/// Probe-then-relay orchestration. Test mode (config flag or `?test=1`)
/// bypasses the candidate list and probing entirely.
pub async fn stream(
    State(state): State<AppState>,
    Path((media_id, episode)): Path<(String, String)>,
    Query(query): Query<StreamQuery>,
    headers: HeaderMap,
) -> Response {
    let start = Instant::now();

    if media_id.trim().is_empty() || episode.trim().is_empty() {
        metrics::record_request("stream", 400, start);
        return text_error(StatusCode::BAD_REQUEST, "missing id or ep");
    }

    let range = headers.get(header::RANGE);
    let test_mode =
        state.config.upstream.force_test_video || matches!(query.test.as_deref(), Some("1"));

    if test_mode {
        tracing::debug!(
            request_id = %request_id(&headers),
            url = %state.config.upstream.test_video_url,
            "Test mode: relaying fixed test video"
        );
        let url = state.config.upstream.test_video_url.clone();
        return finish_relay(&state, &url, range, start).await;
    }

    let candidates = candidates::candidate_urls(&state.config.upstream, &media_id, &episode);
    let timeout = Duration::from_secs(state.config.probe.timeout_secs);

    match media::select_candidate(&state.upstream, &candidates, timeout).await {
        Ok(chosen) => {
            tracing::debug!(
                request_id = %request_id(&headers),
                media_id = %media_id,
                episode = %episode,
                candidate = %chosen,
                "Candidate selected, relaying"
            );
            let chosen = chosen.to_string();
            finish_relay(&state, &chosen, range, start).await
        }
        Err(_) => {
            tracing::error!(
                media_id = %media_id,
                episode = %episode,
                "No candidate video available"
            );
            metrics::record_request("stream", 502, start);
            text_error(StatusCode::BAD_GATEWAY, "Remote video not available")
        }
    }
}

async fn finish_relay(
    state: &AppState,
    url: &str,
    range: Option<&HeaderValue>,
    start: Instant,
) -> Response {
    match media::relay(&state.upstream, url, range).await {
        Ok(response) => {
            metrics::record_request("stream", response.status().as_u16(), start);
            response
        }
        Err(e) => {
            tracing::error!(url = %url, error = %e, "Remote stream error");
            metrics::record_request("stream", 502, start);
            text_error(StatusCode::BAD_GATEWAY, "Bad Gateway")
        }
    }
}

/// GET /favicon.ico, kept quiet to avoid 404 noise in the logs.
pub async fn favicon() -> StatusCode {
    StatusCode::NO_CONTENT
}
