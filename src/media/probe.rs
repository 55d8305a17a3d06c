//! Candidate reachability probing.
//!
//! # Responsibilities
//! - Probe one upstream URL with a timeout-bounded HEAD request
//! - Fall back to a single `Range: bytes=0-0` GET when HEAD never answers
//! - Select the first responding candidate from an ordered list
//!
//! # Design Decisions
//! - A received HEAD response is a final verdict, successful or not;
//!   the ranged-GET fallback fires only on network error or timeout
//! - Probe failures never propagate as errors; callers read `ok`
//! - Response handles are dropped without reading the body, releasing
//!   the upstream connection as soon as a verdict exists

use std::time::Duration;

use axum::http::{HeaderMap, StatusCode};
use reqwest::header::RANGE;
use tokio::time;

use crate::media::MediaError;
use crate::observability::metrics;

/// Outcome of probing a single candidate.
#[derive(Debug, Clone)]
pub struct ProbeOutcome {
    pub ok: bool,
    pub status: Option<StatusCode>,
    pub headers: Option<HeaderMap>,
    pub error: Option<String>,
}

impl ProbeOutcome {
    fn answered(status: StatusCode, headers: HeaderMap, ok: bool) -> Self {
        Self {
            ok,
            status: Some(status),
            headers: Some(headers),
            error: None,
        }
    }

    fn failed(message: String) -> Self {
        Self {
            ok: false,
            status: None,
            headers: None,
            error: Some(message),
        }
    }
}

/// Status window treated as reachable: [200, 400).
fn reachable(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}

/// Probe a candidate URL.
///
/// Sends a HEAD request bounded by `timeout`. If the upstream answers,
/// that answer is the verdict. If the HEAD attempt dies on the wire, one
/// `Range: bytes=0-0` GET is tried with its own `timeout` before the
/// candidate is declared unreachable.
pub async fn probe(client: &reqwest::Client, url: &str, timeout: Duration) -> ProbeOutcome {
    match time::timeout(timeout, client.head(url).send()).await {
        Ok(Ok(response)) => {
            let status = response.status();
            ProbeOutcome::answered(status, response.headers().clone(), reachable(status))
        }
        Ok(Err(e)) => {
            tracing::debug!(url = %url, error = %e, "HEAD probe failed, trying ranged GET");
            probe_get_range(client, url, timeout).await
        }
        Err(_) => {
            tracing::debug!(url = %url, "HEAD probe timed out, trying ranged GET");
            probe_get_range(client, url, timeout).await
        }
    }
}

/// Fallback probe: a one-byte ranged GET for mounts that reject HEAD.
async fn probe_get_range(client: &reqwest::Client, url: &str, timeout: Duration) -> ProbeOutcome {
    let request = client.get(url).header(RANGE, "bytes=0-0");

    match time::timeout(timeout, request.send()).await {
        Ok(Ok(response)) => {
            let status = response.status();
            let ok = status == StatusCode::PARTIAL_CONTENT || reachable(status);
            ProbeOutcome::answered(status, response.headers().clone(), ok)
        }
        Ok(Err(e)) => ProbeOutcome::failed(e.to_string()),
        Err(_) => ProbeOutcome::failed(format!("ranged GET timeout after {:?}", timeout)),
    }
}

/// Probe candidates in priority order and return the first that answers.
///
/// Short-circuits on the first success; candidates past that point are
/// never contacted. Probing is sequential, so no two upstream
/// connections are ever open at once for one request.
pub async fn select_candidate<'a>(
    client: &reqwest::Client,
    candidates: &'a [String],
    timeout: Duration,
) -> Result<&'a str, MediaError> {
    for candidate in candidates {
        let outcome = probe(client, candidate, timeout).await;
        if outcome.ok {
            metrics::record_probe(candidate, "ok");
            tracing::debug!(
                candidate = %candidate,
                status = ?outcome.status,
                "Candidate probe succeeded"
            );
            return Ok(candidate);
        }

        metrics::record_probe(candidate, "failed");
        tracing::warn!(
            candidate = %candidate,
            status = ?outcome.status,
            error = outcome.error.as_deref().unwrap_or("unsuccessful status"),
            "Candidate probe failed"
        );
    }

    Err(MediaError::NoCandidateAvailable)
}
