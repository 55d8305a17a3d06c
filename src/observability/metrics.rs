//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_requests_total` (counter): requests by route, status
//! - `gateway_request_duration_seconds` (histogram): latency by route
//! - `gateway_probe_attempts_total` (counter): probes by candidate, outcome
//! - `gateway_relay_errors_total` (counter): relay failures by stage

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished request on a named route.
pub fn record_request(route: &'static str, status: u16, start: Instant) {
    counter!(
        "gateway_requests_total",
        "route" => route,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("gateway_request_duration_seconds", "route" => route)
        .record(start.elapsed().as_secs_f64());
}

/// Record one candidate probe attempt.
pub fn record_probe(candidate: &str, outcome: &'static str) {
    counter!(
        "gateway_probe_attempts_total",
        "candidate" => candidate.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

/// Record a relay failure ("connect" before headers, "stream" after).
pub fn record_relay_error(stage: &'static str) {
    counter!("gateway_relay_errors_total", "stage" => stage).increment(1);
}
