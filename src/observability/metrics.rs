//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, rule
//! - `proxy_request_duration_seconds` (histogram): end-to-end latency
//! - `proxy_upstream_errors_total` (counter): failed upstream calls by rule, kind
//!
//! # Design Decisions
//! - Recording is always on; without an installed recorder the macros are no-ops
//! - The Prometheus exporter runs its own listener, separate from proxy traffic

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Rule label used when no rule matched the request.
pub const NO_RULE: &str = "none";

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a completed request.
pub fn record_request(method: &str, status: u16, rule: &str, start: Instant) {
    let labels = [
        ("method", method.to_string()),
        ("status", status.to_string()),
        ("rule", rule.to_string()),
    ];
    counter!("proxy_requests_total", &labels).increment(1);
    histogram!("proxy_request_duration_seconds", &labels).record(start.elapsed().as_secs_f64());
}

/// Record an upstream call that failed before a response arrived.
pub fn record_upstream_error(rule: &str, timed_out: bool) {
    let kind = if timed_out { "timeout" } else { "connect" };
    counter!(
        "proxy_upstream_errors_total",
        "rule" => rule.to_string(),
        "kind" => kind
    )
    .increment(1);
}
