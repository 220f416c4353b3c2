//! Metrics collection and exposition.
//!
//! # Metrics
//! - `auth_responder_requests_total` (counter): responses by status code
//! - `auth_responder_decisions_total` (counter): engine verdicts by reason
//! - `auth_responder_request_duration_seconds` (histogram): handler latency
//!
//! Recording is a no-op until [`init_metrics`] installs the exporter.

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::authz::Decision;

/// Start the Prometheus exporter on `addr`. Must run inside a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a finished auth request.
pub fn record_request(status: u16, start_time: Instant) {
    metrics::counter!("auth_responder_requests_total", "status" => status.to_string()).increment(1);
    metrics::histogram!("auth_responder_request_duration_seconds")
        .record(start_time.elapsed().as_secs_f64());
}

/// Record an engine verdict.
pub fn record_decision(decision: &Decision) {
    let verdict = if decision.is_allowed() { "allow" } else { "deny" };
    metrics::counter!(
        "auth_responder_decisions_total",
        "verdict" => verdict,
        "reason" => decision.reason()
    )
    .increment(1);
}
