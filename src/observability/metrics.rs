//! Metrics collection and exposition.
//!
//! # Metrics
//! - `registry_requests_total` (counter): dynamic route hits by method, status
//! - `registry_request_duration_seconds` (histogram): dynamic dispatch latency
//! - `registry_bindings_total` (counter): bindings created
//! - `registry_bound_routes` (gauge): current number of bound routes
//! - `registry_records_skipped_total` (counter): records skipped, by reason

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Start the Prometheus exporter on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record a request served by a dynamic route (or a dynamic miss).
pub fn record_request(method: &str, status: u16, start: Instant) {
    counter!(
        "registry_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("registry_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record a newly created binding.
pub fn record_binding(bound_routes: usize) {
    counter!("registry_bindings_total").increment(1);
    gauge!("registry_bound_routes").set(bound_routes as f64);
}

/// Record a stored record skipped during enumeration.
pub fn record_skipped(reason: &'static str) {
    counter!("registry_records_skipped_total", "reason" => reason).increment(1);
}
