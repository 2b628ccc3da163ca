//! Metrics collection and exposition.
//!
//! # Metrics
//! - `gateway_directory_refresh_total` (counter): completed bulk refreshes
//! - `gateway_periodic_task_failures_total` (counter): failed task cycles
//! - `gateway_directory_point_fetch_total` (counter): miss-triggered fetches
//! - `gateway_directory_lookup_misses_total` (counter): lookups with no result
//! - `gateway_directory_index_size` (gauge): names currently indexed
//! - `gateway_active_sessions` (gauge): in-flight command sessions

use std::net::SocketAddr;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter and register metric descriptions.
///
/// Exporter failures are logged, not fatal: the service runs without a
/// metrics endpoint rather than refusing to start.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => {
            tracing::info!(address = %addr, "Metrics exporter listening");
            describe_metrics();
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to install metrics exporter");
        }
    }
}

/// Register descriptions for every metric the service emits.
pub fn describe_metrics() {
    describe_counter!(
        "gateway_directory_refresh_total",
        "Completed bulk directory refresh cycles"
    );
    describe_counter!(
        "gateway_periodic_task_failures_total",
        "Periodic task cycles that failed"
    );
    describe_counter!(
        "gateway_directory_point_fetch_total",
        "Single-device fetches triggered by cache misses"
    );
    describe_counter!(
        "gateway_directory_lookup_misses_total",
        "Device lookups that found no record"
    );
    describe_gauge!(
        "gateway_directory_index_size",
        "Number of names currently indexed"
    );
    describe_gauge!("gateway_active_sessions", "In-flight command sessions");
}

/// Record a completed bulk refresh cycle.
pub fn record_refresh() {
    counter!("gateway_directory_refresh_total").increment(1);
}

/// Record a failed periodic task cycle.
pub fn record_task_failure(task: &str) {
    counter!("gateway_periodic_task_failures_total", "task" => task.to_string()).increment(1);
}

/// Record a miss-triggered single-device fetch.
pub fn record_point_fetch() {
    counter!("gateway_directory_point_fetch_total").increment(1);
}

/// Record a lookup that found no device.
pub fn record_lookup_miss() {
    counter!("gateway_directory_lookup_misses_total").increment(1);
}

/// Record the current index size.
pub fn record_index_size(size: usize) {
    gauge!("gateway_directory_index_size").set(size as f64);
}

/// Record the current number of in-flight sessions.
pub fn record_active_sessions(count: usize) {
    gauge!("gateway_active_sessions").set(count as f64);
}
