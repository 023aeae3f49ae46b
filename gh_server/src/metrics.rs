//! Prometheus metrics for monitoring authentication outcomes.
//!
//! Metrics are exposed in Prometheus text format by an optional exporter;
//! counters are labeled with the operation outcome so dashboards can watch
//! lockouts and failure rates directly.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Initialize the Prometheus metrics exporter.
///
/// Sets up a scrape endpoint on the given address; metrics are served at
/// `http://<addr>/metrics`.
pub fn init_metrics(addr: SocketAddr) -> Result<(), String> {
    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| format!("Failed to install Prometheus exporter: {e}"))
}

/// Record a registration attempt.
pub fn registration(outcome: &'static str) {
    metrics::counter!("auth_registrations_total", "outcome" => outcome).increment(1);
}

/// Record a login attempt.
pub fn login_attempt(outcome: &'static str) {
    metrics::counter!("auth_login_attempts_total", "outcome" => outcome).increment(1);
}

/// Record a session-token check.
pub fn token_check(outcome: &'static str) {
    metrics::counter!("auth_token_checks_total", "outcome" => outcome).increment(1);
}
