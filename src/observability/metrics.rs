//! Metrics collection.
//!
//! # Metrics
//! - `dsql_endpoint_health` (gauge): 1=healthy, 0=unhealthy, -1=unknown
//! - `dsql_probe_latency_seconds` (histogram): successful connect probe latency
//! - `dsql_probe_failures_total` (counter): failed probes by kind
//! - `dsql_connection_attempts_total` (counter): attempts by endpoint and outcome
//! - `dsql_failovers_total` (counter): moves to the next candidate
//! - `dsql_endpoints_exhausted_total` (counter): calls that ran out of candidates
//!
//! Recorded through the `metrics` facade; without an installed recorder the
//! calls are no-ops.

use crate::health::HealthState;

pub fn record_endpoint_health(cluster_id: &str, state: HealthState) {
    let value = match state {
        HealthState::Healthy => 1.0,
        HealthState::Unhealthy => 0.0,
        HealthState::Unknown => -1.0,
    };
    metrics::gauge!("dsql_endpoint_health", "endpoint" => cluster_id.to_string()).set(value);
}

pub fn record_probe_latency(cluster_id: &str, seconds: f64) {
    metrics::histogram!("dsql_probe_latency_seconds", "endpoint" => cluster_id.to_string())
        .record(seconds);
}

pub fn record_probe_failure(cluster_id: &str, kind: &'static str) {
    metrics::counter!(
        "dsql_probe_failures_total",
        "endpoint" => cluster_id.to_string(),
        "kind" => kind
    )
    .increment(1);
}

pub fn record_connection_attempt(cluster_id: &str, outcome: &'static str) {
    metrics::counter!(
        "dsql_connection_attempts_total",
        "endpoint" => cluster_id.to_string(),
        "outcome" => outcome
    )
    .increment(1);
}

pub fn record_failover() {
    metrics::counter!("dsql_failovers_total").increment(1);
}

pub fn record_exhausted() {
    metrics::counter!("dsql_endpoints_exhausted_total").increment(1);
}
