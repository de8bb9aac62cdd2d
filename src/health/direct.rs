//! Direct health checking.
//!
//! # Responsibilities
//! - Probe an endpoint with a raw TCP connect
//! - Map the outcome to a verdict: connected = healthy, anything else = unhealthy

use std::time::Duration;

use crate::health::state::HealthState;
use crate::net::{ConnectProbe, ProbeError};
use crate::observability::metrics;
use crate::registry::Endpoint;
use crate::resilience::with_timeout;

/// Probe `endpoint` once and return its verdict.
pub async fn check_direct(
    probe: &dyn ConnectProbe,
    endpoint: &Endpoint,
    timeout: Duration,
) -> HealthState {
    let outcome = match with_timeout(timeout, probe.connect(endpoint, timeout)).await {
        Ok(result) => result,
        Err(elapsed) => Err(ProbeError::Timeout(elapsed.after)),
    };

    match outcome {
        Ok(()) => {
            tracing::debug!(endpoint = %endpoint.cluster_id, "Direct health check: healthy");
            HealthState::Healthy
        }
        Err(e) => {
            tracing::warn!(
                endpoint = %endpoint.cluster_id,
                address = %endpoint.address(),
                kind = e.kind(),
                error = %e,
                "Direct health check failed"
            );
            metrics::record_probe_failure(&endpoint.cluster_id, e.kind());
            HealthState::Unhealthy
        }
    }
}
