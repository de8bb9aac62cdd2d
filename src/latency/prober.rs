//! Timed connect probes with bounded retries.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::LatencyConfig;
use crate::net::{ConnectProbe, ProbeError};
use crate::observability::metrics;
use crate::registry::Endpoint;
use crate::resilience::backoff::calculate_backoff;
use crate::resilience::with_timeout;

/// Connect latency measured for one endpoint in one selection cycle.
#[derive(Debug, Clone)]
pub struct LatencySample {
    pub endpoint: Arc<Endpoint>,
    /// Seconds; `f64::INFINITY` when every attempt failed.
    pub latency_secs: f64,
    pub success: bool,
    /// Attempts beyond the first that were used.
    pub retries_used: u32,
}

impl LatencySample {
    fn measured(endpoint: Arc<Endpoint>, latency_secs: f64, retries_used: u32) -> Self {
        Self {
            endpoint,
            latency_secs,
            success: true,
            retries_used,
        }
    }

    fn failed(endpoint: Arc<Endpoint>, retries_used: u32) -> Self {
        Self {
            endpoint,
            latency_secs: f64::INFINITY,
            success: false,
            retries_used,
        }
    }

    pub fn is_measured(&self) -> bool {
        self.success && self.latency_secs.is_finite()
    }

    pub fn latency_ms(&self) -> f64 {
        self.latency_secs * 1000.0
    }
}

/// Measures connect latency.
#[derive(Debug, Clone)]
pub struct LatencyProber {
    probe: Arc<dyn ConnectProbe>,
    timeout: Duration,
    retries: u32,
    backoff_base_ms: u64,
    backoff_max_ms: u64,
}

impl LatencyProber {
    pub fn new(probe: Arc<dyn ConnectProbe>, config: &LatencyConfig) -> Self {
        Self {
            probe,
            timeout: Duration::from_millis(config.timeout_ms),
            retries: config.retries,
            backoff_base_ms: config.backoff_base_ms,
            backoff_max_ms: config.backoff_max_ms,
        }
    }

    /// Measure with the configured timeout and retry count.
    pub async fn measure_default(&self, endpoint: &Arc<Endpoint>) -> LatencySample {
        self.measure(endpoint, self.timeout, self.retries).await
    }

    /// Up to `retries + 1` sequential attempts, each bounded by `timeout`.
    /// Records the latency of the first attempt that succeeds.
    pub async fn measure(
        &self,
        endpoint: &Arc<Endpoint>,
        timeout: Duration,
        retries: u32,
    ) -> LatencySample {
        for attempt in 0..=retries {
            let delay = calculate_backoff(attempt, self.backoff_base_ms, self.backoff_max_ms);
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }

            let start = Instant::now();
            let outcome = match with_timeout(timeout, self.probe.connect(endpoint, timeout)).await {
                Ok(result) => result,
                Err(elapsed) => Err(ProbeError::Timeout(elapsed.after)),
            };

            match outcome {
                Ok(()) => {
                    let latency = start.elapsed().as_secs_f64();
                    tracing::debug!(
                        endpoint = %endpoint.cluster_id,
                        attempt = u64::from(attempt) + 1,
                        latency_secs = latency,
                        "Latency measured"
                    );
                    metrics::record_probe_latency(&endpoint.cluster_id, latency);
                    return LatencySample::measured(Arc::clone(endpoint), latency, attempt);
                }
                Err(e) => {
                    tracing::debug!(
                        endpoint = %endpoint.cluster_id,
                        attempt = u64::from(attempt) + 1,
                        kind = e.kind(),
                        error = %e,
                        "Latency probe failed"
                    );
                    metrics::record_probe_failure(&endpoint.cluster_id, e.kind());
                }
            }
        }

        tracing::warn!(
            endpoint = %endpoint.cluster_id,
            attempts = u64::from(retries) + 1,
            "All latency probes failed"
        );
        LatencySample::failed(Arc::clone(endpoint), retries)
    }
}
