//! Endpoint selection subsystem.
//!
//! # Data Flow
//! ```text
//! rank():
//!     registry endpoints
//!     → for every endpoint, concurrently:
//!         health prober (cached verdict or fresh probe)
//!         latency prober (fresh sample)
//!     → keep healthy endpoints
//!         (none healthy → AllUnhealthyPolicy: try all / fail fast)
//!     → rank.rs (latency, priority within tie window, unmeasured last)
//!     → ordered endpoints for the orchestrator
//! ```
//!
//! # Design Decisions
//! - Selection latency is bounded by the slowest single probe, not the sum
//! - The selector reads health but never writes it
//! - Callers get endpoints only; raw samples stay inside the cycle

pub mod rank;

use std::sync::Arc;

use futures_util::future::join_all;

use crate::config::{AllUnhealthyPolicy, SelectionConfig};
use crate::health::{HealthProber, HealthState};
use crate::latency::LatencyProber;
use crate::registry::{Endpoint, EndpointRegistry};

pub use rank::{order_candidates, RankedCandidate};

/// Outcome of one selection cycle.
#[derive(Debug, Clone)]
pub enum Selection {
    /// Endpoints in the order they should be tried.
    Ranked(Vec<Arc<Endpoint>>),
    /// No endpoint was healthy and the policy is fail-fast. Carries every
    /// endpoint's verdict.
    NoneHealthy(Vec<(Arc<Endpoint>, HealthState)>),
}

/// Combines health and latency signals into a ranked candidate list.
#[derive(Debug, Clone)]
pub struct EndpointSelector {
    registry: Arc<EndpointRegistry>,
    health: HealthProber,
    latency: LatencyProber,
    epsilon_secs: f64,
    policy: AllUnhealthyPolicy,
}

impl EndpointSelector {
    pub fn new(
        registry: Arc<EndpointRegistry>,
        health: HealthProber,
        latency: LatencyProber,
        config: &SelectionConfig,
    ) -> Self {
        Self {
            registry,
            health,
            latency,
            epsilon_secs: config.tie_epsilon_ms / 1000.0,
            policy: config.all_unhealthy,
        }
    }

    pub fn registry(&self) -> &EndpointRegistry {
        &self.registry
    }

    pub fn health(&self) -> &HealthProber {
        &self.health
    }

    /// Rank every registered endpoint.
    pub async fn rank(&self) -> Selection {
        self.rank_endpoints(self.registry.all()).await
    }

    /// Rank the given endpoints.
    pub async fn rank_endpoints(&self, endpoints: &[Arc<Endpoint>]) -> Selection {
        match self.rank_candidates(endpoints).await {
            Ok(ranked) => Selection::Ranked(ranked.into_iter().map(|c| c.endpoint).collect()),
            Err(verdicts) => Selection::NoneHealthy(verdicts),
        }
    }

    /// Rank and keep the per-endpoint signals, for diagnostics.
    pub async fn rank_candidates(
        &self,
        endpoints: &[Arc<Endpoint>],
    ) -> Result<Vec<RankedCandidate>, Vec<(Arc<Endpoint>, HealthState)>> {
        let candidates = self.gather(endpoints).await;

        let total = candidates.len();
        let healthy: Vec<RankedCandidate> = candidates
            .iter()
            .filter(|c| c.health.is_healthy())
            .cloned()
            .collect();

        let pool = if !healthy.is_empty() {
            tracing::info!(healthy = healthy.len(), total, "Found healthy endpoints");
            healthy
        } else {
            match self.policy {
                AllUnhealthyPolicy::TryAll => {
                    tracing::warn!(total, "No healthy endpoints found, will try all endpoints");
                    candidates
                }
                AllUnhealthyPolicy::FailFast => {
                    tracing::warn!(total, "No healthy endpoints found, failing fast");
                    return Err(candidates
                        .into_iter()
                        .map(|c| (c.endpoint, c.health))
                        .collect());
                }
            }
        };

        let ordered = order_candidates(pool, self.epsilon_secs);

        for (rank, candidate) in ordered.iter().enumerate() {
            tracing::info!(
                rank = rank + 1,
                endpoint = %candidate.endpoint.cluster_id,
                region = %candidate.endpoint.region,
                latency_secs = candidate.latency.latency_secs,
                priority = ?candidate.endpoint.priority,
                health = %candidate.health,
                "Endpoint ranking"
            );
        }

        Ok(ordered)
    }

    /// Health and latency for every endpoint, gathered concurrently.
    /// Output order matches `endpoints`.
    pub async fn gather(&self, endpoints: &[Arc<Endpoint>]) -> Vec<RankedCandidate> {
        join_all(endpoints.iter().map(|endpoint| async move {
            let (health, latency) = tokio::join!(
                self.health.get_health(endpoint),
                self.latency.measure_default(endpoint)
            );
            RankedCandidate {
                endpoint: Arc::clone(endpoint),
                health,
                latency,
            }
        }))
        .await
    }
}
