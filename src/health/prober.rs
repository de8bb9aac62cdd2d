//! Health prober: strategy dispatch plus the TTL cache.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::{ConfigError, HealthConfig, HealthStrategyKind};
use crate::health::cache::HealthCache;
use crate::health::direct::check_direct;
use crate::health::remote::RemoteHealthProvider;
use crate::health::state::{HealthRecord, HealthSource, HealthState};
use crate::net::ConnectProbe;
use crate::observability::metrics;
use crate::registry::Endpoint;
use crate::resilience::with_timeout;

/// How verdicts are produced. Chosen once, at construction.
#[derive(Clone)]
pub enum HealthStrategy {
    /// Raw TCP reachability.
    Direct,
    /// External provider, falling back to a direct probe when it is unreachable.
    Remote(Arc<dyn RemoteHealthProvider>),
}

impl fmt::Debug for HealthStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthStrategy::Direct => f.write_str("Direct"),
            HealthStrategy::Remote(_) => f.write_str("Remote(..)"),
        }
    }
}

/// Produces health verdicts, consulting the shared cache first.
#[derive(Debug, Clone)]
pub struct HealthProber {
    strategy: HealthStrategy,
    probe: Arc<dyn ConnectProbe>,
    cache: HealthCache,
    ttl: Duration,
    probe_timeout: Duration,
}

impl HealthProber {
    pub fn new(
        strategy: HealthStrategy,
        probe: Arc<dyn ConnectProbe>,
        cache: HealthCache,
        config: &HealthConfig,
    ) -> Self {
        Self {
            strategy,
            probe,
            cache,
            ttl: Duration::from_secs(config.ttl_secs),
            probe_timeout: Duration::from_millis(config.probe_timeout_ms),
        }
    }

    /// Select the strategy named in `config`. The remote strategy needs a provider.
    pub fn from_config(
        config: &HealthConfig,
        remote: Option<Arc<dyn RemoteHealthProvider>>,
        probe: Arc<dyn ConnectProbe>,
        cache: HealthCache,
    ) -> Result<Self, ConfigError> {
        let strategy = match (config.strategy, remote) {
            (HealthStrategyKind::Direct, _) => HealthStrategy::Direct,
            (HealthStrategyKind::Remote, Some(provider)) => HealthStrategy::Remote(provider),
            (HealthStrategyKind::Remote, None) => return Err(ConfigError::MissingRemoteProvider),
        };
        tracing::info!(
            strategy = ?strategy,
            ttl_secs = config.ttl_secs,
            "Health prober configured"
        );
        Ok(Self::new(strategy, probe, cache, config))
    }

    /// Current verdict for `endpoint`, probing only when the cached one is stale or absent.
    pub async fn get_health(&self, endpoint: &Endpoint) -> HealthState {
        if let Some(record) = self.cache.fresh(&endpoint.cluster_id, self.ttl, Instant::now()) {
            tracing::trace!(
                endpoint = %endpoint.cluster_id,
                state = %record.state,
                "Using cached health verdict"
            );
            return record.state;
        }

        let (state, source) = self.probe_fresh(endpoint).await;
        if let Some(source) = source {
            self.cache.store(&endpoint.cluster_id, HealthRecord::new(state, source));
        }
        metrics::record_endpoint_health(&endpoint.cluster_id, state);

        tracing::debug!(endpoint = %endpoint.cluster_id, state = %state, "Health refreshed");
        state
    }

    /// Verdict without probing: the fresh cached one, else the strategy's default.
    ///
    /// The direct strategy assumes healthy until proven otherwise; the remote
    /// strategy reports unknown until the provider has answered.
    pub fn assumed(&self, endpoint: &Endpoint) -> HealthState {
        if let Some(record) = self.cache.fresh(&endpoint.cluster_id, self.ttl, Instant::now()) {
            return record.state;
        }
        match (&self.strategy, &endpoint.health_check_id) {
            (HealthStrategy::Remote(_), Some(_)) => HealthState::Unknown,
            _ => HealthState::Healthy,
        }
    }

    /// Drop the cached verdict for one endpoint.
    pub fn invalidate(&self, endpoint: &Endpoint) {
        self.cache.remove(&endpoint.cluster_id);
    }

    /// Drop every cached verdict, forcing a fresh probe of each endpoint.
    pub fn clear(&self) {
        self.cache.clear();
    }

    pub fn cache(&self) -> &HealthCache {
        &self.cache
    }

    pub fn strategy(&self) -> &HealthStrategy {
        &self.strategy
    }

    /// Returns the verdict and, if it may be cached, its source.
    async fn probe_fresh(&self, endpoint: &Endpoint) -> (HealthState, Option<HealthSource>) {
        let provider = match &self.strategy {
            HealthStrategy::Direct => None,
            HealthStrategy::Remote(provider) => Some(provider),
        };

        let (provider, check_id) = match (provider, endpoint.health_check_id.as_deref()) {
            (Some(provider), Some(id)) => (provider, id),
            _ => {
                let state = check_direct(self.probe.as_ref(), endpoint, self.probe_timeout).await;
                return (state, Some(HealthSource::Direct));
            }
        };

        let error = match with_timeout(self.probe_timeout, provider.query_health(check_id)).await {
            Ok(Ok(state)) => {
                tracing::debug!(
                    endpoint = %endpoint.cluster_id,
                    health_check_id = %check_id,
                    state = %state,
                    "Remote health check"
                );
                return (state, Some(HealthSource::Remote));
            }
            Ok(Err(e)) => e.to_string(),
            Err(elapsed) => elapsed.to_string(),
        };

        tracing::warn!(
            endpoint = %endpoint.cluster_id,
            health_check_id = %check_id,
            error = %error,
            "Remote health provider unavailable, probing directly"
        );
        metrics::record_probe_failure(&endpoint.cluster_id, "provider");

        // Not cached: the provider is consulted again next cycle.
        let state = check_direct(self.probe.as_ref(), endpoint, self.probe_timeout).await;
        (state, None)
    }
}
