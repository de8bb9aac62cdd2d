//! Connection manager: the library's top-level entry point.

use std::sync::Arc;

use tracing::Instrument;
use uuid::Uuid;

use crate::auth::{token_preview, AuthError, TokenProvider};
use crate::config::validation::validate_config;
use crate::config::{ConfigError, ConnectionSettings, EndpointConfig, RouterConfig};
use crate::driver::{ConnectError, ConnectParams, Driver};
use crate::error::{RouterError, RouterResult};
use crate::health::{HealthCache, HealthProber, HealthState, RemoteHealthProvider};
use crate::latency::LatencyProber;
use crate::net::{ConnectProbe, TcpConnectProbe};
use crate::observability::metrics;
use crate::orchestrator::attempt::{AttemptError, ConnectionAttemptResult, EndpointFailure};
use crate::orchestrator::state::FailoverState;
use crate::registry::{Endpoint, EndpointRegistry};
use crate::resilience::with_timeout;
use crate::selector::{EndpointSelector, Selection};

/// Assembles a [`ConnectionManager`] from configuration and collaborators.
///
/// The driver type is fixed at [`build`](Self::build), so the builder itself
/// is not generic.
pub struct ConnectionManagerBuilder {
    config: RouterConfig,
    probe: Option<Arc<dyn ConnectProbe>>,
    remote: Option<Arc<dyn RemoteHealthProvider>>,
    cache: Option<HealthCache>,
}

impl ConnectionManagerBuilder {
    pub fn new(config: RouterConfig) -> Self {
        Self {
            config,
            probe: None,
            remote: None,
            cache: None,
        }
    }

    /// Start from an explicit endpoint list with default settings.
    pub fn from_endpoints(endpoints: Vec<EndpointConfig>) -> Self {
        Self::new(RouterConfig {
            endpoints,
            ..RouterConfig::default()
        })
    }

    /// Reachability probe for health and latency checks. Defaults to TCP.
    pub fn probe(mut self, probe: Arc<dyn ConnectProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Provider for the remote health strategy.
    pub fn remote_health(mut self, provider: Arc<dyn RemoteHealthProvider>) -> Self {
        self.remote = Some(provider);
        self
    }

    /// Share an existing health cache (e.g., between managers).
    pub fn health_cache(mut self, cache: HealthCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn build<D: Driver>(
        self,
        driver: D,
        tokens: Arc<dyn TokenProvider>,
    ) -> Result<ConnectionManager<D>, ConfigError> {
        validate_config(&self.config).map_err(ConfigError::Validation)?;

        let registry = Arc::new(EndpointRegistry::from_config(&self.config)?);
        let probe = self
            .probe
            .unwrap_or_else(|| Arc::new(TcpConnectProbe::new()) as Arc<dyn ConnectProbe>);
        let health = HealthProber::from_config(
            &self.config.health,
            self.remote,
            Arc::clone(&probe),
            self.cache.unwrap_or_default(),
        )?;
        let latency = LatencyProber::new(probe, &self.config.latency);
        let selector = EndpointSelector::new(registry, health, latency, &self.config.selection);

        tracing::info!(
            endpoints = selector.registry().len(),
            "Initialized connection manager"
        );

        Ok(ConnectionManager {
            selector,
            driver,
            tokens,
            settings: self.config.connection_settings,
        })
    }
}

/// Hands out connections to the best available endpoint, failing over in
/// rank order. Safe to share between tasks: the only mutable state is the
/// health cache.
pub struct ConnectionManager<D> {
    selector: EndpointSelector,
    driver: D,
    tokens: Arc<dyn TokenProvider>,
    settings: ConnectionSettings,
}

impl<D: Driver> ConnectionManager<D> {
    /// Open a connection to the best endpoint that accepts one.
    ///
    /// Ranks endpoints, then tries them one at a time. Returns the first
    /// connection obtained; no later candidate is contacted.
    pub async fn get_connection(&self, database: &str, user: &str) -> RouterResult<D::Connection> {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("get_connection", %request_id, database, user);
        self.failover(database, user).instrument(span).await
    }

    /// Top-ranked endpoint without connecting.
    pub async fn best_endpoint(&self) -> Option<Arc<Endpoint>> {
        match self.selector.rank().await {
            Selection::Ranked(ranked) => ranked.into_iter().next(),
            Selection::NoneHealthy(_) => None,
        }
    }

    /// Current verdicts without probing.
    pub fn health_snapshot(&self) -> Vec<(Arc<Endpoint>, HealthState)> {
        let health = self.selector.health();
        self.selector
            .registry()
            .all()
            .iter()
            .map(|endpoint| (Arc::clone(endpoint), health.assumed(endpoint)))
            .collect()
    }

    pub fn selector(&self) -> &EndpointSelector {
        &self.selector
    }

    pub fn settings(&self) -> &ConnectionSettings {
        &self.settings
    }

    async fn failover(&self, database: &str, user: &str) -> RouterResult<D::Connection> {
        let candidates = match self.selector.rank().await {
            Selection::Ranked(candidates) => candidates,
            Selection::NoneHealthy(verdicts) => {
                metrics::record_exhausted();
                let failures = verdicts
                    .into_iter()
                    .map(|(endpoint, state)| EndpointFailure {
                        endpoint,
                        error: AttemptError::Excluded(state),
                    })
                    .collect();
                return Err(RouterError::AllEndpointsUnavailable { failures });
            }
        };

        let mut failures = Vec::new();
        let mut state = FailoverState::Selecting.begin(candidates.len());

        while let FailoverState::Attempting(index) = state {
            let endpoint = &candidates[index];
            match self.attempt(endpoint, database, user).await {
                ConnectionAttemptResult::Connected(connection) => {
                    let state = state.on_success();
                    tracing::info!(
                        endpoint = %endpoint.cluster_id,
                        region = %endpoint.region,
                        attempts = index + 1,
                        state = ?state,
                        "Successfully connected"
                    );
                    return Ok(connection);
                }
                ConnectionAttemptResult::Failed(failure) => {
                    tracing::warn!(
                        endpoint = %failure.endpoint.cluster_id,
                        region = %failure.endpoint.region,
                        kind = failure.error.kind(),
                        error = %failure.error,
                        "Failed to connect"
                    );
                    failures.push(failure);
                    state = state.on_failure(candidates.len());
                    if !state.is_terminal() {
                        metrics::record_failover();
                    }
                }
            }
        }

        metrics::record_exhausted();
        tracing::error!(attempts = failures.len(), "All endpoints unavailable");
        Err(RouterError::AllEndpointsUnavailable { failures })
    }

    /// One attempt: fresh token, then open. Health is left untouched either way.
    async fn attempt(
        &self,
        endpoint: &Arc<Endpoint>,
        database: &str,
        user: &str,
    ) -> ConnectionAttemptResult<D::Connection> {
        let deadline = self.settings.connect_deadline();
        tracing::info!(
            endpoint = %endpoint.cluster_id,
            region = %endpoint.region,
            address = %endpoint.address(),
            priority = ?endpoint.priority,
            "Attempting connection"
        );

        let token = match with_timeout(deadline, self.tokens.auth_token(endpoint, user)).await {
            Ok(Ok(token)) => token,
            Ok(Err(e)) => return self.failed(endpoint, e.into()),
            Err(elapsed) => return self.failed(endpoint, AuthError::Timeout(elapsed.after).into()),
        };
        tracing::debug!(
            endpoint = %endpoint.cluster_id,
            token = %token_preview(&token),
            "Generated auth token"
        );

        let params = ConnectParams {
            host: &endpoint.hostname,
            port: endpoint.port,
            database,
            user,
            token: &token,
            settings: &self.settings,
        };

        match with_timeout(deadline, self.driver.open(params)).await {
            Ok(Ok(connection)) => {
                metrics::record_connection_attempt(&endpoint.cluster_id, "success");
                ConnectionAttemptResult::Connected(connection)
            }
            Ok(Err(e)) => self.failed(endpoint, e.into()),
            Err(elapsed) => self.failed(endpoint, ConnectError::Timeout(elapsed.after).into()),
        }
    }

    fn failed(
        &self,
        endpoint: &Arc<Endpoint>,
        error: AttemptError,
    ) -> ConnectionAttemptResult<D::Connection> {
        metrics::record_connection_attempt(&endpoint.cluster_id, error.kind());
        ConnectionAttemptResult::Failed(EndpointFailure {
            endpoint: Arc::clone(endpoint),
            error,
        })
    }
}
