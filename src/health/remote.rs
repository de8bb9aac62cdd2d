//! Remote health checking.
//!
//! # Responsibilities
//! - Define the external health-check provider seam (query only)
//! - Define the administrative seam used by setup tooling (create/enable/disable)
//! - Provision checks for endpoints that do not have one yet
//!
//! # Design Decisions
//! - The provider is authoritative once it answers, including `Unknown`
//! - Provider errors are reported, never mapped to `Healthy`

use async_trait::async_trait;

use crate::config::{EndpointConfig, RouterConfig};
use crate::health::state::HealthState;
use crate::net::ProbeError;

/// External health-check provider keyed by health-check id.
#[async_trait]
pub trait RemoteHealthProvider: Send + Sync {
    /// Current verdict for `health_check_id`. `Err` means the provider
    /// itself could not be reached.
    async fn query_health(&self, health_check_id: &str) -> Result<HealthState, ProbeError>;
}

/// Administrative operations on the external health-check service.
#[async_trait]
pub trait HealthCheckAdmin: Send + Sync {
    /// Create a TCP check for `endpoint`, returning its id.
    async fn create(&self, endpoint: &EndpointConfig) -> Result<String, ProbeError>;

    async fn enable(&self, health_check_id: &str) -> Result<(), ProbeError>;

    async fn disable(&self, health_check_id: &str) -> Result<(), ProbeError>;
}

/// Aggregate per-checker status reports into one verdict.
///
/// Healthy if any checker reports a status starting with "success"
/// (case-insensitive), Unknown if there are no reports at all.
pub fn verdict_from_observations<I, S>(statuses: I) -> HealthState
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut seen = false;
    for status in statuses {
        seen = true;
        if status
            .as_ref()
            .trim_start()
            .to_ascii_lowercase()
            .starts_with("success")
        {
            return HealthState::Healthy;
        }
    }
    if seen {
        HealthState::Unhealthy
    } else {
        HealthState::Unknown
    }
}

/// Create health checks for every endpoint lacking a `health_check_id`.
///
/// Returns how many checks were created. Stops at the first admin failure;
/// ids assigned before that point are kept in `config`.
pub async fn provision_health_checks(
    config: &mut RouterConfig,
    admin: &dyn HealthCheckAdmin,
) -> Result<usize, ProbeError> {
    let mut created = 0;
    for endpoint in config.endpoints.iter_mut() {
        let has_id = endpoint
            .health_check_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty());
        if has_id {
            continue;
        }

        let id = admin.create(endpoint).await?;
        tracing::info!(
            endpoint = %endpoint.cluster_id,
            hostname = %endpoint.hostname,
            health_check_id = %id,
            "Created health check"
        );
        endpoint.health_check_id = Some(id);
        created += 1;
    }
    Ok(created)
}

/// Enable or disable every provisioned check in `config`.
pub async fn set_health_checks_enabled(
    config: &RouterConfig,
    admin: &dyn HealthCheckAdmin,
    enabled: bool,
) -> Result<usize, ProbeError> {
    let mut touched = 0;
    for id in config
        .endpoints
        .iter()
        .filter_map(|e| e.health_check_id.as_deref())
        .filter(|id| !id.trim().is_empty())
    {
        if enabled {
            admin.enable(id).await?;
        } else {
            admin.disable(id).await?;
        }
        touched += 1;
    }
    tracing::info!(count = touched, enabled, "Updated health checks");
    Ok(touched)
}
