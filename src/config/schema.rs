//! Configuration schema definitions.
//!
//! This module defines the complete configuration document for the router.
//! All types derive Serde traits for deserialization from config files.
//! Unknown fields are ignored so documents written for other tooling still load.

use serde::{Deserialize, Deserializer, Serialize};

/// Root configuration for the connection router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Candidate endpoints, in preference-neutral configuration order.
    pub endpoints: Vec<EndpointConfig>,

    /// Settings handed to the driver on every connection attempt.
    pub connection_settings: ConnectionSettings,

    /// Health checking settings.
    pub health: HealthConfig,

    /// Latency probe settings.
    pub latency: LatencyConfig,

    /// Ranking settings.
    pub selection: SelectionConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A single candidate endpoint as written in the configuration document.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct EndpointConfig {
    /// Unique cluster identifier.
    #[serde(default)]
    pub cluster_id: String,

    /// Region hosting the cluster (e.g., "us-east-1").
    #[serde(default)]
    pub region: String,

    /// Cluster hostname.
    #[serde(default)]
    pub hostname: String,

    /// Port. Kept wide so out-of-range values reach validation instead of
    /// failing inside serde.
    #[serde(default = "default_port")]
    pub port: u32,

    /// Tie-break priority (lower = preferred). Absent means no preference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,

    /// External health-check identifier for the remote strategy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check_id: Option<String>,
}

fn default_port() -> u32 {
    5432
}

impl EndpointConfig {
    /// Build an endpoint entry with the default port and no priority.
    pub fn new(cluster_id: &str, region: &str, hostname: &str) -> Self {
        Self {
            cluster_id: cluster_id.to_string(),
            region: region.to_string(),
            hostname: hostname.to_string(),
            port: default_port(),
            priority: None,
            health_check_id: None,
        }
    }
}

/// Driver settings applied to each connection attempt.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Connection establishment timeout in seconds.
    pub connect_timeout: u64,

    /// Application name reported to the server.
    pub application_name: String,

    /// Enable TCP keepalives. Accepts `true`/`false` or `1`/`0`.
    #[serde(deserialize_with = "bool_or_int")]
    pub keepalives: bool,

    /// Seconds of idleness before the first keepalive probe.
    pub keepalives_idle: u64,

    /// Seconds between keepalive probes.
    pub keepalives_interval: u64,

    /// Unanswered keepalives before the connection is considered dead.
    pub keepalives_count: u32,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            connect_timeout: 5,
            application_name: "dsql-hybrid-router".to_string(),
            keepalives: true,
            keepalives_idle: 30,
            keepalives_interval: 10,
            keepalives_count: 3,
        }
    }
}

fn bool_or_int<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Int(i64),
    }

    match Flag::deserialize(deserializer)? {
        Flag::Bool(b) => Ok(b),
        Flag::Int(i) => Ok(i != 0),
    }
}

/// Which health strategy the prober uses.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum HealthStrategyKind {
    /// Raw TCP reachability.
    #[default]
    Direct,
    /// External health-check provider, keyed by `health_check_id`.
    Remote,
}

/// Health check configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HealthConfig {
    /// Strategy selected at construction.
    pub strategy: HealthStrategyKind,

    /// Seconds a cached verdict stays fresh. 0 disables caching.
    pub ttl_secs: u64,

    /// Direct probe timeout in milliseconds.
    pub probe_timeout_ms: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            strategy: HealthStrategyKind::Direct,
            ttl_secs: 60,
            probe_timeout_ms: 2000,
        }
    }
}

/// Latency probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LatencyConfig {
    /// Per-attempt timeout in milliseconds.
    pub timeout_ms: u64,

    /// Extra attempts after the first failure.
    pub retries: u32,

    /// Base delay for exponential backoff between attempts. 0 disables.
    pub backoff_base_ms: u64,

    /// Maximum backoff delay in milliseconds.
    pub backoff_max_ms: u64,
}

impl Default for LatencyConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 2000,
            retries: 2,
            backoff_base_ms: 25,
            backoff_max_ms: 250,
        }
    }
}

/// What the selector does when no endpoint is healthy.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum AllUnhealthyPolicy {
    /// Rank every endpoint by latency and try them all.
    #[default]
    TryAll,
    /// Give up without attempting any connection.
    FailFast,
}

/// Ranking configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SelectionConfig {
    /// Latencies closer than this (milliseconds) are ties broken by priority.
    pub tie_epsilon_ms: f64,

    /// Behaviour when every endpoint is unhealthy or unknown.
    pub all_unhealthy: AllUnhealthyPolicy,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            tie_epsilon_ms: 5.0,
            all_unhealthy: AllUnhealthyPolicy::TryAll,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_sections() {
        let config: RouterConfig = serde_json::from_str(
            r#"{"endpoints": [{"cluster_id": "a", "region": "us-east-1", "hostname": "a.example"}]}"#,
        )
        .unwrap();

        assert_eq!(config.endpoints[0].port, 5432);
        assert_eq!(config.endpoints[0].priority, None);
        assert_eq!(config.connection_settings.application_name, "dsql-hybrid-router");
        assert_eq!(config.health.ttl_secs, 60);
        assert_eq!(config.health.strategy, HealthStrategyKind::Direct);
        assert_eq!(config.selection.all_unhealthy, AllUnhealthyPolicy::TryAll);
    }

    #[test]
    fn test_keepalives_accepts_integers() {
        let settings: ConnectionSettings =
            serde_json::from_str(r#"{"keepalives": 0, "keepalives_idle": 45}"#).unwrap();
        assert!(!settings.keepalives);
        assert_eq!(settings.keepalives_idle, 45);
        assert_eq!(settings.connect_timeout, 5);
    }

    #[test]
    fn test_unknown_fields_ignored() {
        let config: RouterConfig = serde_json::from_str(
            r#"{"endpoints": [], "dashboard": {"enabled": true}, "selection": {"all_unhealthy": "fail_fast", "extra": 1}}"#,
        )
        .unwrap();
        assert_eq!(config.selection.all_unhealthy, AllUnhealthyPolicy::FailFast);
    }
}
