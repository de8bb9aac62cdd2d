//! Endpoint abstraction.
//!
//! # Responsibilities
//! - Represent a single candidate cluster
//! - Carry the metadata the selector ranks on (priority, registry position)
//! - Stay immutable once loaded

use std::fmt;

use serde::Serialize;

use crate::config::EndpointConfig;

/// A single candidate cluster endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Endpoint {
    /// Unique cluster identifier; also the health cache key.
    pub cluster_id: String,
    /// Region hosting the cluster.
    pub region: String,
    /// Hostname used for probing and connecting.
    pub hostname: String,
    /// TCP port.
    pub port: u16,
    /// Tie-break priority (lower = preferred).
    pub priority: Option<u32>,
    /// External health-check identifier, if provisioned.
    pub health_check_id: Option<String>,
    /// Position in configuration order.
    pub position: usize,
}

impl Endpoint {
    /// Build from an already validated config entry.
    pub(crate) fn from_config(config: &EndpointConfig, position: usize) -> Self {
        Self {
            cluster_id: config.cluster_id.clone(),
            region: config.region.clone(),
            hostname: config.hostname.clone(),
            // Validation guarantees 1..=65535.
            port: u16::try_from(config.port).unwrap_or(u16::MAX),
            priority: config.priority,
            health_check_id: config
                .health_check_id
                .as_ref()
                .filter(|id| !id.trim().is_empty())
                .cloned(),
            position,
        }
    }

    /// `host:port` for logging.
    pub fn address(&self) -> String {
        format!("{}:{}", self.hostname, self.port)
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}, {})", self.cluster_id, self.region, self.address())
    }
}
