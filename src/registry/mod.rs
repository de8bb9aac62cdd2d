//! Endpoint registry.
//!
//! # Responsibilities
//! - Load the fixed set of candidate endpoints from a list or a config document
//! - Reject malformed input up front with `ConfigError`
//! - Expose endpoints in configuration order, the default tie-break sequence
//!
//! # Design Decisions
//! - No add/remove after construction
//! - Endpoints are shared as `Arc<Endpoint>` so probes and rankings never clone metadata

pub mod endpoint;

use std::sync::Arc;

use crate::config::validation::validate_endpoints;
use crate::config::{ConfigError, EndpointConfig, RouterConfig};

pub use endpoint::Endpoint;

/// Where endpoints come from.
#[derive(Debug, Clone)]
pub enum EndpointSource {
    /// Explicit in-memory list.
    List(Vec<EndpointConfig>),
    /// A parsed configuration document.
    Document(RouterConfig),
}

/// Fixed, ordered collection of candidate endpoints.
#[derive(Debug, Clone)]
pub struct EndpointRegistry {
    endpoints: Vec<Arc<Endpoint>>,
}

impl EndpointRegistry {
    /// Validate and load endpoints from either source.
    pub fn load(source: EndpointSource) -> Result<Self, ConfigError> {
        let configs = match source {
            EndpointSource::List(list) => list,
            EndpointSource::Document(config) => config.endpoints,
        };

        validate_endpoints(&configs).map_err(ConfigError::Validation)?;

        let endpoints: Vec<Arc<Endpoint>> = configs
            .iter()
            .enumerate()
            .map(|(position, config)| Arc::new(Endpoint::from_config(config, position)))
            .collect();

        for endpoint in &endpoints {
            tracing::debug!(
                endpoint = %endpoint.cluster_id,
                region = %endpoint.region,
                address = %endpoint.address(),
                priority = ?endpoint.priority,
                "Registered endpoint"
            );
        }
        tracing::info!(count = endpoints.len(), "Endpoint registry loaded");

        Ok(Self { endpoints })
    }

    /// Load from an explicit list.
    pub fn from_endpoints(endpoints: Vec<EndpointConfig>) -> Result<Self, ConfigError> {
        Self::load(EndpointSource::List(endpoints))
    }

    /// Load from a configuration document.
    pub fn from_config(config: &RouterConfig) -> Result<Self, ConfigError> {
        Self::load(EndpointSource::Document(config.clone()))
    }

    /// All endpoints in configuration order.
    pub fn all(&self) -> &[Arc<Endpoint>] {
        &self.endpoints
    }

    /// Look up an endpoint by cluster id.
    pub fn get(&self, cluster_id: &str) -> Option<&Arc<Endpoint>> {
        self.endpoints.iter().find(|e| e.cluster_id == cluster_id)
    }

    pub fn len(&self) -> usize {
        self.endpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.endpoints.is_empty()
    }
}
