//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check every endpoint has a cluster id, region and hostname
//! - Validate value ranges (ports 1-65535, epsilon not negative, non-zero
//!   timeouts, bounded latency retries)
//! - Detect duplicate cluster identifiers
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use thiserror::Error;

use crate::config::schema::{EndpointConfig, RouterConfig};

/// Upper bound on `latency.retries`.
pub const MAX_LATENCY_RETRIES: u32 = 10;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no endpoints configured")]
    NoEndpoints,

    #[error("endpoint #{index}: missing required field `{field}`")]
    MissingField { index: usize, field: &'static str },

    #[error("endpoint `{cluster_id}`: port {port} out of range 1-65535")]
    PortOutOfRange { cluster_id: String, port: u32 },

    #[error("duplicate cluster id `{0}`")]
    DuplicateClusterId(String),

    #[error("selection.tie_epsilon_ms must be a finite, non-negative number")]
    InvalidEpsilon,

    #[error("connection_settings.connect_timeout must be at least 1 second")]
    ZeroConnectTimeout,

    #[error("{0} must be at least 1 millisecond")]
    ZeroProbeTimeout(&'static str),

    #[error("latency.retries is {0}, at most {MAX_LATENCY_RETRIES} allowed")]
    TooManyRetries(u32),
}

/// Validate a whole configuration document.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = match validate_endpoints(&config.endpoints) {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    let epsilon = config.selection.tie_epsilon_ms;
    if !epsilon.is_finite() || epsilon < 0.0 {
        errors.push(ValidationError::InvalidEpsilon);
    }

    if config.connection_settings.connect_timeout == 0 {
        errors.push(ValidationError::ZeroConnectTimeout);
    }

    if config.health.probe_timeout_ms == 0 {
        errors.push(ValidationError::ZeroProbeTimeout("health.probe_timeout_ms"));
    }
    if config.latency.timeout_ms == 0 {
        errors.push(ValidationError::ZeroProbeTimeout("latency.timeout_ms"));
    }
    if config.latency.retries > MAX_LATENCY_RETRIES {
        errors.push(ValidationError::TooManyRetries(config.latency.retries));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validate an endpoint list on its own (in-memory registry source).
pub fn validate_endpoints(endpoints: &[EndpointConfig]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if endpoints.is_empty() {
        errors.push(ValidationError::NoEndpoints);
    }

    let mut seen = HashSet::new();
    for (index, endpoint) in endpoints.iter().enumerate() {
        let required = [
            ("cluster_id", &endpoint.cluster_id),
            ("region", &endpoint.region),
            ("hostname", &endpoint.hostname),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                errors.push(ValidationError::MissingField { index, field });
            }
        }

        if endpoint.port == 0 || endpoint.port > u32::from(u16::MAX) {
            errors.push(ValidationError::PortOutOfRange {
                cluster_id: endpoint.cluster_id.clone(),
                port: endpoint.port,
            });
        }

        if !endpoint.cluster_id.is_empty() && !seen.insert(endpoint.cluster_id.as_str()) {
            errors.push(ValidationError::DuplicateClusterId(endpoint.cluster_id.clone()));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
