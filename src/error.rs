//! Errors surfaced to callers of the router.
//!
//! Probe, auth and connect errors are absorbed inside a `get_connection`
//! call; only configuration problems and total exhaustion escape.

use thiserror::Error;

use crate::config::ConfigError;
use crate::orchestrator::attempt::EndpointFailure;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Every candidate failed. Failures are in attempt order.
    #[error("failed to connect to any endpoint ({} candidates): {}", .failures.len(), describe(.failures))]
    AllEndpointsUnavailable { failures: Vec<EndpointFailure> },
}

fn describe(failures: &[EndpointFailure]) -> String {
    if failures.is_empty() {
        return "no candidates".to_string();
    }
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

pub type RouterResult<T> = Result<T, RouterError>;
