//! Per-endpoint attempt outcomes.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::auth::AuthError;
use crate::driver::ConnectError;
use crate::health::HealthState;
use crate::registry::Endpoint;

/// Why one endpoint did not yield a connection.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Connect(#[from] ConnectError),

    /// Never attempted: excluded by health under the fail-fast policy.
    #[error("not attempted, endpoint is {0}")]
    Excluded(HealthState),
}

impl AttemptError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            AttemptError::Auth(e) => e.kind(),
            AttemptError::Connect(e) => e.kind(),
            AttemptError::Excluded(_) => "excluded",
        }
    }
}

/// An endpoint paired with the error it produced.
#[derive(Debug, Clone)]
pub struct EndpointFailure {
    pub endpoint: Arc<Endpoint>,
    pub error: AttemptError,
}

impl fmt::Display for EndpointFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}): {}",
            self.endpoint.cluster_id, self.endpoint.region, self.error
        )
    }
}

/// Outcome of trying to open a connection to one endpoint.
#[derive(Debug)]
pub enum ConnectionAttemptResult<C> {
    Connected(C),
    Failed(EndpointFailure),
}
