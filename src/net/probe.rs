//! TCP reachability probe.
//!
//! # Responsibilities
//! - Open (and immediately drop) a TCP connection to an endpoint
//! - Bound every attempt with an explicit timeout
//! - Classify failures (timeout, refused, other I/O)
//!
//! Shared by the direct health strategy and the latency prober, so both see
//! the same notion of "reachable".

use std::fmt;
use std::io;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tokio::net::TcpStream;

use crate::registry::Endpoint;
use crate::resilience::with_timeout;

/// Failure of a health or latency probe. Never surfaced to callers of
/// `get_connection`; it only downgrades an endpoint's standing.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("probe timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("connection refused")]
    Refused,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("health provider error: {0}")]
    Provider(String),
}

impl ProbeError {
    /// Short label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            ProbeError::Timeout(_) => "timeout",
            ProbeError::Refused => "refused",
            ProbeError::Io(_) => "io",
            ProbeError::Provider(_) => "provider",
        }
    }
}

/// Capability to test raw reachability of an endpoint.
#[async_trait]
pub trait ConnectProbe: Send + Sync {
    /// Succeeds if a connection could be opened within `timeout`.
    async fn connect(&self, endpoint: &Endpoint, timeout: Duration) -> Result<(), ProbeError>;
}

impl fmt::Debug for dyn ConnectProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConnectProbe")
    }
}

/// Production probe: resolve the hostname and open a TCP connection.
#[derive(Debug, Default, Clone, Copy)]
pub struct TcpConnectProbe;

impl TcpConnectProbe {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ConnectProbe for TcpConnectProbe {
    async fn connect(&self, endpoint: &Endpoint, timeout: Duration) -> Result<(), ProbeError> {
        let target = (endpoint.hostname.as_str(), endpoint.port);
        match with_timeout(timeout, TcpStream::connect(target)).await {
            Ok(Ok(_stream)) => Ok(()),
            Ok(Err(e)) if e.kind() == io::ErrorKind::ConnectionRefused => Err(ProbeError::Refused),
            Ok(Err(e)) => Err(ProbeError::Io(e)),
            Err(elapsed) => Err(ProbeError::Timeout(elapsed.after)),
        }
    }
}
