//! Database driver collaborator.
//!
//! The router never speaks the wire protocol; it hands host, credentials and
//! [`ConnectionSettings`] to a [`Driver`] and treats the returned connection
//! as opaque.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub use crate::config::ConnectionSettings;

/// Everything a driver needs to open one connection.
#[derive(Debug, Clone, Copy)]
pub struct ConnectParams<'a> {
    pub host: &'a str,
    pub port: u16,
    pub database: &'a str,
    pub user: &'a str,
    pub token: &'a str,
    pub settings: &'a ConnectionSettings,
}

/// Driver failure for one endpoint.
#[derive(Debug, Clone, Error)]
pub enum ConnectError {
    #[error("connect timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("authentication rejected: {0}")]
    AuthenticationRejected(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("driver error: {0}")]
    Other(String),
}

impl ConnectError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConnectError::Timeout(_) => "connect_timeout",
            ConnectError::AuthenticationRejected(_) => "auth_rejected",
            ConnectError::Network(_) => "network",
            ConnectError::Other(_) => "driver",
        }
    }
}

/// Opens database connections.
#[async_trait]
pub trait Driver: Send + Sync {
    type Connection: Send;

    async fn open(&self, params: ConnectParams<'_>) -> Result<Self::Connection, ConnectError>;
}

impl ConnectionSettings {
    /// Connect deadline as a `Duration`.
    pub fn connect_deadline(&self) -> Duration {
        Duration::from_secs(self.connect_timeout)
    }
}
