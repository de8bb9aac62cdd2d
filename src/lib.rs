//! Latency-aware connection routing with failover for regional Aurora DSQL clusters.

pub mod auth;
pub mod config;
pub mod driver;
pub mod error;
pub mod health;
pub mod latency;
pub mod net;
pub mod observability;
pub mod orchestrator;
pub mod registry;
pub mod resilience;
pub mod selector;

pub use auth::{AuthError, TokenProvider};
pub use config::{ConfigError, RouterConfig};
pub use driver::{ConnectError, ConnectParams, Driver};
pub use error::{RouterError, RouterResult};
pub use orchestrator::{ConnectionManager, ConnectionManagerBuilder};
pub use registry::{Endpoint, EndpointRegistry};
