//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (JSON/TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RouterConfig (validated, immutable)
//!     → registry, probers and orchestrator built from it
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the endpoint set is fixed for the
//!   lifetime of a manager
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::AllUnhealthyPolicy;
pub use schema::ConnectionSettings;
pub use schema::EndpointConfig;
pub use schema::HealthConfig;
pub use schema::HealthStrategyKind;
pub use schema::LatencyConfig;
pub use schema::RouterConfig;
pub use schema::SelectionConfig;
