//! Health checking subsystem.
//!
//! # Data Flow
//! ```text
//! get_health(endpoint):
//!     → cache.rs (fresh record? return it)
//!     → prober.rs (strategy dispatch)
//!         - direct.rs (TCP connect → healthy/unhealthy)
//!         - remote.rs (provider → healthy/unhealthy/unknown,
//!                      provider error → direct probe, uncached)
//!     → cache.rs (replace record, timestamp = now)
//! ```
//!
//! # Design Decisions
//! - Strategy is a closed enum chosen at construction
//! - The cache is an explicit shared structure, injected rather than global
//! - Health is owned by probing alone; connection outcomes never write to it
//! - Health state is per-endpoint, keyed by cluster id

pub mod cache;
pub mod direct;
pub mod prober;
pub mod remote;
pub mod state;

pub use cache::HealthCache;
pub use prober::{HealthProber, HealthStrategy};
pub use remote::{HealthCheckAdmin, RemoteHealthProvider};
pub use state::{HealthRecord, HealthSource, HealthState};
