//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Probers, selector, orchestrator produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Whatever metrics recorder the embedding application installs
//! ```
//!
//! # Design Decisions
//! - Every connection attempt is logged with endpoint identity and error kind
//! - Each `get_connection` call runs in a span with a request id
//! - Metrics are cheap (atomic increments)

pub mod logging;
pub mod metrics;
