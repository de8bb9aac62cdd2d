//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Probe / token request / driver open:
//!     → timeouts.rs (enforce per-operation deadline)
//!     → On latency probe failure: backoff.rs (jittered delay before the next attempt)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every external call has a deadline
//! - Probe retries for one endpoint are sequential, never parallel
//! - Failover across endpoints is ordered, not speculative

pub mod backoff;
pub mod timeouts;

pub use timeouts::{with_timeout, TimedOut};
