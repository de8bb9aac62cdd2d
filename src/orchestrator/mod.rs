//! Connection orchestration subsystem.
//!
//! # Data Flow
//! ```text
//! get_connection(database, user):
//!     SELECTING      → selector ranks endpoints
//!     ATTEMPTING(i)  → fresh token for endpoint i → driver open
//!         success    → CONNECTED, return immediately
//!         failure    → log, record, ATTEMPTING(i+1)
//!     EXHAUSTED      → AllEndpointsUnavailable with every (endpoint, error)
//! ```
//!
//! # Design Decisions
//! - Attempts are strictly sequential; failover is ordered, not speculative
//! - Tokens are requested per attempt and dropped with it
//! - A failed attempt does not mark the endpoint unhealthy

pub mod attempt;
pub mod manager;
pub mod state;

pub use attempt::{AttemptError, ConnectionAttemptResult, EndpointFailure};
pub use manager::{ConnectionManager, ConnectionManagerBuilder};
pub use state::FailoverState;
