//! Timeout enforcement.
//!
//! # Responsibilities
//! - Wrap probe, token and connect calls with a deadline
//! - Report the deadline that was exceeded
//!
//! # Design Decisions
//! - Uses Tokio's timeout facilities
//! - Timeout errors are distinct from other errors; callers map them into
//!   their own error kinds

use std::future::Future;
use std::time::Duration;

use thiserror::Error;

/// An operation exceeded its deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("timed out after {}ms", .after.as_millis())]
pub struct TimedOut {
    pub after: Duration,
}

/// Run `fut` with a deadline.
pub async fn with_timeout<F, T>(after: Duration, fut: F) -> Result<T, TimedOut>
where
    F: Future<Output = T>,
{
    tokio::time::timeout(after, fut)
        .await
        .map_err(|_| TimedOut { after })
}
