//! Endpoint health verdicts and cached records.
//!
//! # States
//! - Healthy: endpoint is eligible for ranking
//! - Unhealthy: endpoint excluded from ranking
//! - Unknown: remote provider could not say; excluded like Unhealthy
//!
//! # Freshness
//! ```text
//! fresh: now - checked_at <  ttl   → trusted, no probe
//! stale: now - checked_at >= ttl   → refreshed by the next get_health
//! ```

use std::fmt;
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

/// Health verdict for an endpoint at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthState {
    Healthy,
    Unhealthy,
    Unknown,
}

impl HealthState {
    /// Only a positive verdict makes an endpoint eligible.
    pub fn is_healthy(self) -> bool {
        self == HealthState::Healthy
    }
}

impl fmt::Display for HealthState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            HealthState::Healthy => "healthy",
            HealthState::Unhealthy => "unhealthy",
            HealthState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Where a verdict came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthSource {
    /// Raw TCP probe.
    Direct,
    /// External health-check provider.
    Remote,
}

/// A cached verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HealthRecord {
    pub state: HealthState,
    pub checked_at: Instant,
    pub source: HealthSource,
}

impl HealthRecord {
    pub fn new(state: HealthState, source: HealthSource) -> Self {
        Self {
            state,
            checked_at: Instant::now(),
            source,
        }
    }

    /// A zero ttl is never fresh.
    pub fn is_fresh(&self, ttl: Duration, now: Instant) -> bool {
        now.saturating_duration_since(self.checked_at) < ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_freshness_window() {
        let record = HealthRecord::new(HealthState::Healthy, HealthSource::Direct);
        let ttl = Duration::from_secs(30);

        assert!(record.is_fresh(ttl, Instant::now()));
        tokio::time::advance(Duration::from_secs(29)).await;
        assert!(record.is_fresh(ttl, Instant::now()));
        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!record.is_fresh(ttl, Instant::now()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_ttl_never_fresh() {
        let record = HealthRecord::new(HealthState::Healthy, HealthSource::Remote);
        assert!(!record.is_fresh(Duration::ZERO, Instant::now()));
    }

    #[test]
    fn test_only_healthy_is_eligible() {
        assert!(HealthState::Healthy.is_healthy());
        assert!(!HealthState::Unhealthy.is_healthy());
        assert!(!HealthState::Unknown.is_healthy());
    }
}
