//! Candidate ordering.
//!
//! ```text
//! measured (finite latency):
//!     sort by latency, then registry position
//!     → split into tie windows: a window starts at its fastest member and
//!       takes every following endpoint less than epsilon slower
//!     → within a window: priority (unset last), latency, position
//! unmeasured (infinite latency):
//!     appended in registry order
//! ```
//!
//! Windows are anchored rather than chained so the result is a plain function
//! of the inputs: the same samples always give the same order.

use std::cmp::Ordering;
use std::sync::Arc;

use crate::health::HealthState;
use crate::latency::LatencySample;
use crate::registry::Endpoint;

/// One endpoint with the signals gathered for it during a selection cycle.
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub endpoint: Arc<Endpoint>,
    pub health: HealthState,
    pub latency: LatencySample,
}

fn by_priority(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    let priority = match (a.endpoint.priority, b.endpoint.priority) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    priority
        .then(a.latency.latency_secs.total_cmp(&b.latency.latency_secs))
        .then(a.endpoint.position.cmp(&b.endpoint.position))
}

fn by_latency(a: &RankedCandidate, b: &RankedCandidate) -> Ordering {
    a.latency
        .latency_secs
        .total_cmp(&b.latency.latency_secs)
        .then(a.endpoint.position.cmp(&b.endpoint.position))
}

/// Order candidates for connection attempts.
///
/// `epsilon_secs` is the tie window; 0 disables the priority tie-break.
pub fn order_candidates(
    candidates: Vec<RankedCandidate>,
    epsilon_secs: f64,
) -> Vec<RankedCandidate> {
    let (mut measured, mut unmeasured): (Vec<_>, Vec<_>) = candidates
        .into_iter()
        .partition(|c| c.latency.is_measured());

    measured.sort_by(by_latency);

    let mut start = 0;
    while start < measured.len() {
        let anchor = measured[start].latency.latency_secs;
        let end = measured[start + 1..]
            .iter()
            .position(|c| c.latency.latency_secs - anchor >= epsilon_secs)
            .map_or(measured.len(), |offset| start + 1 + offset);
        measured[start..end].sort_by(by_priority);
        start = end;
    }

    unmeasured.sort_by_key(|c| c.endpoint.position);
    measured.extend(unmeasured);
    measured
}
