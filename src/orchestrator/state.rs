//! Failover state machine.
//!
//! # States
//! - Selecting: ranking not yet available
//! - Attempting(i): trying the i-th ranked candidate
//! - Connected(i): candidate i produced a connection (terminal)
//! - Exhausted: every candidate failed, or there were none (terminal)
//!
//! # State Transitions
//! ```text
//! Selecting    → Attempting(0)   candidates > 0
//! Selecting    → Exhausted       candidates == 0
//! Attempting(i) → Connected(i)   attempt succeeded
//! Attempting(i) → Attempting(i+1) attempt failed, i+1 < candidates
//! Attempting(i) → Exhausted      attempt failed, i was the last candidate
//! ```
//! Terminal states absorb every event.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailoverState {
    Selecting,
    Attempting(usize),
    Connected(usize),
    Exhausted,
}

impl FailoverState {
    /// Ranking finished with `candidates` endpoints.
    pub fn begin(self, candidates: usize) -> Self {
        match self {
            FailoverState::Selecting if candidates > 0 => FailoverState::Attempting(0),
            FailoverState::Selecting => FailoverState::Exhausted,
            other => other,
        }
    }

    pub fn on_success(self) -> Self {
        match self {
            FailoverState::Attempting(i) => FailoverState::Connected(i),
            other => other,
        }
    }

    pub fn on_failure(self, candidates: usize) -> Self {
        match self {
            FailoverState::Attempting(i) if i + 1 < candidates => FailoverState::Attempting(i + 1),
            FailoverState::Attempting(_) => FailoverState::Exhausted,
            other => other,
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, FailoverState::Connected(_) | FailoverState::Exhausted)
    }
}
