//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! Health prober (direct strategy) ─┐
//!                                  ├─→ probe.rs (timed TCP connect, then close)
//! Latency prober ──────────────────┘
//! ```
//!
//! # Design Decisions
//! - The probe is a trait so tests can script reachability and latency
//! - No connection is kept open; probing never consumes server sessions

pub mod probe;

pub use probe::{ConnectProbe, ProbeError, TcpConnectProbe};
