//! Latency probing.
//!
//! # Data Flow
//! ```text
//! measure(endpoint, timeout, retries):
//!     attempt 0 → timed connect ─ ok ─→ sample(latency of this attempt)
//!                     │ fail
//!                     ▼
//!     backoff → attempt 1 → ... → attempt `retries` ─ fail ─→ sample(∞)
//! ```
//!
//! # Design Decisions
//! - Samples live for one selection cycle only; nothing is cached
//! - Retries for one endpoint are sequential; endpoints are probed concurrently
//!   by the selector
//! - An infinite latency is a sentinel, not an error

pub mod prober;

pub use prober::{LatencyProber, LatencySample};
