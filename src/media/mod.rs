//! Media relay subsystem.
//!
//! # Data Flow
//! ```text
//! GET /stream/{id}/{ep}
//!     → candidates.rs (build ordered upstream URLs)
//!     → probe.rs (HEAD, ranged-GET fallback; first success wins)
//!     → relay.rs (forward Range, translate status/headers, stream body)
//! ```
//!
//! # Design Decisions
//! - Candidates are probed sequentially, not in parallel; at most one
//!   upstream connection is open per inbound request at any instant
//! - Probe failures are data, not errors; only full exhaustion of the
//!   candidate list surfaces to the client
//! - The relay phase has no overall timeout; cancellation is driven by
//!   the client closing its connection

pub mod candidates;
pub mod probe;
pub mod relay;

use thiserror::Error;

pub use probe::{probe, select_candidate, ProbeOutcome};
pub use relay::relay;

/// Errors surfaced by the media relay pipeline.
#[derive(Debug, Error)]
pub enum MediaError {
    /// Every candidate mount was probed and none responded.
    #[error("no candidate video available")]
    NoCandidateAvailable,

    /// The chosen upstream failed after selection, before any response
    /// bytes reached the client.
    #[error("upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),
}
