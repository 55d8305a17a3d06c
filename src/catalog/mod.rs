//! Catalog API subsystem.
//!
//! # Data Flow
//! ```text
//! GET /api/search, /api/info
//!     → client.rs (upstream fetch, payload normalization)
//!     → rewrite.rs (image links remapped to the local image proxy)
//!     → JSON response to the browser
//! ```
//!
//! # Design Decisions
//! - Payloads are handled as `serde_json::Value`: the upstream schema is
//!   not ours, and unknown fields must pass through verbatim
//! - The upstream sometimes returns JSON wrapped in a string; the client
//!   unwraps that before the object check

pub mod client;
pub mod rewrite;

pub use client::{CatalogClient, CatalogError};
