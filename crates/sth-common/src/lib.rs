//! # STH Common
//!
//! Shared types for the STH (Streams Test Harness) supervisor crates.
//!
//! This crate provides:
//! - The harness-wide error taxonomy and `Result` alias
//! - Node identifiers
//! - Signal selection for clean vs. forced shutdown

pub mod errors;
pub mod types;

pub use errors::{HarnessError, HarnessResult};
pub use types::{NodeId, StopSignal};
