//! # STH Process
//!
//! Low-level process operations for the STH harness.
//!
//! This crate provides Unix primitives for:
//! - Process existence checking
//! - Signal delivery (clean and forced termination)
//! - Bounded waits for process exit
//!
//! These back the harness's local shell channel; remote nodes reach the same
//! operations through their own shell.

pub mod check;
pub mod terminate;
pub mod wait;

pub use check::*;
pub use terminate::*;
pub use wait::*;
