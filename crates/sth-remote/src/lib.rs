//! # STH Remote
//!
//! The node abstraction for the STH harness.
//!
//! A node is anything that can execute shell commands: the supervisor only
//! ever talks to nodes through the [`ShellChannel`] trait, so an SSH-backed
//! channel and the in-process [`LocalAccount`] are interchangeable. Log
//! readiness polling lives here too, since it is expressed entirely in
//! channel operations.

pub mod channel;
pub mod local;
pub mod monitor;

pub use channel::ShellChannel;
pub use local::LocalAccount;
pub use monitor::LogMonitor;
