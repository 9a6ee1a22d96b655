//! Error types for the STH harness.
//!
//! Propagation policy (binding for every supervisor crate):
//! - Time-bounded waits (startup marker, clean-shutdown exit) surface a
//!   timeout error naming the node.
//! - Pid-file reads never fail; a missing or unreadable file reads as
//!   "no processes".
//! - Signal delivery and kill-by-name during cleanup are best-effort and
//!   never propagate.
//! - Everything else surfaces only hard channel errors.

use crate::types::NodeId;
use thiserror::Error;

/// Result type alias for harness operations.
pub type HarnessResult<T> = std::result::Result<T, HarnessError>;

/// Main error type for supervisor operations.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// Startup marker never appeared in the stdout file within the window.
    #[error("never saw message indicating the test process finished startup on node {node}")]
    StartupTimeout { node: NodeId },

    /// A tracked process did not exit within the clean-shutdown window.
    #[error("test process on node {node} took too long to exit")]
    ShutdownTimeout { node: NodeId },

    /// The launch apparently succeeded but the pid file recorded nothing.
    /// The process may exist untracked on the node; this is surfaced to the
    /// caller, not auto-recovered.
    #[error("no process ids recorded on node {node}")]
    NoProcessRecorded { node: NodeId },

    /// The remote-execution channel reported a hard failure.
    #[error("channel error on node {node}: {reason}")]
    Channel { node: NodeId, reason: String },

    /// Local signal delivery or liveness probing failed.
    #[error("signal operation failed for pid {pid}: {reason}")]
    Signal { pid: u32, reason: String },

    /// Invalid supervisor configuration.
    #[error("configuration error: {reason}")]
    Configuration { reason: String },

    /// I/O error (wraps std::io::Error).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HarnessError {
    pub fn startup_timeout(node: impl Into<NodeId>) -> Self {
        Self::StartupTimeout { node: node.into() }
    }

    pub fn shutdown_timeout(node: impl Into<NodeId>) -> Self {
        Self::ShutdownTimeout { node: node.into() }
    }

    pub fn no_process_recorded(node: impl Into<NodeId>) -> Self {
        Self::NoProcessRecorded { node: node.into() }
    }

    pub fn channel(node: impl Into<NodeId>, reason: impl Into<String>) -> Self {
        Self::Channel {
            node: node.into(),
            reason: reason.into(),
        }
    }

    pub fn signal(pid: u32, reason: impl Into<String>) -> Self {
        Self::Signal {
            pid,
            reason: reason.into(),
        }
    }

    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }
}
