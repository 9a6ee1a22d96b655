//! Core identifier types used throughout the harness.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Node identifier - names a remote execution target (host plus account).
///
/// Node membership is owned by the cluster collaborator; the supervisor only
/// carries the identifier for addressing and error messages.
///
/// # Example
/// ```
/// use sth_common::NodeId;
///
/// let node = NodeId::from("worker-1");
/// assert_eq!(node.as_str(), "worker-1");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(String);

impl NodeId {
    /// Creates a new NodeId from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the node ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Signal sent when stopping a tracked process.
///
/// Clean shutdown uses a terminable signal with a bounded wait for exit;
/// forced shutdown uses an immediately-fatal signal with no wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StopSignal {
    /// SIGTERM - the process may run shutdown hooks.
    Term,
    /// SIGKILL - the process is gone immediately.
    Kill,
}

impl StopSignal {
    /// Signal to use for the given shutdown mode.
    pub fn for_shutdown(clean: bool) -> Self {
        if clean {
            Self::Term
        } else {
            Self::Kill
        }
    }

    /// POSIX signal number.
    pub fn number(&self) -> i32 {
        match self {
            Self::Term => 15,
            Self::Kill => 9,
        }
    }
}

impl fmt::Display for StopSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Term => write!(f, "SIGTERM"),
            Self::Kill => write!(f, "SIGKILL"),
        }
    }
}
