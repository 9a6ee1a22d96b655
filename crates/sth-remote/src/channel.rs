//! ShellChannel trait - the remote-execution seam.
//!
//! This trait separates supervisor orchestration from transport. The real
//! harness drives nodes over SSH; tests and the local runner use
//! [`crate::LocalAccount`]. Implementations are expected to be cheap to
//! clone behind an `Arc` and safe to share.

use async_trait::async_trait;
use sth_common::{HarnessResult, NodeId, StopSignal};
use std::path::Path;

/// A shell-command channel to one node.
///
/// All supervisor side effects on a node - directory creation, process
/// launch, pid-file manipulation, signal delivery - go through this trait,
/// one round trip at a time.
#[async_trait]
pub trait ShellChannel: Send + Sync {
    /// The node this channel talks to.
    fn node(&self) -> &NodeId;

    /// Run a shell command; non-zero exit is a hard channel error.
    async fn run(&self, cmd: &str) -> HarnessResult<()>;

    /// Run a shell command and capture stdout; non-zero exit is an error.
    async fn capture(&self, cmd: &str) -> HarnessResult<String>;

    /// Create (or overwrite) a file on the node with the given contents.
    async fn write_file(&self, path: &Path, contents: &str) -> HarnessResult<()>;

    /// Send a stop signal to a pid on the node.
    async fn signal(&self, pid: u32, signal: StopSignal) -> HarnessResult<()>;

    /// Check whether a pid is alive on the node.
    async fn alive(&self, pid: u32) -> HarnessResult<bool>;

    /// Force-kill every process whose command line matches `pattern`.
    ///
    /// Best-effort by contract: "no match" is success, and callers ignore
    /// failures during cleanup.
    async fn kill_matching(&self, pattern: &str) -> HarnessResult<()>;
}
