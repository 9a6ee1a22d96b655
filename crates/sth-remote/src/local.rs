//! Local-host channel implementation.
//!
//! Executes every command through `sh -c` on the machine running the
//! harness. Signals and liveness probes skip the shell and use the
//! `sth-process` primitives directly.

use crate::channel::ShellChannel;
use async_trait::async_trait;
use sth_common::{HarnessError, HarnessResult, NodeId, StopSignal};
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

/// A [`ShellChannel`] over the local host.
///
/// Used by integration tests and the local runner; production harnesses
/// substitute an SSH-backed channel.
pub struct LocalAccount {
    node: NodeId,
}

impl LocalAccount {
    pub fn new(node: impl Into<NodeId>) -> Self {
        Self { node: node.into() }
    }
}

#[async_trait]
impl ShellChannel for LocalAccount {
    fn node(&self) -> &NodeId {
        &self.node
    }

    async fn run(&self, cmd: &str) -> HarnessResult<()> {
        debug!(node = %self.node, cmd, "run");
        let status = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .status()
            .await
            .map_err(|e| HarnessError::channel(self.node.clone(), e.to_string()))?;

        if !status.success() {
            return Err(HarnessError::channel(
                self.node.clone(),
                format!("command `{}` exited with {}", cmd, status),
            ));
        }
        Ok(())
    }

    async fn capture(&self, cmd: &str) -> HarnessResult<String> {
        debug!(node = %self.node, cmd, "capture");
        let output = Command::new("sh")
            .arg("-c")
            .arg(cmd)
            .output()
            .await
            .map_err(|e| HarnessError::channel(self.node.clone(), e.to_string()))?;

        if !output.status.success() {
            return Err(HarnessError::channel(
                self.node.clone(),
                format!("command `{}` exited with {}", cmd, output.status),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn write_file(&self, path: &Path, contents: &str) -> HarnessResult<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| HarnessError::channel(self.node.clone(), e.to_string()))?;
        }
        tokio::fs::write(path, contents)
            .await
            .map_err(|e| HarnessError::channel(self.node.clone(), e.to_string()))
    }

    async fn signal(&self, pid: u32, signal: StopSignal) -> HarnessResult<()> {
        sth_process::deliver(pid, signal)
    }

    async fn alive(&self, pid: u32) -> HarnessResult<bool> {
        sth_process::process_exists(pid)
    }

    async fn kill_matching(&self, pattern: &str) -> HarnessResult<()> {
        // Invoke pkill directly: going through `sh -c` would put the pattern
        // on a shell command line that pkill -f itself matches.
        let status = Command::new("pkill")
            .args(["-9", "-f", "--", pattern])
            .status()
            .await
            .map_err(|e| HarnessError::channel(self.node.clone(), e.to_string()))?;

        // Exit code 1 means "no processes matched", which is fine here.
        match status.code() {
            Some(0) | Some(1) => Ok(()),
            _ => Err(HarnessError::channel(
                self.node.clone(),
                format!("pkill -f `{}` exited with {}", pattern, status),
            )),
        }
    }
}
