//! The remote process supervisor.
//!
//! One supervisor instance owns one process spec and one fixed node group,
//! set at construction and never mutated. Control flow is sequential: one
//! remote round trip at a time, bounded polling for every wait, no
//! cross-node ordering or atomicity for group operations.

use crate::command::{render_log_config, start_cmd};
use crate::config::{ProcessSpec, SupervisorConfig};
use async_trait::async_trait;
use sth_common::{HarnessError, HarnessResult, StopSignal};
use sth_remote::{LogMonitor, ShellChannel};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Supplies the cluster connection string for launched processes.
///
/// In the real harness this is the cluster-under-test service; tests use
/// [`StaticBootstrap`].
#[async_trait]
pub trait BootstrapProvider: Send + Sync {
    async fn bootstrap_servers(&self) -> HarnessResult<String>;
}

/// A fixed bootstrap address.
pub struct StaticBootstrap(pub String);

#[async_trait]
impl BootstrapProvider for StaticBootstrap {
    async fn bootstrap_servers(&self) -> HarnessResult<String> {
        Ok(self.0.clone())
    }
}

/// Drives one external process per node through start -> run -> stop.
pub struct StreamsSupervisor {
    config: SupervisorConfig,
    spec: ProcessSpec,
    bootstrap: Arc<dyn BootstrapProvider>,
    nodes: Vec<Arc<dyn ShellChannel>>,
}

impl StreamsSupervisor {
    pub fn new(
        config: SupervisorConfig,
        spec: ProcessSpec,
        bootstrap: Arc<dyn BootstrapProvider>,
        nodes: Vec<Arc<dyn ShellChannel>>,
    ) -> Self {
        Self {
            config,
            spec,
            bootstrap,
            nodes,
        }
    }

    pub fn config(&self) -> &SupervisorConfig {
        &self.config
    }

    pub fn spec(&self) -> &ProcessSpec {
        &self.spec
    }

    pub fn nodes(&self) -> &[Arc<dyn ShellChannel>] {
        &self.nodes
    }

    /// Pids currently recorded in the node's pid file, in file order.
    ///
    /// Documented contract: a missing, empty, or unparseable pid file reads
    /// as an empty list, never an error. Everything that polls liveness
    /// goes through here, so a node whose tracking file is gone is simply
    /// "no processes".
    pub async fn pids(&self, node: &dyn ShellChannel) -> Vec<u32> {
        let out = match node
            .capture(&format!("cat {}", self.config.paths.pid_file.display()))
            .await
        {
            Ok(out) => out,
            Err(_) => return Vec::new(),
        };

        let mut pids = Vec::new();
        for line in out.lines().map(str::trim).filter(|l| !l.is_empty()) {
            match line.parse::<u32>() {
                Ok(pid) => pids.push(pid),
                Err(_) => return Vec::new(),
            }
        }
        pids
    }

    /// Start the process on one node and wait for readiness.
    ///
    /// Creates the persistent root, materializes the log configuration,
    /// issues the composite start command, then blocks until the startup
    /// marker appears in the stdout file or the startup window elapses.
    /// After readiness, at least one pid must have been recorded.
    pub async fn start_node(&self, node: &dyn ShellChannel) -> HarnessResult<()> {
        let paths = &self.config.paths;
        node.run(&format!("mkdir -p {}", paths.root.display()))
            .await?;
        node.write_file(
            &paths.log_config_file,
            &render_log_config(paths, &self.config.log_level),
        )
        .await?;

        info!(node = %node.node(), class = %self.spec.class_name, "starting streams test process");
        let monitor = LogMonitor::begin(node, &paths.stdout_file).await?;

        let bootstrap = self.bootstrap.bootstrap_servers().await?;
        node.run(&start_cmd(&self.config, &self.spec, &bootstrap))
            .await?;

        let started = monitor
            .wait_until(
                &self.config.startup_marker,
                self.config.startup_timeout,
                self.config.poll_interval,
            )
            .await?;
        if !started {
            return Err(HarnessError::startup_timeout(node.node().clone()));
        }

        // The marker proves the process ran; an empty pid file at this
        // point means it exists but is untracked, which must surface.
        if self.pids(node).await.is_empty() {
            return Err(HarnessError::no_process_recorded(node.node().clone()));
        }
        Ok(())
    }

    /// Stop the process on one node.
    ///
    /// Clean shutdown sends SIGTERM and waits for each recorded pid to
    /// exit; forced shutdown sends SIGKILL and does not wait. Signal
    /// delivery failures are ignored - the process may already be gone.
    /// The pid file is removed afterward in every case, including after a
    /// shutdown timeout.
    pub async fn stop_node(&self, node: &dyn ShellChannel, clean: bool) -> HarnessResult<()> {
        info!(
            node = %node.node(),
            "{} stopping streams test process",
            if clean { "cleanly" } else { "forcibly" }
        );

        let pids = self.pids(node).await;
        let sig = StopSignal::for_shutdown(clean);
        for pid in &pids {
            if let Err(e) = node.signal(*pid, sig).await {
                debug!(pid, error = %e, "signal delivery failed, process may already be gone");
            }
        }

        let mut timed_out = false;
        if clean {
            for pid in &pids {
                if !self
                    .wait_dead(node, *pid, self.config.shutdown_timeout)
                    .await
                {
                    warn!(node = %node.node(), pid, "process did not exit within the clean-shutdown window");
                    timed_out = true;
                }
            }
        }

        // Best-effort cleanup happens regardless of confirmed termination.
        node.run(&format!("rm -f {}", self.config.paths.pid_file.display()))
            .await?;

        if timed_out {
            return Err(HarnessError::shutdown_timeout(node.node().clone()));
        }
        Ok(())
    }

    /// Stop the process on every node. Sequential, no rollback on partial
    /// failure: the first hard error propagates with earlier nodes already
    /// stopped.
    pub async fn stop_all(&self, clean: bool) -> HarnessResult<()> {
        for node in &self.nodes {
            self.stop_node(node.as_ref(), clean).await?;
        }
        Ok(())
    }

    /// Block until every recorded pid on the node has exited on its own.
    pub async fn wait_node(&self, node: &dyn ShellChannel, timeout: Duration) -> HarnessResult<()> {
        for pid in self.pids(node).await {
            if !self.wait_dead(node, pid, timeout).await {
                return Err(HarnessError::shutdown_timeout(node.node().clone()));
            }
        }
        Ok(())
    }

    /// [`Self::wait_node`] over every node.
    /// [`DEFAULT_WAIT_TIMEOUT`](crate::config::DEFAULT_WAIT_TIMEOUT) is the
    /// usual harness-level choice.
    pub async fn wait_all(&self, timeout: Duration) -> HarnessResult<()> {
        for node in &self.nodes {
            self.wait_node(node.as_ref(), timeout).await?;
        }
        Ok(())
    }

    /// Clean stop followed immediately by start. No grace period; nothing
    /// survives the boundary except what the process persisted to its
    /// state directory.
    pub async fn restart_node(&self, node: &dyn ShellChannel) -> HarnessResult<()> {
        info!(node = %node.node(), "restarting streams test process");
        self.stop_node(node, true).await?;
        self.start_node(node).await
    }

    /// [`Self::restart_node`] over every node.
    pub async fn restart(&self) -> HarnessResult<()> {
        for node in &self.nodes {
            self.restart_node(node.as_ref()).await?;
        }
        Ok(())
    }

    /// Kill without warning, then start again: a crash-then-recovery
    /// scenario.
    pub async fn abort_then_restart_node(&self, node: &dyn ShellChannel) -> HarnessResult<()> {
        info!(node = %node.node(), "aborting streams test process");
        self.stop_node(node, false).await?;
        info!(node = %node.node(), "restarting streams test process");
        self.start_node(node).await
    }

    /// [`Self::abort_then_restart_node`] over every node.
    pub async fn abort_then_restart(&self) -> HarnessResult<()> {
        for node in &self.nodes {
            self.abort_then_restart_node(node.as_ref()).await?;
        }
        Ok(())
    }

    /// Reset the node to a pristine state between test runs: best-effort
    /// kill by command-line match, then recursive removal of the
    /// persistent root. Idempotent.
    pub async fn clean_node(&self, node: &dyn ShellChannel) -> HarnessResult<()> {
        if let Err(e) = node.kill_matching(&self.spec.class_name).await {
            debug!(node = %node.node(), error = %e, "kill-by-name failed during cleanup");
        }
        node.run(&format!("rm -rf {}", self.config.paths.root.display()))
            .await
    }

    /// `clean_node` over every node.
    pub async fn clean_all(&self) -> HarnessResult<()> {
        for node in &self.nodes {
            self.clean_node(node.as_ref()).await?;
        }
        Ok(())
    }

    /// Poll the node until the pid is no longer alive, up to `timeout`.
    /// Returns false on expiry. Liveness probe failures read as "dead":
    /// once a pid cannot be checked it cannot be waited on either.
    async fn wait_dead(&self, node: &dyn ShellChannel, pid: u32, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            match node.alive(pid).await {
                Ok(true) => {}
                Ok(false) | Err(_) => return true,
            }
            if Instant::now() >= deadline {
                return false;
            }
            sleep(self.config.poll_interval).await;
        }
    }
}
