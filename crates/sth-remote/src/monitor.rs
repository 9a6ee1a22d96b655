//! Log-marker monitoring.
//!
//! The readiness protocol of the harness: a launched process announces
//! startup by writing a fixed literal line to its stdout file. The monitor
//! records the file length when it is opened and only considers output that
//! appears after that point, so a marker left over from a previous run never
//! satisfies a new wait.

use crate::channel::ShellChannel;
use sth_common::HarnessResult;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::debug;

/// Watches one file on one node for a marker line.
pub struct LogMonitor<'a> {
    channel: &'a dyn ShellChannel,
    path: PathBuf,
    offset: u64,
}

impl<'a> LogMonitor<'a> {
    /// Open a monitor at the file's current end.
    ///
    /// A missing file reads as length zero - the file usually does not
    /// exist yet when monitoring starts.
    pub async fn begin(channel: &'a dyn ShellChannel, path: &Path) -> HarnessResult<Self> {
        let out = channel
            .capture(&format!("wc -c < {} 2>/dev/null || echo 0", path.display()))
            .await?;
        let offset = out.trim().parse::<u64>().unwrap_or(0);

        Ok(Self {
            channel,
            path: path.to_path_buf(),
            offset,
        })
    }

    /// Poll until `marker` appears past the recorded offset.
    ///
    /// Returns `Ok(true)` once observed, `Ok(false)` if `timeout` elapses
    /// first. Channel failures while polling propagate.
    pub async fn wait_until(
        &self,
        marker: &str,
        timeout: Duration,
        poll_interval: Duration,
    ) -> HarnessResult<bool> {
        let deadline = Instant::now() + timeout;
        loop {
            let tail = self
                .channel
                .capture(&format!(
                    "tail -c +{} {} 2>/dev/null || true",
                    self.offset + 1,
                    self.path.display()
                ))
                .await?;
            if tail.contains(marker) {
                debug!(node = %self.channel.node(), path = %self.path.display(), marker, "marker observed");
                return Ok(true);
            }
            if Instant::now() >= deadline {
                return Ok(false);
            }
            sleep(poll_interval).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::local::LocalAccount;
    use tempfile::TempDir;

    const POLL: Duration = Duration::from_millis(50);

    #[tokio::test]
    async fn test_marker_in_new_output_is_observed() {
        let account = LocalAccount::new("local");
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("out.log");

        let monitor = LogMonitor::begin(&account, &log).await.unwrap();
        account
            .run(&format!("echo 'instance started' >> {}", log.display()))
            .await
            .unwrap();

        let seen = monitor
            .wait_until("instance started", Duration::from_secs(5), POLL)
            .await
            .unwrap();
        assert!(seen);
    }

    #[tokio::test]
    async fn test_marker_before_begin_is_ignored() {
        let account = LocalAccount::new("local");
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("out.log");
        std::fs::write(&log, "instance started\n").unwrap();

        let monitor = LogMonitor::begin(&account, &log).await.unwrap();
        let seen = monitor
            .wait_until("instance started", Duration::from_millis(300), POLL)
            .await
            .unwrap();
        assert!(!seen);
    }

    #[tokio::test]
    async fn test_missing_file_times_out_cleanly() {
        let account = LocalAccount::new("local");
        let dir = TempDir::new().unwrap();
        let log = dir.path().join("never-created.log");

        let monitor = LogMonitor::begin(&account, &log).await.unwrap();
        let seen = monitor
            .wait_until("anything", Duration::from_millis(200), POLL)
            .await
            .unwrap();
        assert!(!seen);
    }
}
