//! Bounded waits for process exit.

use crate::check::process_exists;
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// Wait until the process no longer exists, up to `timeout`.
///
/// Returns `true` if the process exited within the window, `false` on
/// timeout. Probe failures count as "process gone" - once a pid cannot be
/// checked it cannot be tracked either.
pub async fn wait_for_exit(pid: u32, timeout: Duration, poll_interval: Duration) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        match process_exists(pid) {
            Ok(true) => {}
            Ok(false) | Err(_) => return true,
        }
        if Instant::now() >= deadline {
            return false;
        }
        sleep(poll_interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::process::Command;

    #[tokio::test]
    async fn test_wait_for_exit_observes_exit() {
        let mut child = Command::new("sleep").arg("0.2").spawn().unwrap();
        let pid = child.id();
        // Reap concurrently so the pid does not linger as a zombie
        let reaper = std::thread::spawn(move || {
            let _ = child.wait();
        });

        let exited = wait_for_exit(pid, Duration::from_secs(5), Duration::from_millis(50)).await;
        assert!(exited);
        reaper.join().unwrap();
    }

    #[tokio::test]
    async fn test_wait_for_exit_times_out() {
        let mut child = Command::new("sleep").arg("300").spawn().unwrap();
        let pid = child.id();

        let exited =
            wait_for_exit(pid, Duration::from_millis(300), Duration::from_millis(50)).await;
        assert!(!exited);

        let _ = crate::terminate::force_kill(pid);
        let _ = child.wait();
    }
}
