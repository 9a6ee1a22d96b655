//! Process existence checking.

use sth_common::{HarnessError, HarnessResult};

/// Check if a process with the given PID exists and is running.
///
/// Non-destructive: sends no signal, only probes with `kill(pid, 0)`.
///
/// # Returns
///
/// * `Ok(true)` - Process exists and is running
/// * `Ok(false)` - Process does not exist
/// * `Err(_)` - The probe itself failed
pub fn process_exists(pid: u32) -> HarnessResult<bool> {
    use nix::sys::signal::kill;
    use nix::unistd::Pid;

    let nix_pid = Pid::from_raw(pid as i32);

    match kill(nix_pid, None) {
        Ok(_) => Ok(true),
        Err(nix::errno::Errno::ESRCH) => Ok(false),
        // Process exists but belongs to someone else.
        Err(nix::errno::Errno::EPERM) => Ok(true),
        Err(e) => Err(HarnessError::signal(
            pid,
            format!("failed to check process: {}", e),
        )),
    }
}
