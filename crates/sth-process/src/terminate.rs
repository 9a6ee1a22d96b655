//! Signal delivery for process termination.

use sth_common::{HarnessError, HarnessResult, StopSignal};

/// Deliver a stop signal to a process.
///
/// The caller decides whether delivery failures matter; when stopping a
/// tracked process the target may already be gone and errors are ignored.
pub fn deliver(pid: u32, signal: StopSignal) -> HarnessResult<()> {
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;

    let nix_signal = match signal {
        StopSignal::Term => Signal::SIGTERM,
        StopSignal::Kill => Signal::SIGKILL,
    };

    kill(Pid::from_raw(pid as i32), nix_signal)
        .map_err(|e| HarnessError::signal(pid, format!("failed to send {}: {}", signal, e)))
}

/// Terminate a process gracefully (SIGTERM).
pub fn terminate_gracefully(pid: u32) -> HarnessResult<()> {
    deliver(pid, StopSignal::Term)
}

/// Force kill a process (SIGKILL).
pub fn force_kill(pid: u32) -> HarnessResult<()> {
    deliver(pid, StopSignal::Kill)
}
