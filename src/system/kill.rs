use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, Signal, System};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KillResult {
    Success(u32, &'static str),
    Failed(u32, String),
    NotFound(u32),
}

fn signal_name(signal: Signal) -> &'static str {
    match signal {
        Signal::Term => "SIGTERM",
        Signal::Kill => "SIGKILL",
        _ => "signal",
    }
}

fn lookup(sys: &mut System, pid: u32) -> Pid {
    let sysinfo_pid = Pid::from_u32(pid);
    sys.refresh_processes_specifics(
        ProcessesToUpdate::Some(&[sysinfo_pid]),
        true,
        ProcessRefreshKind::nothing(),
    );
    sysinfo_pid
}

/// Sends `signal` to `pid`.
pub fn kill_process(sys: &mut System, pid: u32, signal: Signal) -> KillResult {
    let sysinfo_pid = lookup(sys, pid);
    let Some(process) = sys.process(sysinfo_pid) else {
        return KillResult::NotFound(pid);
    };

    let name = signal_name(signal);
    match process.kill_with(signal) {
        Some(true) => KillResult::Success(pid, name),
        Some(false) => KillResult::Failed(pid, format!("Failed to send {name} to PID {pid}")),
        None => {
            // Signal not supported on this platform, fall back to kill()
            fallback_kill_result(pid, process.kill())
        }
    }
}

/// `Process::kill` always sends SIGKILL, whatever was asked for.
fn fallback_kill_result(pid: u32, delivered: bool) -> KillResult {
    if delivered {
        KillResult::Success(pid, signal_name(Signal::Kill))
    } else {
        KillResult::Failed(pid, format!("Failed to kill PID {pid} (permission denied?)"))
    }
}

/// Asks `pid` to terminate, escalating to SIGKILL when SIGTERM cannot be
/// delivered.
pub fn terminate(sys: &mut System, pid: u32) -> KillResult {
    escalate(pid, |signal| kill_process(sys, pid, signal))
}

/// SIGTERM first; only a failed delivery triggers SIGKILL. `send` delivers
/// one signal to `pid`.
fn escalate<F>(pid: u32, mut send: F) -> KillResult
where
    F: FnMut(Signal) -> KillResult,
{
    match send(Signal::Term) {
        KillResult::Failed(_, reason) => {
            tracing::debug!(pid, %reason, "SIGTERM failed, escalating");
            match send(Signal::Kill) {
                KillResult::Failed(pid, _) => {
                    KillResult::Failed(pid, format!("Failed to kill PID {pid}: {reason}"))
                }
                other => other,
            }
        }
        other => other,
    }
}
