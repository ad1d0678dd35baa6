use serde::Serialize;

use super::counters::{SystemCounters, read_counters};
use super::process::{
    DEFAULT_COMMAND_WIDTH, ProcessRecord, list_pids, resolve_owner, sample_process,
};
use super::procfs::ProcFs;
use super::source::{CounterSource, ProcessSource, SystemUsers, UserResolver};

/// One cycle's view of system and process state. A fresh snapshot is built
/// every refresh; nothing in it is updated in place.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct Snapshot {
    pub counters: SystemCounters,
    pub processes: Vec<ProcessRecord>,
}

/// Share of total memory held by `resident_kb`, in percent. Zero when the
/// total is unknown. No clamping is applied.
pub fn memory_percent(resident_kb: u64, total_kb: u64) -> f64 {
    if total_kb == 0 {
        0.0
    } else {
        100.0 * resident_kb as f64 / total_kb as f64
    }
}

/// Reads counters once, enumerates once, then samples each identifier in
/// turn. Every memory percentage is computed against the same counters.
pub fn build_snapshot<S, U>(source: &S, users: &U, command_width: usize) -> Snapshot
where
    S: CounterSource + ProcessSource + ?Sized,
    U: UserResolver + ?Sized,
{
    let counters = read_counters(source);
    let pids = list_pids(source);
    let total_kb = counters.memory.total_kb;

    let mut processes = Vec::with_capacity(pids.len());
    let mut vanished = 0usize;
    for pid in pids {
        let mut record = sample_process(source, pid, command_width);
        if record.is_placeholder() {
            vanished += 1;
        }
        record.user = resolve_owner(source, users, pid);
        record.memory_percent = memory_percent(record.resident_kb, total_kb);
        processes.push(record);
    }

    tracing::debug!(
        processes = processes.len(),
        vanished,
        total_kb,
        "snapshot built"
    );

    Snapshot {
        counters,
        processes,
    }
}

/// Owns the providers and produces one snapshot per refresh.
pub struct Collector<S = ProcFs, U = SystemUsers> {
    source: S,
    users: U,
    command_width: usize,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        Collector::with_sources(ProcFs::new(), SystemUsers)
    }
}

impl<S, U> Collector<S, U>
where
    S: CounterSource + ProcessSource,
    U: UserResolver,
{
    pub fn with_sources(source: S, users: U) -> Self {
        Collector {
            source,
            users,
            command_width: DEFAULT_COMMAND_WIDTH,
        }
    }

    pub fn with_command_width(mut self, width: usize) -> Self {
        self.command_width = width.max(1);
        self
    }

    pub fn refresh(&self) -> Snapshot {
        let _refresh_span = tracing::debug_span!("collector.refresh").entered();
        build_snapshot(&self.source, &self.users, self.command_width)
    }
}
