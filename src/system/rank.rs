use std::cmp::Ordering;

use super::process::ProcessRecord;
use super::snapshot::Snapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortMode {
    Pid,
    Cpu,
    #[default]
    Memory,
}

impl SortMode {
    pub fn next(self) -> Self {
        match self {
            SortMode::Pid => SortMode::Cpu,
            SortMode::Cpu => SortMode::Memory,
            SortMode::Memory => SortMode::Pid,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SortMode::Pid => "PID",
            SortMode::Cpu => "CPU",
            SortMode::Memory => "Memory",
        }
    }

    pub fn from_str_config(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pid" | "id" => SortMode::Pid,
            "cpu" => SortMode::Cpu,
            _ => SortMode::Memory,
        }
    }
}

/// Orders processes by `mode`. The sort is stable, so records with equal
/// keys keep their input order.
pub fn rank(mut processes: Vec<ProcessRecord>, mode: SortMode) -> Vec<ProcessRecord> {
    match mode {
        SortMode::Pid => processes.sort_by_key(|p| p.pid),
        SortMode::Cpu => processes.sort_by(|a, b| {
            b.cpu_percent
                .partial_cmp(&a.cpu_percent)
                .unwrap_or(Ordering::Equal)
        }),
        SortMode::Memory => processes.sort_by(|a, b| b.resident_kb.cmp(&a.resident_kb)),
    }
    processes
}

pub fn rank_snapshot(snapshot: Snapshot, mode: SortMode) -> Snapshot {
    Snapshot {
        counters: snapshot.counters,
        processes: rank(snapshot.processes, mode),
    }
}
