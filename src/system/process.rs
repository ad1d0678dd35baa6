use serde::Serialize;

use super::source::{ProcessSource, UserResolver};
use crate::format::truncate_unicode;

/// Owner name used when the uid cannot be read or resolved.
pub const UNKNOWN_USER: &str = "unknown";
/// Run state reported when the status line is unavailable.
pub const UNKNOWN_STATE: char = '?';
/// Default display width of a command label.
pub const DEFAULT_COMMAND_WIDTH: usize = 255;

/// One process's metrics at sample time.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProcessRecord {
    pub pid: u32,
    pub user: String,
    pub command: String,
    /// Placeholder: tick deltas are never sampled, so this stays 0.0.
    pub cpu_percent: f32,
    pub memory_percent: f64,
    pub resident_kb: u64,
    pub state: char,
    /// utime + stime as last reported by the kernel.
    pub cpu_ticks: u64,
}

impl ProcessRecord {
    /// Record for a process whose details could not be read.
    pub fn placeholder(pid: u32) -> Self {
        ProcessRecord {
            pid,
            user: UNKNOWN_USER.to_string(),
            command: String::new(),
            cpu_percent: 0.0,
            memory_percent: 0.0,
            resident_kb: 0,
            state: UNKNOWN_STATE,
            cpu_ticks: 0,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.state == UNKNOWN_STATE && self.resident_kb == 0 && self.command.is_empty()
    }

    pub fn state_label(&self) -> &'static str {
        state_label(self.state)
    }
}

pub fn state_label(state: char) -> &'static str {
    match state {
        'R' => "Running",
        'S' => "Sleeping",
        'D' => "Disk sleep",
        'Z' => "Zombie",
        'T' => "Stopped",
        't' => "Tracing stop",
        'X' | 'x' => "Dead",
        'I' => "Idle",
        'W' => "Paging",
        'K' => "Wakekill",
        'P' => "Parked",
        _ => "Unknown",
    }
}

/// The fields we keep from a per-process status line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StatFields {
    pub name: String,
    pub state: char,
    pub utime: u64,
    pub stime: u64,
    pub rss_pages: u64,
}

/// Parses `pid (name) S ppid ... utime stime ... rss ...`.
///
/// The name may itself contain spaces or parentheses, so the split happens
/// at the last `)`. Numeric fields that are missing or malformed are zero;
/// `None` is returned only when the name/state prefix is unusable.
pub fn parse_stat_line(line: &str) -> Option<StatFields> {
    let open = line.find('(')?;
    let close = line.rfind(')')?;
    if close < open {
        return None;
    }
    let name = line[open + 1..close].to_string();
    let fields: Vec<&str> = line[close + 1..].split_whitespace().collect();
    // After the name: state(0) ppid(1) pgrp(2) session(3) tty_nr(4)
    // tpgid(5) flags(6) minflt(7) cminflt(8) majflt(9) cmajflt(10)
    // utime(11) stime(12) cutime(13) cstime(14) priority(15) nice(16)
    // num_threads(17) itrealvalue(18) starttime(19) vsize(20) rss(21)
    let state = fields.first()?.chars().next()?;
    let number = |idx: usize| fields.get(idx).and_then(|v| v.parse::<u64>().ok());
    let rss_pages = fields
        .get(21)
        .and_then(|v| v.parse::<i64>().ok())
        .map(|v| v.max(0) as u64)
        .unwrap_or(0);

    Some(StatFields {
        name,
        state,
        utime: number(11).unwrap_or(0),
        stime: number(12).unwrap_or(0),
        rss_pages,
    })
}

/// Turns a NUL separated argument vector into a display string.
/// Returns `None` for an empty blob.
pub fn cmdline_label(raw: &[u8]) -> Option<String> {
    let trimmed = match raw.iter().rposition(|&b| b != 0) {
        Some(last) => &raw[..=last],
        None => return None,
    };
    let joined: Vec<u8> = trimmed
        .iter()
        .map(|&b| if b == 0 { b' ' } else { b })
        .collect();
    Some(String::from_utf8_lossy(&joined).into_owned())
}

/// Extracts the real uid from a `Uid:` line of the status table.
pub fn parse_uid(status: &str) -> Option<u32> {
    status
        .lines()
        .find_map(|line| line.strip_prefix("Uid:"))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|uid| uid.parse().ok())
}

/// Lists the identifiers currently present in the process table.
///
/// Only entries whose whole name is a positive integer count. An
/// unreadable table yields an empty list.
pub fn list_pids<S: ProcessSource + ?Sized>(source: &S) -> Vec<u32> {
    let Some(entries) = source.list_entries() else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|name| name.parse::<u32>().ok())
        .filter(|&pid| pid > 0)
        .collect()
}

/// Samples one process. Never fails: a process that vanished or cannot be
/// read produces a placeholder record.
pub fn sample_process<S: ProcessSource + ?Sized>(
    source: &S,
    pid: u32,
    command_width: usize,
) -> ProcessRecord {
    let mut record = ProcessRecord::placeholder(pid);

    match source.read_stat(pid).as_deref().and_then(parse_stat_line) {
        Some(stat) => {
            record.state = stat.state;
            record.resident_kb = stat.rss_pages.saturating_mul(source.page_size()) / 1024;
            record.cpu_ticks = stat.utime.saturating_add(stat.stime);
            record.command = stat.name;
        }
        None => tracing::debug!(pid, "process status unavailable"),
    }

    if let Some(full) = source.read_cmdline(pid).as_deref().and_then(cmdline_label) {
        record.command = full;
    }
    record.command = truncate_unicode(&record.command, command_width);

    record
}

/// Resolves the owning account name of a process, or [`UNKNOWN_USER`].
pub fn resolve_owner<S, U>(source: &S, users: &U, pid: u32) -> String
where
    S: ProcessSource + ?Sized,
    U: UserResolver + ?Sized,
{
    source
        .read_status(pid)
        .as_deref()
        .and_then(parse_uid)
        .and_then(|uid| users.user_name(uid))
        .unwrap_or_else(|| UNKNOWN_USER.to_string())
}
