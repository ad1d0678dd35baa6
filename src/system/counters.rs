use serde::Serialize;

use super::source::CounterSource;

/// Aggregate CPU time accounting, in ticks since boot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CpuTicks {
    pub user: u64,
    pub nice: u64,
    pub system: u64,
    pub idle: u64,
    pub active: u64,
    pub total: u64,
}

impl CpuTicks {
    pub fn new(user: u64, nice: u64, system: u64, idle: u64) -> Self {
        let active = user.saturating_add(nice).saturating_add(system);
        CpuTicks {
            user,
            nice,
            system,
            idle,
            active,
            total: active.saturating_add(idle),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct MemoryInfo {
    pub total_kb: u64,
    pub free_kb: u64,
    pub available_kb: u64,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct SystemCounters {
    pub cpu: CpuTicks,
    pub memory: MemoryInfo,
    pub uptime_secs: f64,
}

impl SystemCounters {
    pub fn memory_used_kb(&self) -> u64 {
        self.memory.total_kb.saturating_sub(self.memory.available_kb)
    }
}

/// Reads every system-wide counter once. Unreadable or malformed sources
/// leave their fields at zero.
pub fn read_counters<S: CounterSource + ?Sized>(source: &S) -> SystemCounters {
    let cpu = match source.read_cpu_stat() {
        Some(text) => parse_cpu_ticks(&text),
        None => {
            tracing::debug!("cpu counters unavailable");
            CpuTicks::default()
        }
    };
    let memory = match source.read_meminfo() {
        Some(text) => parse_meminfo(&text),
        None => {
            tracing::debug!("memory counters unavailable");
            MemoryInfo::default()
        }
    };
    let uptime_secs = match source.read_uptime() {
        Some(text) => parse_uptime(&text),
        None => {
            tracing::debug!("uptime unavailable");
            0.0
        }
    };

    SystemCounters {
        cpu,
        memory,
        uptime_secs,
    }
}

/// Parses the leading `cpu user nice system idle ...` line.
///
/// Fields are consumed left to right; the first one that fails to parse
/// stops the scan and it and everything after it stay zero.
pub fn parse_cpu_ticks(text: &str) -> CpuTicks {
    let Some(line) = text.lines().next() else {
        return CpuTicks::default();
    };
    let mut tokens = line.split_whitespace();
    if tokens.next() != Some("cpu") {
        return CpuTicks::default();
    }

    let mut fields = [0u64; 4];
    for (slot, token) in fields.iter_mut().zip(tokens) {
        match token.parse() {
            Ok(value) => *slot = value,
            Err(_) => break,
        }
    }
    let [user, nice, system, idle] = fields;
    CpuTicks::new(user, nice, system, idle)
}

/// Scans `Key: value kB` lines for the three memory figures we track.
/// Stops as soon as `MemAvailable` has been read.
pub fn parse_meminfo(text: &str) -> MemoryInfo {
    let mut info = MemoryInfo::default();
    for line in text.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let value = || {
            rest.split_whitespace()
                .next()
                .and_then(|v| v.parse::<u64>().ok())
        };
        match key.trim() {
            "MemTotal" => {
                if let Some(v) = value() {
                    info.total_kb = v;
                }
            }
            "MemFree" => {
                if let Some(v) = value() {
                    info.free_kb = v;
                }
            }
            "MemAvailable" => {
                if let Some(v) = value() {
                    info.available_kb = v;
                    break;
                }
            }
            _ => {}
        }
    }
    info
}

pub fn parse_uptime(text: &str) -> f64 {
    text.split_whitespace()
        .next()
        .and_then(|v| v.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
