use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};

use super::platform;
use super::source::{CounterSource, ProcessSource};

/// Upper bound on how much of an argument vector is read per process.
pub const CMDLINE_LIMIT: u64 = 4096;

/// Reads counters and process details from a procfs mount.
///
/// Each read opens, consumes and drops its own handle before returning, so
/// no descriptor outlives a single call regardless of the outcome.
#[derive(Debug, Clone)]
pub struct ProcFs {
    root: PathBuf,
    page_size: u64,
}

impl Default for ProcFs {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcFs {
    pub fn new() -> Self {
        Self::with_root("/proc")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        ProcFs {
            root: root.into(),
            page_size: platform::page_size(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Reads the whole file and decodes it lossily. Process names are
    /// truncated by the kernel at a byte boundary and may not be UTF-8.
    fn read_text(&self, path: PathBuf) -> Option<String> {
        match fs::read(&path) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(err) => {
                tracing::trace!(path = %path.display(), %err, "procfs read failed");
                None
            }
        }
    }

    fn pid_path(&self, pid: u32, file: &str) -> PathBuf {
        self.root.join(pid.to_string()).join(file)
    }
}

impl CounterSource for ProcFs {
    fn read_cpu_stat(&self) -> Option<String> {
        self.read_text(self.root.join("stat"))
    }

    fn read_meminfo(&self) -> Option<String> {
        self.read_text(self.root.join("meminfo"))
    }

    fn read_uptime(&self) -> Option<String> {
        self.read_text(self.root.join("uptime"))
    }
}

impl ProcessSource for ProcFs {
    fn list_entries(&self) -> Option<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(root = %self.root.display(), %err, "cannot list process table");
                return None;
            }
        };
        let names = entries
            .flatten()
            .filter(|entry| entry.file_type().map(|t| t.is_dir()).unwrap_or(false))
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        Some(names)
    }

    fn read_stat(&self, pid: u32) -> Option<String> {
        self.read_text(self.pid_path(pid, "stat"))
    }

    fn read_cmdline(&self, pid: u32) -> Option<Vec<u8>> {
        let file = File::open(self.pid_path(pid, "cmdline")).ok()?;
        let mut buf = Vec::new();
        file.take(CMDLINE_LIMIT).read_to_end(&mut buf).ok()?;
        Some(buf)
    }

    fn read_status(&self, pid: u32) -> Option<String> {
        self.read_text(self.pid_path(pid, "status"))
    }

    fn page_size(&self) -> u64 {
        self.page_size
    }
}
