//! Capability traits the sampling core reads through.
//!
//! Every method answers `None` when the underlying source is unavailable.
//! Callers collapse `None` into zero/sentinel values, so none of these
//! operations ever surface an error.

/// System-wide counter sources: the aggregate CPU line, the memory table
/// and the uptime value.
pub trait CounterSource {
    fn read_cpu_stat(&self) -> Option<String>;
    fn read_meminfo(&self) -> Option<String>;
    fn read_uptime(&self) -> Option<String>;
}

/// Per-process sources addressed by identifier.
pub trait ProcessSource {
    /// Names of the entries in the process table directory, or `None` when
    /// the table cannot be listed at all.
    fn list_entries(&self) -> Option<Vec<String>>;
    fn read_stat(&self, pid: u32) -> Option<String>;
    /// Raw argument vector, NUL separated.
    fn read_cmdline(&self, pid: u32) -> Option<Vec<u8>>;
    fn read_status(&self, pid: u32) -> Option<String>;
    /// Bytes per kernel page.
    fn page_size(&self) -> u64;
}

/// Resolves numeric owner identifiers to account names.
pub trait UserResolver {
    fn user_name(&self, uid: u32) -> Option<String>;
}

/// Resolver backed by the host's user database.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemUsers;

impl UserResolver for SystemUsers {
    fn user_name(&self, uid: u32) -> Option<String> {
        super::platform::user_name(uid)
    }
}
