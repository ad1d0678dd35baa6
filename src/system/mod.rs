pub mod counters;
pub mod kill;
pub mod platform;
pub mod process;
pub mod procfs;
pub mod rank;
pub mod snapshot;
pub mod source;

pub use counters::{CpuTicks, MemoryInfo, SystemCounters, read_counters};
pub use process::{ProcessRecord, list_pids, resolve_owner, sample_process};
pub use procfs::ProcFs;
pub use rank::{SortMode, rank, rank_snapshot};
pub use snapshot::{Collector, Snapshot, build_snapshot};
pub use source::{CounterSource, ProcessSource, SystemUsers, UserResolver};
