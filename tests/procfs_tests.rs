use std::fs;
use std::path::{Path, PathBuf};

use proctop::system::process::{UNKNOWN_USER, list_pids, resolve_owner, sample_process};
use proctop::system::snapshot::build_snapshot;
use proctop::system::{Collector, ProcFs, ProcessSource, SystemUsers, UserResolver, read_counters};

struct FixedUsers;

impl UserResolver for FixedUsers {
    fn user_name(&self, uid: u32) -> Option<String> {
        match uid {
            0 => Some("root".to_string()),
            1000 => Some("alice".to_string()),
            _ => None,
        }
    }
}

struct FakeProcRoot {
    root: PathBuf,
}

impl FakeProcRoot {
    fn new(name: &str) -> Self {
        let root = std::env::temp_dir().join(format!("proctop_{name}_{}", std::process::id()));
        let _ = fs::remove_dir_all(&root);
        fs::create_dir_all(&root).unwrap();
        FakeProcRoot { root }
    }

    fn write(&self, rel: &str, contents: &[u8]) {
        let path = self.root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }

    fn add_process(&self, pid: u32, name: &str, rss_pages: u64, uid: u32, cmdline: &[u8]) {
        self.write(
            &format!("{pid}/stat"),
            format!(
                "{pid} ({name}) S 1 {pid} {pid} 0 -1 4194560 10 0 0 0 3 4 0 0 20 0 1 0 9 1000 {rss_pages} 0\n"
            )
            .as_bytes(),
        );
        self.write(&format!("{pid}/cmdline"), cmdline);
        self.write(
            &format!("{pid}/status"),
            format!("Name:\t{name}\nUid:\t{uid}\t{uid}\t{uid}\t{uid}\n").as_bytes(),
        );
    }

    fn path(&self) -> &Path {
        &self.root
    }
}

impl Drop for FakeProcRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.root);
    }
}

#[test]
fn synthetic_procfs_builds_full_snapshot() {
    let fake = FakeProcRoot::new("snapshot");
    fake.write("stat", b"cpu  100 20 30 850 0 0 0\ncpu0 1 2 3 4\n");
    fake.write(
        "meminfo",
        b"MemTotal:        1000000 kB\nMemFree:          200000 kB\nMemAvailable:     600000 kB\n",
    );
    fake.write("uptime", b"3600.00 7000.00\n");
    fake.add_process(1, "systemd", 100, 0, b"/sbin/init\0splash\0");
    fake.add_process(4242, "python3", 2500, 1000, b"");
    fake.add_process(77, "ghost user", 0, 4321, b"");
    // Not a process: must be ignored by enumeration.
    fs::create_dir_all(fake.path().join("sys")).unwrap();
    fake.write("self_link_placeholder", b"");

    let source = ProcFs::with_root(fake.path());
    let page_kb = source.page_size() / 1024;

    let mut pids = list_pids(&source);
    pids.sort_unstable();
    assert_eq!(pids, vec![1, 77, 4242]);

    let snapshot = build_snapshot(&source, &FixedUsers, 255);
    assert_eq!(snapshot.counters.cpu.active, 150);
    assert_eq!(snapshot.counters.cpu.total, 1000);
    assert_eq!(snapshot.counters.memory.available_kb, 600000);
    assert!((snapshot.counters.uptime_secs - 3600.0).abs() < f64::EPSILON);

    let find = |pid: u32| snapshot.processes.iter().find(|p| p.pid == pid).unwrap();

    let init = find(1);
    assert_eq!(init.user, "root");
    assert_eq!(init.command, "/sbin/init splash");
    assert_eq!(init.resident_kb, 100 * page_kb);
    assert_eq!(init.cpu_ticks, 7);

    let python = find(4242);
    assert_eq!(python.user, "alice");
    assert_eq!(python.command, "python3");
    let expected = 100.0 * (2500 * page_kb) as f64 / 1_000_000.0;
    assert!((python.memory_percent - expected).abs() < 1e-9);

    let ghost = find(77);
    assert_eq!(ghost.user, UNKNOWN_USER);
    assert_eq!(ghost.command, "ghost user");
}

#[test]
fn process_removed_between_enumeration_and_sampling() {
    let fake = FakeProcRoot::new("vanish");
    fake.add_process(10, "short", 50, 0, b"short\0");
    let source = ProcFs::with_root(fake.path());

    assert_eq!(list_pids(&source), vec![10]);
    fs::remove_dir_all(fake.path().join("10")).unwrap();

    let record = sample_process(&source, 10, 255);
    assert_eq!(record.state, '?');
    assert_eq!(record.resident_kb, 0);
    assert_eq!(resolve_owner(&source, &FixedUsers, 10), UNKNOWN_USER);
}

#[test]
fn kernel_truncated_utf8_name_still_samples() {
    let fake = FakeProcRoot::new("split_utf8");
    // comm is cut at 15 bytes, which lands inside the last character here.
    let name = &"a日本語テキ".as_bytes()[..15];
    let mut stat = b"7 (".to_vec();
    stat.extend_from_slice(name);
    stat.extend_from_slice(b") R 1 7 7 0 -1 4194560 10 0 0 0 3 4 0 0 20 0 1 0 9 1000 250 0\n");
    fake.write("7/stat", &stat);
    fake.write("7/cmdline", b"");
    let mut status = b"Name:\t".to_vec();
    status.extend_from_slice(name);
    status.extend_from_slice(b"\nUid:\t0\t0\t0\t0\n");
    fake.write("7/status", &status);

    let source = ProcFs::with_root(fake.path());
    let record = sample_process(&source, 7, 255);
    assert_eq!(record.state, 'R');
    assert_eq!(record.resident_kb, 250 * (source.page_size() / 1024));
    assert!(record.command.starts_with("a日本語テ"));
    assert!(!record.is_placeholder());
    assert_eq!(resolve_owner(&source, &FixedUsers, 7), "root");
}

#[test]
fn empty_procfs_yields_empty_snapshot() {
    let fake = FakeProcRoot::new("empty");
    let source = ProcFs::with_root(fake.path());
    let snapshot = build_snapshot(&source, &FixedUsers, 255);
    assert!(snapshot.processes.is_empty());
    assert_eq!(snapshot.counters.cpu.total, 0);
    assert_eq!(snapshot.counters.memory.total_kb, 0);
}

#[test]
fn long_cmdline_is_bounded() {
    let fake = FakeProcRoot::new("long_cmdline");
    let long = vec![b'a'; 20_000];
    fake.add_process(5, "a", 1, 0, &long);
    let source = ProcFs::with_root(fake.path());
    let raw = source.read_cmdline(5).unwrap();
    assert_eq!(raw.len() as u64, proctop::system::procfs::CMDLINE_LIMIT);
}

#[test]
fn sampling_max_pid_on_live_system_is_placeholder() {
    let source = ProcFs::new();
    let record = sample_process(&source, u32::MAX, 255);
    assert_eq!(record.state, '?');
    assert_eq!(record.resident_kb, 0);
    assert_eq!(resolve_owner(&source, &SystemUsers, u32::MAX), UNKNOWN_USER);
}

#[test]
fn live_snapshot_holds_invariants() {
    let snapshot = Collector::new().refresh();
    let counters = read_counters(&ProcFs::new());
    assert_eq!(counters.cpu.total, counters.cpu.active + counters.cpu.idle);
    assert_eq!(
        snapshot.counters.cpu.total,
        snapshot.counters.cpu.active + snapshot.counters.cpu.idle
    );
    for process in &snapshot.processes {
        assert!(process.pid > 0);
        assert!(!process.user.is_empty());
        if snapshot.counters.memory.total_kb == 0 {
            assert_eq!(process.memory_percent, 0.0);
        }
    }
}
