use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;
use sysinfo::{Signal, System};

use crate::action::{Action, Direction};
use crate::config::{Config, parse_key};
use crate::system::kill::{KillResult, kill_process, terminate};
use crate::system::process::ProcessRecord;
use crate::system::rank::{SortMode, rank_snapshot};
use crate::system::snapshot::{Collector, Snapshot};
use crate::ui::theme::Theme;

const STATUS_TTL: Duration = Duration::from_secs(3);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Help,
}

#[derive(Debug, Clone)]
pub struct ResolvedKeybinds {
    pub quit: KeyCode,
    pub kill: KeyCode,
    pub force_kill: KeyCode,
    pub sort_pid: KeyCode,
    pub sort_cpu: KeyCode,
    pub sort_memory: KeyCode,
    pub cycle_sort: KeyCode,
    pub cycle_theme: KeyCode,
    pub help: KeyCode,
    pub refresh: KeyCode,
}

impl ResolvedKeybinds {
    pub fn from_config(kb: &crate::config::KeybindsConfig) -> Self {
        Self {
            quit: parse_key(&kb.quit).unwrap_or(KeyCode::Char('q')),
            kill: parse_key(&kb.kill).unwrap_or(KeyCode::Char('k')),
            force_kill: parse_key(&kb.force_kill).unwrap_or(KeyCode::Char('K')),
            sort_pid: parse_key(&kb.sort_pid).unwrap_or(KeyCode::Char('p')),
            sort_cpu: parse_key(&kb.sort_cpu).unwrap_or(KeyCode::Char('c')),
            sort_memory: parse_key(&kb.sort_memory).unwrap_or(KeyCode::Char('m')),
            cycle_sort: parse_key(&kb.cycle_sort).unwrap_or(KeyCode::Char('s')),
            cycle_theme: parse_key(&kb.cycle_theme).unwrap_or(KeyCode::Char('t')),
            help: parse_key(&kb.help).unwrap_or(KeyCode::Char('?')),
            refresh: parse_key(&kb.refresh).unwrap_or(KeyCode::Char('r')),
        }
    }

    /// Short (key_label, description) pairs for the status bar.
    pub fn status_pills(&self) -> Vec<(String, &'static str)> {
        vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.sort_pid), "PID"),
            (key_label(self.sort_cpu), "CPU"),
            (key_label(self.sort_memory), "Memory"),
            ("\u{2191}\u{2193}".to_string(), "Select"),
            (key_label(self.kill), "Kill"),
            (key_label(self.help), "Help"),
        ]
    }

    /// Returns (key_label, description) pairs for all configurable keybinds.
    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        let mut entries = vec![
            (key_label(self.quit), "Quit"),
            (key_label(self.kill), "Terminate process"),
            (key_label(self.force_kill), "Force kill (SIGKILL)"),
            (key_label(self.sort_pid), "Sort by PID"),
            (key_label(self.sort_cpu), "Sort by CPU"),
            (key_label(self.sort_memory), "Sort by memory"),
            (key_label(self.cycle_sort), "Cycle sort mode"),
            (key_label(self.cycle_theme), "Cycle theme"),
            (key_label(self.refresh), "Refresh now"),
            (key_label(self.help), "Toggle help"),
        ];
        entries.push(("↑↓".to_string(), "Select"));
        entries.push(("PgUp/PgDn".to_string(), "Page"));
        entries.push(("Ctrl+C".to_string(), "Quit (always)"));
        entries
    }
}

fn key_label(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Bksp".to_string(),
        KeyCode::Delete => "Del".to_string(),
        _ => "?".to_string(),
    }
}

pub struct App {
    pub running: bool,
    pub collector: Collector,
    /// Latest snapshot, already ranked by `sort_mode`.
    pub snapshot: Snapshot,
    pub sort_mode: SortMode,
    pub selected_index: usize,
    pub table_state: TableState,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub status_message: Option<(String, Instant)>,
    pub keybinds: ResolvedKeybinds,
    /// Rows visible in the table, updated on every draw.
    pub visible_rows: usize,
    signaller: System,
}

impl App {
    pub fn new(config: Config) -> Self {
        let collector = Collector::new().with_command_width(config.general.command_width);
        let snapshot = collector.refresh();
        Self::from_parts(config, collector, snapshot)
    }

    /// Assembles an app around an existing snapshot. The snapshot is
    /// re-ranked with the configured sort mode.
    pub fn from_parts(config: Config, collector: Collector, snapshot: Snapshot) -> Self {
        let sort_mode = SortMode::from_str_config(&config.general.default_sort);
        App {
            running: true,
            collector,
            snapshot: rank_snapshot(snapshot, sort_mode),
            sort_mode,
            selected_index: 0,
            table_state: TableState::default().with_selected(Some(0)),
            input_mode: InputMode::Normal,
            theme: Theme::from_config(&config.colors.theme),
            status_message: None,
            keybinds: ResolvedKeybinds::from_config(&config.keybinds),
            visible_rows: 10,
            signaller: System::new(),
        }
    }

    /// Runs one sampling cycle and replaces the snapshot.
    pub fn refresh_data(&mut self) {
        self.snapshot = rank_snapshot(self.collector.refresh(), self.sort_mode);
        self.clamp_selection();

        if let Some((_, created)) = &self.status_message
            && created.elapsed() >= STATUS_TTL
        {
            self.status_message = None;
        }
    }

    pub fn map_key(&self, key: KeyEvent) -> Action {
        // Ctrl+C always quits (hardwired safety)
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Action::Quit;
        }

        match self.input_mode {
            InputMode::Normal => self.map_key_normal(key),
            InputMode::Help => self.map_key_help(key),
        }
    }

    fn map_key_normal(&self, key: KeyEvent) -> Action {
        let code = key.code;
        let kb = &self.keybinds;

        // Navigation keys are hardwired (not configurable)
        match code {
            KeyCode::Up => return Action::Navigate(Direction::Up),
            KeyCode::Down => return Action::Navigate(Direction::Down),
            KeyCode::PageUp => return Action::Navigate(Direction::PageUp),
            KeyCode::PageDown => return Action::Navigate(Direction::PageDown),
            KeyCode::Home => return Action::Navigate(Direction::Top),
            KeyCode::End => return Action::Navigate(Direction::Bottom),
            _ => {}
        }

        if code == kb.quit {
            return Action::Quit;
        }
        if code == kb.kill {
            return self.selected_pid().map_or(Action::None, Action::Kill);
        }
        if code == kb.force_kill {
            return self.selected_pid().map_or(Action::None, Action::ForceKill);
        }
        if code == kb.sort_pid {
            return Action::SetSort(SortMode::Pid);
        }
        if code == kb.sort_cpu {
            return Action::SetSort(SortMode::Cpu);
        }
        if code == kb.sort_memory {
            return Action::SetSort(SortMode::Memory);
        }
        if code == kb.cycle_sort {
            return Action::CycleSortMode;
        }
        if code == kb.cycle_theme {
            return Action::CycleTheme;
        }
        if code == kb.help {
            return Action::ToggleHelp;
        }
        if code == kb.refresh {
            return Action::Refresh;
        }

        Action::None
    }

    fn map_key_help(&self, key: KeyEvent) -> Action {
        let code = key.code;
        // In help mode, only the help key and Esc dismiss, everything else is ignored
        if code == self.keybinds.help || code == KeyCode::Esc {
            return Action::ToggleHelp;
        }
        Action::None
    }

    pub fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::Navigate(dir) => self.navigate(dir),
            Action::Kill(pid) => {
                if pid != 0 {
                    let result = terminate(&mut self.signaller, pid);
                    self.set_kill_status(result);
                }
            }
            Action::ForceKill(pid) => {
                if pid != 0 {
                    let result = kill_process(&mut self.signaller, pid, Signal::Kill);
                    self.set_kill_status(result);
                }
            }
            Action::SetSort(mode) => self.set_sort_mode(mode),
            Action::CycleSortMode => self.set_sort_mode(self.sort_mode.next()),
            Action::CycleTheme => {
                self.theme = self.theme.next();
            }
            Action::ToggleHelp => {
                self.input_mode = if self.input_mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
            }
            Action::Refresh => self.refresh_data(),
            Action::None => {}
        }
    }

    fn set_sort_mode(&mut self, mode: SortMode) {
        self.sort_mode = mode;
        let snapshot = std::mem::take(&mut self.snapshot);
        self.snapshot = rank_snapshot(snapshot, mode);
    }

    fn navigate(&mut self, direction: Direction) {
        let len = self.snapshot.processes.len();
        if len == 0 {
            return;
        }
        let page = self.visible_rows.max(1);
        let last = len - 1;
        self.selected_index = match direction {
            Direction::Up => self.selected_index.saturating_sub(1),
            Direction::Down => (self.selected_index + 1).min(last),
            Direction::PageUp => self.selected_index.saturating_sub(page),
            Direction::PageDown => (self.selected_index + page).min(last),
            Direction::Top => 0,
            Direction::Bottom => last,
        };
        self.table_state.select(Some(self.selected_index));
    }

    fn clamp_selection(&mut self) {
        let len = self.snapshot.processes.len();
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
        self.table_state.select(Some(self.selected_index));
    }

    pub fn selected_process(&self) -> Option<&ProcessRecord> {
        self.snapshot.processes.get(self.selected_index)
    }

    pub fn selected_pid(&self) -> Option<u32> {
        self.selected_process().map(|p| p.pid)
    }

    pub fn show_help(&self) -> bool {
        self.input_mode == InputMode::Help
    }

    pub fn help_entries(&self) -> Vec<(String, &'static str)> {
        self.keybinds.help_entries()
    }

    fn set_kill_status(&mut self, result: KillResult) {
        let msg = match result {
            KillResult::Success(pid, signal) => format!("Sent {signal} to PID {pid}"),
            KillResult::Failed(_, err) => err,
            KillResult::NotFound(pid) => format!("Process {pid} not found"),
        };
        tracing::info!(message = %msg, "termination request");
        self.status_message = Some((msg, Instant::now()));
    }

    pub fn on_resize(&mut self) {
        self.clamp_selection();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::KeybindsConfig;

    fn make_test_process(pid: u32, command: &str, resident_kb: u64) -> ProcessRecord {
        ProcessRecord {
            pid,
            user: "user".to_string(),
            command: command.to_string(),
            cpu_percent: 0.0,
            memory_percent: resident_kb as f64 / 10_000.0,
            resident_kb,
            state: 'S',
            cpu_ticks: 0,
        }
    }

    fn make_test_app(procs: Vec<ProcessRecord>, sort: &str) -> App {
        let mut config = Config::default();
        config.general.default_sort = sort.to_string();
        let mut snapshot = Snapshot::default();
        snapshot.counters.memory.total_kb = 1_000_000;
        snapshot.processes = procs;
        App::from_parts(config, Collector::new(), snapshot)
    }

    fn procs() -> Vec<ProcessRecord> {
        vec![
            make_test_process(40, "small", 100),
            make_test_process(5, "big", 9000),
            make_test_process(100, "mid", 500),
        ]
    }

    fn pids(app: &App) -> Vec<u32> {
        app.snapshot.processes.iter().map(|p| p.pid).collect()
    }

    #[test]
    fn snapshot_is_ranked_by_configured_sort() {
        let app = make_test_app(procs(), "memory");
        assert_eq!(pids(&app), vec![5, 100, 40]);
        let app = make_test_app(procs(), "pid");
        assert_eq!(pids(&app), vec![5, 40, 100]);
    }

    #[test]
    fn new_app_starts_ranked_by_configured_sort() {
        let mut config = Config::default();
        config.general.default_sort = "pid".to_string();
        let app = App::new(config);
        let live = pids(&app);
        let mut sorted = live.clone();
        sorted.sort_unstable();
        assert_eq!(live, sorted);
        assert_eq!(app.sort_mode, SortMode::Pid);
    }

    #[test]
    fn set_sort_reranks_immediately() {
        let mut app = make_test_app(procs(), "memory");
        app.dispatch(Action::SetSort(SortMode::Pid));
        assert_eq!(app.sort_mode, SortMode::Pid);
        assert_eq!(pids(&app), vec![5, 40, 100]);
    }

    #[test]
    fn dispatch_cycle_sort_advances_mode() {
        let mut app = make_test_app(procs(), "memory");
        assert_eq!(app.sort_mode, SortMode::Memory);
        app.dispatch(Action::CycleSortMode);
        assert_eq!(app.sort_mode, SortMode::Pid);
        app.dispatch(Action::CycleSortMode);
        assert_eq!(app.sort_mode, SortMode::Cpu);
        app.dispatch(Action::CycleSortMode);
        assert_eq!(app.sort_mode, SortMode::Memory);
    }

    #[test]
    fn navigation_is_bounded() {
        let mut app = make_test_app(procs(), "pid");
        app.dispatch(Action::Navigate(Direction::Up));
        assert_eq!(app.selected_index, 0);
        app.dispatch(Action::Navigate(Direction::Down));
        app.dispatch(Action::Navigate(Direction::Down));
        app.dispatch(Action::Navigate(Direction::Down));
        assert_eq!(app.selected_index, 2);
        assert_eq!(app.selected_pid(), Some(100));
        app.dispatch(Action::Navigate(Direction::Top));
        assert_eq!(app.selected_pid(), Some(5));
        app.dispatch(Action::Navigate(Direction::PageDown));
        assert_eq!(app.selected_index, 2);
        assert_eq!(app.table_state.selected(), Some(2));
    }

    #[test]
    fn navigation_on_empty_snapshot_is_noop() {
        let mut app = make_test_app(Vec::new(), "pid");
        app.dispatch(Action::Navigate(Direction::Down));
        assert_eq!(app.selected_index, 0);
        assert_eq!(app.selected_pid(), None);
        let key = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);
    }

    #[test]
    fn default_keybinds() {
        let app = make_test_app(procs(), "pid");

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Char('p'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::SetSort(SortMode::Pid));

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::SetSort(SortMode::Cpu));

        let key = KeyEvent::new(KeyCode::Char('m'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::SetSort(SortMode::Memory));

        let key = KeyEvent::new(KeyCode::Char('k'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Kill(5));

        let key = KeyEvent::new(KeyCode::Char('K'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ForceKill(5));

        // Ctrl+C always quits
        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Navigate(Direction::Down));
    }

    #[test]
    fn custom_keybind_remap_works() {
        let mut app = make_test_app(procs(), "pid");
        let kb = KeybindsConfig {
            quit: "x".to_string(),
            ..KeybindsConfig::default()
        };
        app.keybinds = ResolvedKeybinds::from_config(&kb);

        let key = KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::Quit);

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);
    }

    #[test]
    fn help_mode_blocks_other_keys() {
        let mut app = make_test_app(procs(), "pid");

        app.dispatch(Action::ToggleHelp);
        assert!(app.show_help());

        let key = KeyEvent::new(KeyCode::Char('q'), KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::None);

        let key = KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE);
        assert_eq!(app.map_key(key), Action::ToggleHelp);

        let key = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(app.map_key(key), Action::Quit);

        app.dispatch(Action::ToggleHelp);
        assert!(!app.show_help());
    }

    #[test]
    fn kill_of_missing_pid_reports_not_found() {
        let mut app = make_test_app(procs(), "pid");
        app.dispatch(Action::ForceKill(u32::MAX));
        let (msg, _) = app.status_message.as_ref().unwrap();
        assert_eq!(msg, &format!("Process {} not found", u32::MAX));
    }

    #[test]
    fn kill_pid_zero_is_ignored() {
        let mut app = make_test_app(procs(), "pid");
        app.dispatch(Action::Kill(0));
        assert!(app.status_message.is_none());
    }

    #[test]
    fn refresh_clamps_selection() {
        let mut app = make_test_app(procs(), "pid");
        app.selected_index = 10_000_000;
        app.refresh_data();
        let len = app.snapshot.processes.len();
        if len == 0 {
            assert_eq!(app.selected_index, 0);
        } else {
            assert_eq!(app.selected_index, len - 1);
        }
    }

    #[test]
    fn quit_stops_app() {
        let mut app = make_test_app(procs(), "pid");
        app.dispatch(Action::Quit);
        assert!(!app.running);
    }
}
