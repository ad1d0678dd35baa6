use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use crate::format::{format_kib, truncate_unicode};
use crate::system::process::ProcessRecord;
use crate::ui::theme::Theme;

#[derive(Debug, Clone)]
pub struct SelectionInfo {
    pub pid: u32,
    pub command: String,
    pub state: &'static str,
    pub cpu_ticks: u64,
    pub resident_kb: u64,
}

impl SelectionInfo {
    pub fn from_record(record: &ProcessRecord) -> Self {
        SelectionInfo {
            pid: record.pid,
            command: record.command.clone(),
            state: record.state_label(),
            cpu_ticks: record.cpu_ticks,
            resident_kb: record.resident_kb,
        }
    }
}

pub fn render(frame: &mut Frame, area: Rect, selected: Option<SelectionInfo>, theme: &Theme) {
    let style = Style::default()
        .bg(theme.statusbar_bg)
        .fg(theme.text_primary);
    let width = area.width as usize;
    let line = match selected {
        Some(selection) => format_selection_line(&selection, width),
        None => " ".repeat(width),
    };

    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(line, style))).style(style),
        area,
    );
}

fn format_selection_line(selection: &SelectionInfo, width: usize) -> String {
    if width == 0 {
        return String::new();
    }

    let right = format!(
        "{}  {} ticks  {}",
        selection.state,
        selection.cpu_ticks,
        format_kib(selection.resident_kb)
    );
    if right.width() >= width {
        return truncate_unicode(&right, width);
    }

    let left_capacity = width.saturating_sub(right.width() + 1);
    let left = truncate_unicode(&format!("{} {}", selection.pid, selection.command), left_capacity);
    let gap = width.saturating_sub(left.width() + right.width());
    format!("{left}{}{right}", " ".repeat(gap))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selection() -> SelectionInfo {
        SelectionInfo {
            pid: 4242,
            command: "/usr/lib/firefox/firefox --new-window".to_string(),
            state: "Sleeping",
            cpu_ticks: 77,
            resident_kb: 2 * 1024 * 1024,
        }
    }

    #[test]
    fn keeps_memory_right_aligned() {
        let line = format_selection_line(&selection(), 60);
        assert!(line.ends_with("2.0 GB"));
        assert!(line.starts_with("4242 "));
        assert_eq!(line.width(), 60);
    }

    #[test]
    fn narrow_width_truncates() {
        let line = format_selection_line(&selection(), 8);
        assert!(line.width() <= 8);
        assert_eq!(format_selection_line(&selection(), 0), "");
    }
}
