use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Gauge, Paragraph};

use crate::format::{format_kib, format_uptime};
use crate::system::rank::SortMode;
use crate::system::snapshot::Snapshot;
use crate::ui::theme::Theme;

pub fn render(frame: &mut Frame, area: Rect, snapshot: &Snapshot, sort_mode: SortMode, theme: &Theme) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    render_system_info(frame, chunks[0], snapshot, sort_mode, theme);
    render_ram_gauge(frame, chunks[1], snapshot, theme);
}

fn render_system_info(
    frame: &mut Frame,
    area: Rect,
    snapshot: &Snapshot,
    sort_mode: SortMode,
    theme: &Theme,
) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let secondary = Style::default().fg(theme.text_secondary);
    let counters = &snapshot.counters;
    let title = Line::from(vec![
        Span::styled(
            " proctop ",
            Style::default()
                .fg(theme.header_accent_fg)
                .bg(theme.header_accent_bg)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("Up {}", format_uptime(counters.uptime_secs)), secondary),
        Span::raw("  "),
        Span::styled(format!("Procs: {}", snapshot.processes.len()), secondary),
        Span::raw("  "),
        Span::styled(format!("Sort: {}", sort_mode.label()), secondary),
    ]);
    let ticks = Line::from(Span::styled(
        format!(
            " CPU ticks: {} active / {} total",
            counters.cpu.active, counters.cpu.total
        ),
        secondary,
    ));

    frame.render_widget(Paragraph::new(vec![title, ticks]), inner);
}

fn render_ram_gauge(frame: &mut Frame, area: Rect, snapshot: &Snapshot, theme: &Theme) {
    let counters = &snapshot.counters;
    let used = counters.memory_used_kb();
    let total = counters.memory.total_kb;
    let ratio = if total > 0 {
        (used as f64 / total as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let ram_block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(theme.overlay_border))
        .title(Span::styled(
            " Memory ",
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        ));

    let gauge = Gauge::default()
        .block(ram_block)
        .gauge_style(
            Style::default()
                .fg(theme.gauge_filled)
                .bg(theme.gauge_unfilled),
        )
        .ratio(ratio)
        .label(format!(
            "{} / {} ({:.0}%)",
            format_kib(used),
            format_kib(total),
            ratio * 100.0
        ));

    frame.render_widget(gauge, area);
}
