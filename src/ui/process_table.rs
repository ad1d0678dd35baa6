use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Borders, Cell, Row, Table, TableState};

use crate::format::truncate_unicode;
use crate::system::process::ProcessRecord;
use crate::ui::theme::Theme;

const USER_WIDTH: usize = 10;

const COLUMNS: [&str; 7] = ["PID", "USER", "S", "MEM(KB)", "MEM%", "CPU%", "COMMAND"];

fn widths() -> [Constraint; 7] {
    [
        Constraint::Length(7),
        Constraint::Length(USER_WIDTH as u16),
        Constraint::Length(2),
        Constraint::Length(10),
        Constraint::Length(6),
        Constraint::Length(6),
        Constraint::Min(10),
    ]
}

fn row<'a>(process: &'a ProcessRecord, theme: &Theme) -> Row<'a> {
    Row::new(vec![
        Cell::from(process.pid.to_string()),
        Cell::from(truncate_unicode(&process.user, USER_WIDTH)),
        Cell::from(process.state.to_string()),
        Cell::from(process.resident_kb.to_string()),
        Cell::from(Span::styled(
            format!("{:.2}", process.memory_percent),
            Style::default().fg(theme.heat_color(process.memory_percent)),
        )),
        Cell::from(format!("{:.1}", process.cpu_percent)),
        Cell::from(process.command.as_str()),
    ])
}

pub fn render(
    frame: &mut Frame,
    area: Rect,
    processes: &[ProcessRecord],
    state: &mut TableState,
    theme: &Theme,
) {
    let header = Row::new(COLUMNS).style(
        Style::default()
            .fg(theme.table_header_fg)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = processes.iter().map(|p| row(p, theme)).collect();

    let table = Table::new(rows, widths())
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.overlay_border)),
        )
        .style(Style::default().fg(theme.text_primary))
        .row_highlight_style(
            Style::default()
                .fg(theme.selection_fg)
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, state);
}
