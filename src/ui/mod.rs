pub mod header;
pub mod help;
pub mod process_table;
pub mod selection_bar;
pub mod statusbar;
pub mod theme;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::App;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.area());

    header::render(frame, chunks[0], &app.snapshot, app.sort_mode, &app.theme);

    // Borders and the column header take three rows.
    app.visible_rows = chunks[1].height.saturating_sub(3) as usize;
    process_table::render(
        frame,
        chunks[1],
        &app.snapshot.processes,
        &mut app.table_state,
        &app.theme,
    );

    let selected = app
        .selected_process()
        .map(selection_bar::SelectionInfo::from_record);
    selection_bar::render(frame, chunks[2], selected, &app.theme);

    statusbar::render(
        frame,
        chunks[3],
        app.status_message.as_ref(),
        &app.keybinds.status_pills(),
        app.sort_mode,
        &app.theme,
    );

    // Help overlay, rendered last to appear on top
    if app.show_help() {
        help::render(frame, frame.area(), &app.help_entries(), &app.theme);
    }
}
