// src/ui/widgets/input.rs
use crate::app::{App, AppState};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

/// Renders the input bar: the typed target URL plus the currently selected
/// scan kind on the right edge of the block title.
pub fn render_input(frame: &mut Frame, app: &App, area: Rect) {
    let kind_label = format!(" Scan: {} (Tab to change) ", app.selected_kind().title());
    let input_block = Block::default()
        .borders(Borders::ALL)
        .title("Target URL")
        .title_top(Line::from(kind_label.cyan()).right_aligned());
    let input_paragraph = Paragraph::new(app.input.as_str())
        .block(input_block)
        .style(Style::default().fg(Color::Yellow));
    frame.render_widget(input_paragraph, area);

    // Show the cursor only when in the Idle state. Position by char count,
    // not byte length, so multibyte input does not push the cursor away.
    if let AppState::Idle = app.state {
        frame.set_cursor_position((area.x + app.input.chars().count() as u16 + 1, area.y + 1));
    }
}
