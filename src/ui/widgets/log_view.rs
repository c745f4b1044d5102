// src/ui/widgets/log_view.rs

use crate::app::App;
use ratatui::{
    prelude::*,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Renders the log panel: the most recent lines of the application's log
/// file, with the timestamp part of each line dimmed for readability.
pub fn render_log_view(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().title("Logs").borders(Borders::ALL);
    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    // Keep the newest lines visible when there are more than fit.
    let visible = inner_area.height as usize;
    let skip = app.log_content.len().saturating_sub(visible);

    let log_lines: Vec<Line> = app.log_content[skip..]
        .iter()
        .map(|line_str| {
            // A typical line looks like "DATE TIME LEVEL MESSAGE".
            let mut parts = line_str.splitn(3, ' ');
            match (parts.next(), parts.next(), parts.next()) {
                (Some(date), Some(time), Some(rest)) => {
                    let timestamp = format!("{} {}", date, time);
                    let message = format!(" {}", rest);
                    Line::from(vec![
                        Span::styled(timestamp, Style::default().fg(Color::DarkGray)),
                        Span::raw(message),
                    ])
                }
                _ => Line::from(line_str.as_str()),
            }
        })
        .collect();

    frame.render_widget(Paragraph::new(log_lines), inner_area);
}
