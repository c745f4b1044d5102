// src/ui/widgets/disclaimer_popup.rs

use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Renders the disclaimer popup on top of the existing UI.
///
/// A modal-like window with the legal and ethical disclaimer the user must
/// acknowledge before scanning anything. The `Clear` widget ensures the
/// popup is drawn on a clean area, obscuring the content underneath.
pub fn render_disclaimer_popup(frame: &mut Frame, area: Rect) {
    let disclaimer_text = Text::from(vec![
        Line::from("IMPORTANT LEGAL DISCLAIMER".bold().yellow()),
        Line::from(""),
        Line::from("SecuriScan is a security analysis dashboard intended for educational purposes and for professionals to assess assets they are explicitly authorized to test."),
        Line::from(""),
        Line::from("Scanning systems you do not own or have explicit, written permission to test is ILLEGAL and UNETHICAL. Unauthorized scanning can be considered a criminal offense in many jurisdictions."),
        Line::from(""),
        Line::from("By using this software, you agree to the following:"),
        Line::from("1. You will only use it on systems you own or have explicit permission to scan."),
        Line::from("2. You will use this software responsibly and in accordance with all applicable laws."),
        Line::from("3. The authors of this software assume NO liability and are NOT responsible for any misuse or damage caused by this program."),
        Line::from(""),
        Line::from("Press ".bold() + "Enter".bold().yellow() + " to Acknowledge and Continue".bold()),
    ]);

    let block = Block::default()
        .title("Disclaimer")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red));

    let popup_area = centered_rect(70, 80, area);

    let popup = Paragraph::new(disclaimer_text)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    // `Clear` first wipes the popup area so the background UI does not
    // bleed through.
    frame.render_widget(Clear, popup_area);
    frame.render_widget(popup, popup_area);
}

/// Helper to create a centered rectangle for a popup, sized as percentages
/// of the parent area.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
