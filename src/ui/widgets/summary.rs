// src/ui/widgets/summary.rs

use crate::app::{App, AppState, ExportStatus};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Paragraph},
};

use crate::core::models::{ConclusionTier, Severity};

/// Renders the summary widget: the conclusion badge, the severity breakdown
/// of vulnerable findings, and the export status line. Content appears only
/// once the scan has finished.
pub fn render_summary(frame: &mut Frame, app: &App, area: Rect) {
    let summary_container = Block::default().borders(Borders::ALL).title("Summary");
    frame.render_widget(summary_container, area);

    let summary_chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3), // Conclusion badge
            Constraint::Length(1), // Spacer
            Constraint::Length(6), // Severity breakdown
            Constraint::Length(1), // Spacer
            Constraint::Length(2), // Counts
            Constraint::Min(0),    // Export status
        ])
        .split(area);

    if !matches!(app.state, AppState::Finished) {
        return;
    }
    let Some(report) = &app.scan_report else {
        return;
    };

    // A terminal error report has no conclusion or breakdown to show.
    if report.scan_error.is_some() {
        let badge = Text::from(vec![
            Line::from("Conclusion".bold()),
            Line::from("SCAN FAILED").style(Style::default().fg(Color::Red)),
        ]);
        frame.render_widget(
            Paragraph::new(badge).alignment(Alignment::Center),
            summary_chunks[0],
        );
        return;
    }

    // --- Conclusion Badge ---
    let (badge_text, badge_style) = match report.conclusion_tier() {
        ConclusionTier::Clean => ("CLEAN".to_string(), Style::default().fg(Color::Green)),
        ConclusionTier::Flagged(severity) => {
            let style = match severity {
                Severity::Critical => Style::default().fg(Color::Red).bold(),
                Severity::High => Style::default().fg(Color::Red),
                Severity::Medium => Style::default().fg(Color::Yellow),
                Severity::Low => Style::default().fg(Color::Cyan),
            };
            (format!("FLAGGED: {}", severity).to_uppercase(), style)
        }
    };
    let badge = Text::from(vec![
        Line::from("Conclusion".bold()),
        Line::from(badge_text).style(badge_style),
    ]);
    frame.render_widget(
        Paragraph::new(badge).alignment(Alignment::Center),
        summary_chunks[0],
    );

    // --- Severity Breakdown ---
    let breakdown_block = Block::default().title("SEVERITY BREAKDOWN".bold());
    let rows = [
        ("Critical", Severity::Critical, Color::Red),
        ("High", Severity::High, Color::Red),
        ("Medium", Severity::Medium, Color::Yellow),
        ("Low", Severity::Low, Color::Cyan),
    ];
    let mut breakdown_lines = Vec::new();
    for (name, severity, color) in rows {
        breakdown_lines.push(Line::from(vec![
            Span::raw(format!("{:<9}", name)),
            Span::styled(
                report.count_at(severity).to_string(),
                Style::default().fg(color),
            ),
        ]));
    }
    frame.render_widget(
        Paragraph::new(breakdown_lines).block(breakdown_block),
        summary_chunks[2],
    );

    // --- Counts ---
    let counts = Text::from(vec![
        Line::from(vec![
            Span::raw("Vulnerable: "),
            Span::styled(
                report.vulnerable_count().to_string(),
                Style::default().fg(Color::Red),
            ),
        ]),
        Line::from(format!("Tested:     {}", report.tested_count())),
    ]);
    frame.render_widget(Paragraph::new(counts), summary_chunks[4]);

    // --- Export Status ---
    let export_line = match &app.export_status {
        ExportStatus::Idle => Line::from("Press [E] to export.".dark_gray()),
        ExportStatus::Success(msg) => Line::from(msg.clone().green()),
        ExportStatus::Error(msg) => Line::from(msg.clone().red()),
    };
    frame.render_widget(Paragraph::new(export_line), summary_chunks[5]);
}
