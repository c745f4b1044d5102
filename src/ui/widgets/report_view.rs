// src/ui/widgets/report_view.rs

use crate::app::{App, AppState, SPINNER_CHARS};
use crate::core::export;
use crate::core::models::{ScanReport, Severity};
use ratatui::{
    prelude::*,
    text::Line,
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, Wrap},
};

fn severity_style(severity: Severity) -> Style {
    match severity {
        Severity::Critical => Style::default().fg(Color::Red).bold(),
        Severity::High => Style::default().fg(Color::Red),
        Severity::Medium => Style::default().fg(Color::Yellow),
        Severity::Low => Style::default().fg(Color::Cyan),
    }
}

fn field(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "N/A",
    }
}

/// Renders the scan report panel.
///
/// Before a scan finishes the panel shows a placeholder or the scanning
/// spinner. Once a report is available it shows every section of the
/// normalized report in order: summary, findings, dependency inventory,
/// time-based check, and the conclusion. The view scrolls vertically and
/// never truncates content.
pub fn render_report_view(frame: &mut Frame, app: &mut App, area: Rect) {
    let main_block = Block::default()
        .borders(Borders::ALL)
        .title("Scan Report (Navigate with ↑ ↓)");

    if !matches!(app.state, AppState::Finished) {
        let content = match app.state {
            AppState::Idle => {
                Paragraph::new("Scan results will appear here...").alignment(Alignment::Center)
            }
            AppState::Scanning => {
                let spinner_char = SPINNER_CHARS[app.spinner_frame];
                Paragraph::new(Line::from(vec![
                    Span::styled(
                        format!("{} ", spinner_char),
                        Style::default().fg(Color::Cyan),
                    ),
                    Span::raw("Scanning... Please wait."),
                ]))
                .alignment(Alignment::Center)
            }
            _ => Paragraph::new(""),
        };
        frame.render_widget(content.block(main_block), area);
        return;
    }

    let inner_area = main_block.inner(area);
    frame.render_widget(main_block, area);

    let Some(report) = &app.scan_report else {
        return;
    };

    let lines = report_lines(report);

    // Clamp the offset so scrolling stops at the last line.
    let max_offset = lines.len().saturating_sub(inner_area.height as usize);
    if app.scroll_offset > max_offset {
        app.scroll_offset = max_offset;
    }
    app.report_scroll_state = app
        .report_scroll_state
        .content_length(lines.len())
        .position(app.scroll_offset);

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((app.scroll_offset as u16, 0));
    frame.render_widget(paragraph, inner_area);

    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
    frame.render_stateful_widget(scrollbar, area, &mut app.report_scroll_state);
}

fn report_lines(report: &ScanReport) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    lines.push(Line::from(
        format!("{} Report", report.scan_kind.title()).bold(),
    ));
    lines.push(Line::from(format!("Scan ID:    {}", report.scan_id)));
    lines.push(Line::from(format!("Target URL: {}", report.target_url)));
    lines.push(Line::from(format!(
        "Scan Date:  {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    )));
    if let Some(note) = &report.note {
        lines.push(Line::from(format!("Note:       {}", note)));
    }

    // A terminal error replaces every other section.
    if let Some(error) = &report.scan_error {
        lines.push(Line::from(""));
        lines.push(Line::from("SCAN ERROR".red().bold()));
        lines.push(Line::from(Span::styled(
            error.clone(),
            Style::default().fg(Color::Red),
        )));
        lines.push(Line::from("No findings are available for this scan."));
        return lines;
    }

    lines.push(Line::from(""));
    lines.push(Line::from("FINDINGS".bold()));
    if report.findings.is_empty() {
        lines.push(Line::from("No findings were reported for this scan."));
    } else {
        lines.push(Line::from(format!(
            "{} vulnerable out of {} tested.",
            report.vulnerable_count(),
            report.tested_count()
        )));
        for (index, entry) in report.findings.iter().enumerate() {
            let f = &entry.finding;
            let c = &entry.classification;
            lines.push(Line::from(""));
            lines.push(Line::from(vec![
                Span::raw(format!("[{}] ", index + 1)),
                Span::raw(field(Some(f.identifier.as_str())).to_string()),
                Span::raw("  "),
                Span::styled(c.severity.to_string(), severity_style(c.severity)),
            ]));
            lines.push(Line::from(format!(
                "    Vulnerable: {}",
                if f.vulnerable { "Yes" } else { "No" }
            )));
            if let Some(payload) = &f.payload {
                lines.push(Line::from(format!("    Payload:    {}", payload)));
            }
            if let Some(status) = f.status_code {
                lines.push(Line::from(format!("    Status:     {}", status)));
            }
            lines.push(Line::from(format!(
                "    Evidence:   {}",
                field(f.evidence.as_deref())
            )));
            lines.push(Line::from(format!("    Mitigation: {}", c.mitigation)));
        }
    }

    if !report.inventory.is_empty() {
        lines.push(Line::from(""));
        lines.push(Line::from("DEPENDENCY INVENTORY (informational)".bold()));
        for item in &report.inventory {
            lines.push(Line::from(format!(
                "- {} {}  {}",
                field(Some(item.library.as_str())),
                field(item.version.as_deref()),
                field(item.description.as_deref())
            )));
        }
    }

    if let Some(tb) = &report.time_based {
        lines.push(Line::from(""));
        lines.push(Line::from("TIME-BASED BLIND CHECK".bold()));
        let (status, style) = if tb.vulnerable {
            ("Vulnerable", Style::default().fg(Color::Red))
        } else {
            ("Not Vulnerable", Style::default().fg(Color::Green))
        };
        lines.push(Line::from(vec![
            Span::raw("Status:   "),
            Span::styled(status, style),
        ]));
        lines.push(Line::from(format!("Payload:  {}", tb.payload)));
        if let Some(evidence) = &tb.evidence {
            lines.push(Line::from(format!("Evidence: {}", evidence)));
        }
        if let Some(note) = &tb.note {
            lines.push(Line::from(format!("Note:     {}", note)));
        }
        if tb.vulnerable {
            lines.push(Line::from(vec![
                Span::raw("Severity: "),
                Span::styled(
                    tb.classification.severity.to_string(),
                    severity_style(tb.classification.severity),
                ),
            ]));
            lines.push(Line::from(format!(
                "Mitigation: {}",
                tb.classification.mitigation
            )));
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from("CONCLUSION".bold()));
    lines.push(Line::from(export::conclusion_sentence(report)));

    lines
}
