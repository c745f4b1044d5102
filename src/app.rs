// src/app.rs

use ratatui::widgets::ScrollbarState;
use strum::IntoEnumIterator;
use tracing::{debug, info};

use crate::core::export;
use crate::core::models::{ScanKind, ScanReport};

pub const SPINNER_CHARS: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// How many tail lines of the log file the log panel keeps in memory.
const LOG_TAIL_LINES: usize = 200;

pub enum ExportStatus {
    Idle,
    Success(String),
    Error(String),
}

pub enum AppState {
    Idle,
    Scanning,
    Finished,
}

/// Central application state for the dashboard.
///
/// At most one scan outcome is meaningful at a time: every launched scan gets
/// a fresh generation number, and only the outcome matching the latest
/// generation is accepted. A slow, superseded response can therefore never
/// overwrite the report of a newer request, regardless of arrival order.
pub struct App {
    pub should_quit: bool,
    pub state: AppState,
    pub input: String,
    pub kind_index: usize,
    pub scan_report: Option<ScanReport>,
    pub scan_generation: u64,
    pub show_disclaimer: bool,
    pub show_logs: bool,
    pub log_content: Vec<String>,
    pub scroll_offset: usize,
    pub report_scroll_state: ScrollbarState,
    pub export_status: ExportStatus,
    pub spinner_frame: usize,
}

impl App {
    pub fn new() -> Self {
        Self {
            should_quit: false,
            state: AppState::Idle,
            input: String::new(),
            kind_index: 0,
            scan_report: None,
            scan_generation: 0,
            show_disclaimer: true,
            show_logs: false,
            log_content: Vec::new(),
            scroll_offset: 0,
            report_scroll_state: ScrollbarState::default(),
            export_status: ExportStatus::Idle,
            spinner_frame: 0,
        }
    }

    /// The scan kind currently selected in the input bar.
    pub fn selected_kind(&self) -> ScanKind {
        ScanKind::iter()
            .nth(self.kind_index)
            .unwrap_or(ScanKind::Sql)
    }

    pub fn next_kind(&mut self) {
        self.kind_index = (self.kind_index + 1) % ScanKind::iter().count();
    }

    pub fn previous_kind(&mut self) {
        let count = ScanKind::iter().count();
        self.kind_index = (self.kind_index + count - 1) % count;
    }

    /// Registers a new scan and returns its generation number. Any outcome
    /// carrying an older generation is stale from this point on.
    pub fn begin_scan(&mut self) -> u64 {
        self.scan_generation += 1;
        self.state = AppState::Scanning;
        self.export_status = ExportStatus::Idle;
        info!(generation = self.scan_generation, "Scan launched.");
        self.scan_generation
    }

    /// Accepts a finished scan outcome if it belongs to the latest launched
    /// scan; stale outcomes are discarded. Returns whether it was accepted.
    pub fn accept_report(&mut self, generation: u64, report: ScanReport) -> bool {
        if generation != self.scan_generation {
            debug!(
                generation,
                latest = self.scan_generation,
                "Discarding stale scan outcome."
            );
            return false;
        }
        self.scan_report = Some(report);
        self.state = AppState::Finished;
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::default();
        true
    }

    pub fn scroll_up(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_sub(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    pub fn scroll_down(&mut self) {
        self.scroll_offset = self.scroll_offset.saturating_add(1);
        self.report_scroll_state = self.report_scroll_state.position(self.scroll_offset);
    }

    /// Writes the current report as a paginated document into the working
    /// directory and records the outcome for the footer.
    pub fn export_report(&mut self) {
        let Some(report) = &self.scan_report else {
            self.export_status = ExportStatus::Error("No report to export.".to_string());
            return;
        };
        match export::export_to_file(report, std::path::Path::new(".")) {
            Ok(path) => {
                self.export_status = ExportStatus::Success(format!("Saved {}", path.display()));
            }
            Err(e) => {
                self.export_status = ExportStatus::Error(format!("Export failed: {}", e));
            }
        }
    }

    /// Refreshes the tail of the log file shown in the log panel.
    pub fn update_logs(&mut self) {
        let path = crate::logging::log_file_path();
        if let Ok(content) = std::fs::read_to_string(path) {
            let lines: Vec<String> = content.lines().map(str::to_string).collect();
            let skip = lines.len().saturating_sub(LOG_TAIL_LINES);
            self.log_content = lines[skip..].to_vec();
        }
    }

    pub fn on_tick(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_CHARS.len();
        if self.show_logs {
            self.update_logs();
        }
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn reset(&mut self) {
        self.state = AppState::Idle;
        self.input = String::new();
        self.scan_report = None;
        self.scroll_offset = 0;
        self.report_scroll_state = ScrollbarState::default();
        self.export_status = ExportStatus::Idle;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report;

    fn report_for(url: &str) -> ScanReport {
        report::build_error(ScanKind::Sql, url, "unreachable".to_string())
    }

    #[test]
    fn latest_generation_wins_regardless_of_arrival_order() {
        let mut app = App::new();
        let first = app.begin_scan();
        let second = app.begin_scan();

        // The newer scan's outcome arrives first and is accepted.
        assert!(app.accept_report(second, report_for("http://second.example")));
        // The older scan's outcome straggles in afterwards and is discarded.
        assert!(!app.accept_report(first, report_for("http://first.example")));

        let kept = app.scan_report.expect("a report was accepted");
        assert_eq!(kept.target_url, "http://second.example");
    }

    #[test]
    fn stale_outcome_never_finishes_a_pending_scan() {
        let mut app = App::new();
        let first = app.begin_scan();
        let _second = app.begin_scan();

        assert!(!app.accept_report(first, report_for("http://first.example")));
        assert!(app.scan_report.is_none());
        assert!(matches!(app.state, AppState::Scanning));
    }

    #[test]
    fn kind_selection_cycles_in_both_directions() {
        let mut app = App::new();
        let count = ScanKind::iter().count();
        assert_eq!(app.selected_kind(), ScanKind::Sql);
        app.previous_kind();
        assert_eq!(app.kind_index, count - 1);
        app.next_kind();
        assert_eq!(app.selected_kind(), ScanKind::Sql);
    }

    #[test]
    fn reset_clears_the_report_but_keeps_the_generation_counter() {
        let mut app = App::new();
        let generation = app.begin_scan();
        assert!(app.accept_report(generation, report_for("http://example.com")));
        app.reset();
        assert!(app.scan_report.is_none());
        // A response from before the reset must still be recognized as stale.
        assert_eq!(app.scan_generation, generation);
    }
}
