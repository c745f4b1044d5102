// src/ui/widgets/mod.rs

// Module declarations for all UI widgets.

pub mod disclaimer_popup; // The legal disclaimer popup shown at startup.
pub mod footer; // The dynamic footer bar with available actions.
pub mod input; // The target URL input field and scan-kind selector.
pub mod log_view; // The toggleable log-tail panel.
pub mod report_view; // The scrollable scan report.
pub mod summary; // The severity breakdown and conclusion badge.
