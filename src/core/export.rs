// src/core/export.rs

//! Serializes a `ScanReport` into a portable paginated plain-text document.
//!
//! The document carries a title, the summary block, one row per finding
//! (identifier, severity, vulnerable flag, evidence, mitigation), the
//! dependency inventory when present, the time-based section, and the
//! conclusion. Content completeness is the hard requirement: a page that
//! fills up starts a new page instead of truncating.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::core::models::{ConclusionTier, ScanReport, Severity};

/// Body lines per page, excluding the per-page header.
const PAGE_LINES: usize = 48;
/// Maximum characters per line before wrapping.
const PAGE_WIDTH: usize = 78;

/// Accumulates wrapped lines into fixed-size pages, stamping a header with
/// the report title and page number at the top of every page.
struct Paginator {
    title: String,
    pages: Vec<Vec<String>>,
    current: Vec<String>,
}

impl Paginator {
    fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            pages: Vec::new(),
            current: Vec::new(),
        }
    }

    fn push(&mut self, line: &str) {
        for wrapped in wrap_line(line, PAGE_WIDTH) {
            if self.current.len() >= PAGE_LINES {
                self.pages.push(std::mem::take(&mut self.current));
            }
            self.current.push(wrapped);
        }
    }

    fn push_blank(&mut self) {
        // A blank line at the top of a fresh page would be dead space.
        if !self.current.is_empty() {
            self.push("");
        }
    }

    fn finish(mut self) -> Vec<u8> {
        if !self.current.is_empty() {
            self.pages.push(self.current);
        }
        let total = self.pages.len().max(1);
        let mut out = String::new();
        for (index, page) in self.pages.iter().enumerate() {
            out.push_str(&format!("{} - Page {}/{}\n", self.title, index + 1, total));
            out.push_str(&format!("{}\n", "=".repeat(PAGE_WIDTH)));
            for line in page {
                out.push_str(line);
                out.push('\n');
            }
            if index + 1 < total {
                out.push('\x0C'); // form feed between pages
            }
        }
        out.into_bytes()
    }
}

/// Splits a line into chunks no wider than `max`, preserving empty lines.
fn wrap_line(line: &str, max: usize) -> Vec<String> {
    if line.chars().count() <= max {
        return vec![line.to_string()];
    }
    let chars: Vec<char> = line.chars().collect();
    chars
        .chunks(max)
        .map(|chunk| chunk.iter().collect())
        .collect()
}

fn placeholder(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => "N/A",
    }
}

/// The conclusion sentence shared by the on-screen view and the export:
/// reassuring when clean, with urgency proportional to the tier otherwise.
pub fn conclusion_sentence(report: &ScanReport) -> String {
    match report.conclusion_tier() {
        ConclusionTier::Clean => format!(
            "The target appears free of the {} issues tested. Periodic scanning is still recommended.",
            report.scan_kind.title()
        ),
        ConclusionTier::Flagged(severity) => {
            let urgency = match severity {
                Severity::Low => "Review the low-risk observations at your convenience.",
                Severity::Medium => "Remediation is recommended.",
                Severity::High => "Immediate remediation is recommended.",
                Severity::Critical => "Urgent remediation is required.",
            };
            format!(
                "This scan identified {} potential vulnerability(ies) with an overall rating of {}. {}",
                report.vulnerable_count(),
                severity,
                urgency
            )
        }
    }
}

/// Renders the full paginated document for a report.
pub fn render_document(report: &ScanReport) -> Vec<u8> {
    let mut doc = Paginator::new("SecuriScan Security Report");

    doc.push(&format!("{} Report", report.scan_kind.title()));
    doc.push_blank();
    doc.push("1. Scan Summary");
    doc.push(&format!("   Scan ID:     {}", report.scan_id));
    doc.push(&format!("   Target URL:  {}", report.target_url));
    doc.push(&format!(
        "   Scan Date:   {}",
        report.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    doc.push("   Generated By: SecuriScan Automated Security Scanner");
    if let Some(note) = &report.note {
        doc.push(&format!("   Note:        {}", note));
    }

    // A terminal error collapses the document to the message alone.
    if let Some(error) = &report.scan_error {
        doc.push_blank();
        doc.push("2. Scan Error");
        doc.push(&format!("   {}", error));
        doc.push("   No findings are available for this scan.");
        return doc.finish();
    }

    doc.push_blank();
    doc.push("2. Identified Findings");
    if report.findings.is_empty() {
        doc.push("   No findings were reported for this scan.");
    } else {
        doc.push(&format!(
            "   {} vulnerable out of {} tested.",
            report.vulnerable_count(),
            report.tested_count()
        ));
        for (index, entry) in report.findings.iter().enumerate() {
            let f = &entry.finding;
            let c = &entry.classification;
            doc.push_blank();
            doc.push(&format!(
                "   [{}] {}  ({})",
                index + 1,
                placeholder(Some(f.identifier.as_str())),
                c.severity
            ));
            doc.push(&format!(
                "       Vulnerable: {}",
                if f.vulnerable { "Yes" } else { "No" }
            ));
            if let Some(payload) = &f.payload {
                doc.push(&format!("       Payload:    {}", payload));
            }
            if let Some(status) = f.status_code {
                doc.push(&format!("       Status:     {}", status));
            }
            doc.push(&format!(
                "       Evidence:   {}",
                placeholder(f.evidence.as_deref())
            ));
            doc.push(&format!("       Mitigation: {}", c.mitigation));
        }
    }

    if !report.inventory.is_empty() {
        doc.push_blank();
        doc.push("3. Dependency Inventory (informational)");
        for item in &report.inventory {
            doc.push(&format!(
                "   - {} {}  {}",
                placeholder(Some(item.library.as_str())),
                placeholder(item.version.as_deref()),
                placeholder(item.description.as_deref())
            ));
        }
    }

    if let Some(tb) = &report.time_based {
        doc.push_blank();
        doc.push("4. Time-Based Blind Check");
        doc.push(&format!(
            "   Status:   {}",
            if tb.vulnerable { "Vulnerable" } else { "Not Vulnerable" }
        ));
        doc.push(&format!("   Payload:  {}", tb.payload));
        if let Some(evidence) = &tb.evidence {
            doc.push(&format!("   Evidence: {}", evidence));
        }
        if let Some(note) = &tb.note {
            doc.push(&format!("   Note:     {}", note));
        }
        if tb.vulnerable {
            doc.push(&format!("   Severity: {}", tb.classification.severity));
            doc.push(&format!("   Mitigation: {}", tb.classification.mitigation));
        }
    }

    doc.push_blank();
    doc.push("5. Scan Conclusion");
    doc.push(&format!("   {}", conclusion_sentence(report)));

    doc.finish()
}

/// Writes the document next to `dir` as `securiscan_report_<scan_id>.txt`
/// and returns the path.
pub fn export_to_file(report: &ScanReport, dir: &Path) -> std::io::Result<PathBuf> {
    let filename = format!(
        "securiscan_report_{}.txt",
        report.scan_id.to_lowercase().replace('-', "_")
    );
    let path = dir.join(filename);
    std::fs::write(&path, render_document(report))?;
    info!(path = %path.display(), "Report exported.");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{
        Classification, ClassifiedFinding, Finding, ScanKind, TimeBasedFinding,
    };
    use chrono::Utc;

    fn entry(identifier: &str, vulnerable: bool) -> ClassifiedFinding {
        ClassifiedFinding {
            finding: Finding {
                identifier: identifier.to_string(),
                payload: Some("payload".to_string()),
                vulnerable,
                evidence: None,
                status_code: None,
                method: None,
            },
            classification: Classification {
                severity: Severity::High,
                mitigation: "Use parameterized queries.".to_string(),
            },
        }
    }

    fn report(findings: Vec<ClassifiedFinding>) -> ScanReport {
        ScanReport {
            scan_id: "SCAN-1700000000000".to_string(),
            target_url: "http://example.com".to_string(),
            scan_kind: ScanKind::Sql,
            generated_at: Utc::now(),
            note: None,
            scan_error: None,
            findings,
            inventory: Vec::new(),
            time_based: None,
        }
    }

    fn as_text(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).expect("document is UTF-8")
    }

    #[test]
    fn document_contains_title_summary_and_every_finding() {
        let doc = as_text(render_document(&report(vec![
            entry("id", true),
            entry("user", false),
            entry("q", true),
        ])));
        assert!(doc.contains("SecuriScan Security Report"));
        assert!(doc.contains("SCAN-1700000000000"));
        assert!(doc.contains("http://example.com"));
        assert!(doc.contains("[1] id"));
        assert!(doc.contains("[2] user"));
        assert!(doc.contains("[3] q"));
        assert!(doc.contains("2 vulnerable out of 3 tested."));
    }

    #[test]
    fn overflow_starts_a_new_page_without_dropping_content() {
        let findings: Vec<ClassifiedFinding> =
            (0..60).map(|i| entry(&format!("param{}", i), true)).collect();
        let doc = as_text(render_document(&report(findings)));
        assert!(doc.contains("Page 1/"));
        assert!(doc.contains("Page 2/"));
        for i in 0..60 {
            assert!(doc.contains(&format!("param{}", i)), "missing param{}", i);
        }
    }

    #[test]
    fn error_report_renders_only_the_error() {
        let mut r = report(vec![entry("id", true)]);
        r.scan_error = Some("Scan engine returned HTTP status 500".to_string());
        r.findings.clear();
        let doc = as_text(render_document(&r));
        assert!(doc.contains("Scan engine returned HTTP status 500"));
        assert!(!doc.contains("Identified Findings"));
        assert!(!doc.contains("Scan Conclusion"));
    }

    #[test]
    fn clean_report_gets_a_reassuring_conclusion() {
        let doc = as_text(render_document(&report(vec![entry("id", false)])));
        assert!(doc.contains("appears free of the SQL Injection issues tested"));
    }

    #[test]
    fn time_based_section_is_rendered_when_present() {
        let mut r = report(Vec::new());
        r.time_based = Some(TimeBasedFinding {
            payload: "' OR IF(1=1, SLEEP(5), 0) --".to_string(),
            vulnerable: true,
            evidence: Some("Significant response delay".to_string()),
            note: None,
            classification: Classification {
                severity: Severity::High,
                mitigation: "Use parameterized queries.".to_string(),
            },
        });
        let doc = as_text(render_document(&r));
        assert!(doc.contains("Time-Based Blind Check"));
        assert!(doc.contains("Significant response delay"));
        // Any vulnerable observation flips the conclusion away from clean.
        assert!(doc.contains("Immediate remediation is recommended."));
    }

    #[test]
    fn missing_fields_are_rendered_as_placeholders() {
        let mut e = entry("", true);
        e.finding.payload = None;
        e.finding.evidence = None;
        let doc = as_text(render_document(&report(vec![e])));
        assert!(doc.contains("[1] N/A"));
        assert!(doc.contains("Evidence:   N/A"));
    }

    #[test]
    fn long_lines_are_wrapped_not_lost() {
        let mut e = entry("id", true);
        e.finding.evidence = Some("z".repeat(300));
        let doc = as_text(render_document(&report(vec![e])));
        let longest = doc.lines().map(|l| l.chars().count()).max().unwrap_or(0);
        assert!(longest <= PAGE_WIDTH);
        assert_eq!(doc.matches('z').count(), 300);
    }
}
