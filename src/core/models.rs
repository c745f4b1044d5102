// src/core/models.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

// --- Scan Kinds ---

/// The vulnerability-check categories supported by the remote SecuriScan engine.
///
/// Each kind has its own raw result shape and classification rule set. The
/// `strum` derives drive the kind selector in the input bar and the labels
/// used in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumIter)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    Sql,
    Xss,
    Csrf,
    DirectoryEnum,
    Dependencies,
    AccessControl,
    CmdInjection,
    Nosql,
    CryptoFailures,
    SecurityMisconfig,
    AuthFailures,
    LoggingMonitor,
    Ssrf,
}

impl ScanKind {
    /// Human-readable title used in report headings.
    pub fn title(&self) -> &'static str {
        match self {
            ScanKind::Sql => "SQL Injection",
            ScanKind::Xss => "Cross-Site Scripting (XSS)",
            ScanKind::Csrf => "CSRF",
            ScanKind::DirectoryEnum => "Directory Enumeration",
            ScanKind::Dependencies => "Dependency Scan",
            ScanKind::AccessControl => "Broken Access Control",
            ScanKind::CmdInjection => "Command Injection",
            ScanKind::Nosql => "NoSQL Injection",
            ScanKind::CryptoFailures => "Cryptographic Failures",
            ScanKind::SecurityMisconfig => "Security Misconfiguration",
            ScanKind::AuthFailures => "Authentication Failures",
            ScanKind::LoggingMonitor => "Logging & Monitoring",
            ScanKind::Ssrf => "SSRF",
        }
    }
}

// --- Severity ---

/// Ordered severity tiers. Variant order matters: `Ord` is derived, and the
/// conclusion tier of a report is the maximum tier among vulnerable findings.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Display,
)]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

/// The single overall risk rating summarizing a whole report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConclusionTier {
    /// No vulnerable finding and no vulnerable time-based test.
    Clean,
    /// The maximum severity among vulnerable findings.
    Flagged(Severity),
}

impl std::fmt::Display for ConclusionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConclusionTier::Clean => write!(f, "Clean"),
            ConclusionTier::Flagged(sev) => write!(f, "{}", sev),
        }
    }
}

// --- Raw Engine Payloads ---

/// One element of a finding collection as the engine reports it.
///
/// The engine is loosely typed: which fields are populated depends on the scan
/// kind (directory enumeration has `status_code` but no `payload`, issue-style
/// kinds have `issue` but no `param`, the dependency inventory has
/// `library`/`version`). Everything is optional so a malformed element
/// degrades instead of failing deserialization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawFinding {
    pub param: Option<String>,
    pub payload: Option<String>,
    #[serde(default)]
    pub vulnerable: bool,
    pub evidence: Option<String>,
    pub url: Option<String>,
    pub status_code: Option<u16>,
    pub method: Option<String>,
    pub issue: Option<String>,
    pub form_action: Option<String>,
    pub library: Option<String>,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// The blind-injection timing probe the engine runs alongside payload tests.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimeBasedTest {
    #[serde(default)]
    pub payload: String,
    #[serde(default)]
    pub vulnerable: bool,
    pub evidence: Option<String>,
    pub note: Option<String>,
}

/// The untyped payload returned by the engine for one scan kind and target.
///
/// The collection field names vary per kind; all are defaulted so any kind's
/// payload deserializes into the same struct. Which collection is consulted
/// for a given kind is a static table in the aggregator, never inferred.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawScanResult {
    pub url: Option<String>,
    pub error: Option<String>,
    pub note: Option<String>,
    #[serde(default)]
    pub vulnerabilities: Vec<RawFinding>,
    #[serde(default)]
    pub sql_vulnerabilities: Vec<RawFinding>,
    #[serde(default)]
    pub vulnerable_params: Vec<RawFinding>,
    #[serde(default)]
    pub vulnerable_directories: Vec<RawFinding>,
    #[serde(default)]
    pub vulnerable_endpoints: Vec<RawFinding>,
    #[serde(default, deserialize_with = "string_or_findings")]
    pub csrf_vulnerabilities: Vec<RawFinding>,
    #[serde(default)]
    pub dependencies: Vec<RawFinding>,
    pub time_based_test: Option<TimeBasedTest>,
}

/// Accepts either a finding list or a bare status string in a collection
/// field. The engine's clean CSRF path answers with a sentence instead of an
/// empty array; the sentence carries no findings, so it maps to an empty
/// collection.
fn string_or_findings<'de, D>(deserializer: D) -> Result<Vec<RawFinding>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum StringOrFindings {
        Text(String),
        Findings(Vec<RawFinding>),
    }

    Ok(match StringOrFindings::deserialize(deserializer)? {
        StringOrFindings::Text(_) => Vec::new(),
        StringOrFindings::Findings(findings) => findings,
    })
}

// --- Normalized Report Model ---

/// One unit of evidence, normalized across all scan kinds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
    /// Parameter name, directory URL, or issue label depending on the kind.
    pub identifier: String,
    pub payload: Option<String>,
    pub vulnerable: bool,
    pub evidence: Option<String>,
    pub status_code: Option<u16>,
    pub method: Option<String>,
}

/// The derived severity/mitigation pair attached to a finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub severity: Severity,
    /// Always a complete human-readable sentence, surfaced verbatim.
    pub mitigation: String,
}

/// A finding together with its classification, in raw-result order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifiedFinding {
    pub finding: Finding,
    pub classification: Classification,
}

/// The classified time-based probe carried on a report when the raw result
/// included a `time_based_test` block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeBasedFinding {
    pub payload: String,
    pub vulnerable: bool,
    pub evidence: Option<String>,
    pub note: Option<String>,
    pub classification: Classification,
}

/// An informational dependency inventory row (dependency-scan kind only).
/// Inventory rows never contribute to vulnerable counts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub library: String,
    pub version: Option<String>,
    pub description: Option<String>,
}

/// The normalized report the renderer and exporter consume.
///
/// Created once per completed (or failed) scan, immutable thereafter, and
/// replaced wholesale by the next accepted scan. Counts and the conclusion
/// tier are computed from the finding list on demand, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    pub scan_id: String,
    pub target_url: String,
    pub scan_kind: ScanKind,
    pub generated_at: DateTime<Utc>,
    pub note: Option<String>,
    /// When set, the report is terminal: views show only this message.
    pub scan_error: Option<String>,
    pub findings: Vec<ClassifiedFinding>,
    pub inventory: Vec<InventoryItem>,
    pub time_based: Option<TimeBasedFinding>,
}

impl ScanReport {
    /// Number of findings the engine flagged as vulnerable.
    pub fn vulnerable_count(&self) -> usize {
        self.findings.iter().filter(|f| f.finding.vulnerable).count()
    }

    /// Total findings the engine tested, vulnerable or not.
    pub fn tested_count(&self) -> usize {
        self.findings.len()
    }

    /// Count of vulnerable findings at a given severity tier.
    pub fn count_at(&self, severity: Severity) -> usize {
        self.findings
            .iter()
            .filter(|f| f.finding.vulnerable && f.classification.severity == severity)
            .count()
    }

    /// The overall risk rating: the maximum severity among vulnerable
    /// findings, compared against the time-based finding when that probe is
    /// itself vulnerable. `Clean` when nothing vulnerable was observed.
    pub fn conclusion_tier(&self) -> ConclusionTier {
        let mut max: Option<Severity> = None;
        for entry in self.findings.iter().filter(|f| f.finding.vulnerable) {
            max = Some(match max {
                Some(current) => current.max(entry.classification.severity),
                None => entry.classification.severity,
            });
        }
        if let Some(tb) = &self.time_based {
            if tb.vulnerable {
                max = Some(match max {
                    Some(current) => current.max(tb.classification.severity),
                    None => tb.classification.severity,
                });
            }
        }
        match max {
            Some(sev) => ConclusionTier::Flagged(sev),
            None => ConclusionTier::Clean,
        }
    }
}
