// src/core/report.rs

//! Builds normalized `ScanReport` values out of raw engine payloads.
//!
//! The aggregator owns the static kind-to-collection mapping (which finding
//! collection inside a raw result belongs to which scan kind) and the
//! per-kind normalization into the uniform `Finding` shape. Classification
//! is delegated to the classifier; counts and the conclusion tier are
//! computed on the report itself.

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::core::classifier;
use crate::core::client::ScanError;
use crate::core::models::{
    ClassifiedFinding, Finding, InventoryItem, RawFinding, RawScanResult, ScanKind, ScanReport,
    TimeBasedFinding,
};

/// Locates the kind-appropriate finding collection within a raw result.
///
/// This is a static table mirroring the engine's per-kind payload shapes; the
/// field name is never inferred from the payload itself. The dependency kind
/// is special-cased in [`build`]: its `dependencies` collection is
/// informational inventory, and only its `vulnerabilities` collection feeds
/// the findings list.
fn collection<'a>(kind: ScanKind, raw: &'a RawScanResult) -> &'a [RawFinding] {
    match kind {
        ScanKind::Sql => &raw.sql_vulnerabilities,
        ScanKind::Xss | ScanKind::CmdInjection | ScanKind::Nosql => &raw.vulnerable_params,
        ScanKind::Csrf => &raw.csrf_vulnerabilities,
        ScanKind::DirectoryEnum => &raw.vulnerable_directories,
        ScanKind::AccessControl => &raw.vulnerable_endpoints,
        ScanKind::Dependencies
        | ScanKind::CryptoFailures
        | ScanKind::SecurityMisconfig
        | ScanKind::AuthFailures
        | ScanKind::LoggingMonitor
        | ScanKind::Ssrf => &raw.vulnerabilities,
    }
}

/// Normalizes one raw collection element into the uniform finding shape.
///
/// Identifier selection is per kind: parameter name for payload-style kinds,
/// directory URL for enumeration, issue label for issue-style kinds, library
/// name for dependency vulnerabilities. Missing fields degrade to `None` or
/// an empty identifier; the views render those as "N/A".
fn normalize(kind: ScanKind, rf: &RawFinding) -> Finding {
    match kind {
        ScanKind::Sql | ScanKind::Xss | ScanKind::CmdInjection | ScanKind::Nosql => Finding {
            identifier: rf.param.clone().unwrap_or_default(),
            payload: rf.payload.clone(),
            vulnerable: rf.vulnerable,
            evidence: rf.evidence.clone(),
            status_code: rf.status_code,
            method: rf.method.clone(),
        },
        // CSRF form findings identify by the form's action target; header
        // findings carry only an issue label.
        ScanKind::Csrf => Finding {
            identifier: rf
                .form_action
                .clone()
                .or_else(|| rf.issue.clone())
                .or_else(|| rf.url.clone())
                .unwrap_or_default(),
            payload: rf.payload.clone(),
            vulnerable: rf.vulnerable,
            evidence: rf.evidence.clone(),
            status_code: rf.status_code,
            method: rf.method.clone(),
        },
        ScanKind::DirectoryEnum => Finding {
            identifier: rf.url.clone().unwrap_or_default(),
            payload: None,
            // Presence in the detected-directories collection is the signal;
            // the engine reports no per-item flag here.
            vulnerable: true,
            evidence: rf.evidence.clone(),
            status_code: rf.status_code,
            method: None,
        },
        ScanKind::Dependencies => Finding {
            identifier: rf
                .library
                .clone()
                .or_else(|| rf.issue.clone())
                .unwrap_or_default(),
            payload: rf.version.clone(),
            vulnerable: true,
            evidence: rf.evidence.clone().or_else(|| rf.description.clone()),
            status_code: None,
            method: None,
        },
        ScanKind::AccessControl
        | ScanKind::CryptoFailures
        | ScanKind::SecurityMisconfig
        | ScanKind::AuthFailures
        | ScanKind::LoggingMonitor
        | ScanKind::Ssrf => Finding {
            identifier: rf.issue.clone().unwrap_or_default(),
            payload: rf.payload.clone(),
            // Issue-style collections only carry actual findings.
            vulnerable: true,
            evidence: rf.evidence.clone().or_else(|| rf.url.clone()),
            status_code: rf.status_code,
            method: rf.method.clone(),
        },
    }
}

/// Builds a terminal error report: no findings, no classification, only the
/// user-facing message. Views render nothing but the error for these.
pub fn build_error(kind: ScanKind, target_url: &str, message: String) -> ScanReport {
    warn!(kind = %kind, target = target_url, error = %message, "Building terminal error report.");
    let generated_at = Utc::now();
    ScanReport {
        scan_id: format!("SCAN-{}", generated_at.timestamp_millis()),
        target_url: target_url.to_string(),
        scan_kind: kind,
        generated_at,
        note: None,
        scan_error: Some(message),
        findings: Vec::new(),
        inventory: Vec::new(),
        time_based: None,
    }
}

/// Builds a normalized report from a raw engine payload.
///
/// If the engine reported an upstream error, the result is a terminal error
/// report identical in shape to a transport failure. Otherwise the
/// kind-appropriate collection is extracted, each element classified in
/// insertion order, and the optional time-based probe classified alongside.
pub fn build(kind: ScanKind, target_url: &str, raw: &RawScanResult) -> ScanReport {
    if let Some(error) = &raw.error {
        return build_error(kind, target_url, error.clone());
    }

    let generated_at = Utc::now();
    let url = raw.url.clone().unwrap_or_else(|| target_url.to_string());

    let findings: Vec<ClassifiedFinding> = collection(kind, raw)
        .iter()
        .map(|rf| {
            let finding = normalize(kind, rf);
            let classification = classifier::classify(kind, &finding);
            ClassifiedFinding {
                finding,
                classification,
            }
        })
        .collect();

    // Dependency scans also surface the full script inventory, which is
    // informational only and never counted as vulnerable.
    let inventory: Vec<InventoryItem> = if kind == ScanKind::Dependencies {
        raw.dependencies
            .iter()
            .map(|rf| InventoryItem {
                library: rf
                    .library
                    .clone()
                    .or_else(|| rf.url.clone())
                    .unwrap_or_default(),
                version: rf.version.clone(),
                description: rf.description.clone(),
            })
            .collect()
    } else {
        Vec::new()
    };

    let time_based = raw.time_based_test.as_ref().map(|tb| {
        let classification =
            classifier::classify_text(kind, &tb.payload, tb.evidence.as_deref());
        TimeBasedFinding {
            payload: tb.payload.clone(),
            vulnerable: tb.vulnerable,
            evidence: tb.evidence.clone(),
            note: tb.note.clone(),
            classification,
        }
    });

    debug!(
        kind = %kind,
        findings = findings.len(),
        inventory = inventory.len(),
        "Aggregated raw result into report."
    );

    let report = ScanReport {
        scan_id: format!("SCAN-{}", generated_at.timestamp_millis()),
        target_url: url,
        scan_kind: kind,
        generated_at,
        note: raw.note.clone(),
        scan_error: None,
        findings,
        inventory,
        time_based,
    };
    info!(
        kind = %kind,
        vulnerable = report.vulnerable_count(),
        tier = %report.conclusion_tier(),
        "Report ready."
    );
    report
}

/// Converts a client outcome into a report, mapping transport failures to
/// terminal error reports so nothing past this boundary sees a `ScanError`.
pub fn from_outcome(
    kind: ScanKind,
    target_url: &str,
    outcome: Result<RawScanResult, ScanError>,
) -> ScanReport {
    match outcome {
        Ok(raw) => build(kind, target_url, &raw),
        Err(err) => build_error(kind, target_url, err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{ConclusionTier, Severity, TimeBasedTest};

    fn param_finding(param: &str, payload: &str, vulnerable: bool, evidence: Option<&str>) -> RawFinding {
        RawFinding {
            param: Some(param.to_string()),
            payload: Some(payload.to_string()),
            vulnerable,
            evidence: evidence.map(str::to_string),
            ..RawFinding::default()
        }
    }

    #[test]
    fn upstream_error_short_circuits_to_terminal_report() {
        let raw = RawScanResult {
            error: Some("timeout".to_string()),
            sql_vulnerabilities: vec![param_finding("id", "' OR '1'='1", true, None)],
            ..RawScanResult::default()
        };
        let report = build(ScanKind::Sql, "http://example.com", &raw);
        assert_eq!(report.scan_error.as_deref(), Some("timeout"));
        assert!(report.findings.is_empty());
        assert_eq!(report.vulnerable_count(), 0);
    }

    #[test]
    fn client_failure_becomes_terminal_report() {
        let report = from_outcome(
            ScanKind::Xss,
            "http://example.com",
            Err(ScanError::Status(502)),
        );
        assert!(report.scan_error.as_deref().unwrap_or("").contains("502"));
        assert!(report.findings.is_empty());
    }

    #[test]
    fn findings_keep_raw_result_order() {
        let raw = RawScanResult {
            url: Some("http://example.com".to_string()),
            sql_vulnerabilities: vec![
                param_finding("a", "p1", false, None),
                param_finding("b", "p2", true, Some("sql error")),
                param_finding("c", "p3", false, None),
            ],
            ..RawScanResult::default()
        };
        let report = build(ScanKind::Sql, "http://example.com", &raw);
        let order: Vec<&str> = report
            .findings
            .iter()
            .map(|f| f.finding.identifier.as_str())
            .collect();
        assert_eq!(order, vec!["a", "b", "c"]);
        assert_eq!(report.vulnerable_count(), 1);
    }

    #[test]
    fn aggregation_is_idempotent_apart_from_id_and_timestamp() {
        let raw = RawScanResult {
            url: Some("http://example.com".to_string()),
            vulnerable_params: vec![
                param_finding("q", "<script>alert(1)</script>", true, Some("reflected")),
                param_finding("page", "plain", false, None),
            ],
            time_based_test: Some(TimeBasedTest {
                payload: "sleep".to_string(),
                vulnerable: true,
                evidence: Some("delay".to_string()),
                note: None,
            }),
            ..RawScanResult::default()
        };
        let a = build(ScanKind::Xss, "http://example.com", &raw);
        let b = build(ScanKind::Xss, "http://example.com", &raw);
        assert_eq!(a.findings, b.findings);
        assert_eq!(a.vulnerable_count(), b.vulnerable_count());
        assert_eq!(a.conclusion_tier(), b.conclusion_tier());
        assert_eq!(a.time_based, b.time_based);
    }

    #[test]
    fn dependency_inventory_never_counts_as_vulnerable() {
        let raw = RawScanResult {
            url: Some("http://example.com".to_string()),
            dependencies: vec![
                RawFinding {
                    library: Some("jquery".to_string()),
                    version: Some("3.3.1".to_string()),
                    description: Some("No known vulnerability in local database".to_string()),
                    ..RawFinding::default()
                },
                RawFinding {
                    library: Some("vendor.js".to_string()),
                    description: Some("Unknown or untracked script".to_string()),
                    ..RawFinding::default()
                },
            ],
            vulnerabilities: vec![RawFinding {
                library: Some("jquery".to_string()),
                version: Some("1.12.4".to_string()),
                description: Some("Known vulnerability: XSS in html()".to_string()),
                ..RawFinding::default()
            }],
            ..RawScanResult::default()
        };
        let report = build(ScanKind::Dependencies, "http://example.com", &raw);
        assert_eq!(report.inventory.len(), 2);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(report.vulnerable_count(), 1);
        assert_eq!(
            report.conclusion_tier(),
            ConclusionTier::Flagged(Severity::High)
        );
    }

    #[test]
    fn directory_entries_are_classified_by_status_code() {
        let raw = RawScanResult {
            url: Some("http://example.com".to_string()),
            vulnerable_directories: vec![
                RawFinding {
                    url: Some("http://example.com/backup/".to_string()),
                    status_code: Some(403),
                    ..RawFinding::default()
                },
                RawFinding {
                    url: Some("http://example.com/cgi-bin/".to_string()),
                    status_code: Some(500),
                    ..RawFinding::default()
                },
            ],
            ..RawScanResult::default()
        };
        let report = build(ScanKind::DirectoryEnum, "http://example.com", &raw);
        assert_eq!(report.findings[0].classification.severity, Severity::Medium);
        assert_eq!(report.findings[1].classification.severity, Severity::Critical);
        assert_eq!(
            report.conclusion_tier(),
            ConclusionTier::Flagged(Severity::Critical)
        );
    }

    #[test]
    fn csrf_findings_identify_by_form_action_or_issue() {
        let raw = RawScanResult {
            url: Some("http://example.com".to_string()),
            csrf_vulnerabilities: vec![
                RawFinding {
                    form_action: Some("/transfer".to_string()),
                    method: Some("POST".to_string()),
                    vulnerable: true,
                    ..RawFinding::default()
                },
                RawFinding {
                    issue: Some("Missing SameSite cookie attribute".to_string()),
                    vulnerable: true,
                    ..RawFinding::default()
                },
            ],
            ..RawScanResult::default()
        };
        let report = build(ScanKind::Csrf, "http://example.com", &raw);
        assert_eq!(report.findings[0].finding.identifier, "/transfer");
        assert_eq!(report.findings[0].classification.severity, Severity::High);
        assert_eq!(
            report.findings[1].finding.identifier,
            "Missing SameSite cookie attribute"
        );
    }

    #[test]
    fn clean_result_yields_clean_conclusion() {
        let raw = RawScanResult {
            url: Some("http://example.com".to_string()),
            vulnerable_params: vec![param_finding("id", "' OR '1'='1", false, None)],
            time_based_test: Some(TimeBasedTest {
                payload: "sleep".to_string(),
                vulnerable: false,
                evidence: None,
                note: None,
            }),
            ..RawScanResult::default()
        };
        let report = build(ScanKind::CmdInjection, "http://example.com", &raw);
        assert_eq!(report.vulnerable_count(), 0);
        assert_eq!(report.conclusion_tier(), ConclusionTier::Clean);
    }

    #[test]
    fn malformed_elements_still_produce_findings() {
        let raw = RawScanResult {
            url: Some("http://example.com".to_string()),
            vulnerable_params: vec![RawFinding::default()],
            ..RawScanResult::default()
        };
        let report = build(ScanKind::Nosql, "http://example.com", &raw);
        assert_eq!(report.findings.len(), 1);
        // No evidence: gated to Low, never an error.
        assert_eq!(report.findings[0].classification.severity, Severity::Low);
    }
}
