//! Static classification rule tables, one per scan kind.
//!
//! This module is the data-driven "brain" of the report layer: every severity
//! decision the dashboard makes is written down here as an ordered list of
//! `(needles, severity, mitigation)` rules, evaluated top to bottom with the
//! first match winning. Keeping the tables declarative makes rule order,
//! coverage, and defaults auditable in one place instead of buried in
//! conditionals.

use crate::core::models::Severity;

/// One ordered classification rule: if the lowercased input contains any of
/// the `needles`, the rule fires with its severity and mitigation sentence.
pub struct Rule {
    pub needles: &'static [&'static str],
    pub severity: Severity,
    pub mitigation: &'static str,
}

/// A per-kind rule table plus its fallback classification.
pub struct RuleSet {
    pub rules: &'static [Rule],
    pub default_severity: Severity,
    pub default_mitigation: &'static str,
    /// When true, a finding without execution evidence short-circuits to
    /// `Low` before any payload rule is consulted.
    pub evidence_gated: bool,
}

/// Mitigation used by evidence-gated kinds when the response carried no
/// execution evidence.
pub const NO_EVIDENCE_MITIGATION: &str =
    "No execution evidence was observed in the response; no immediate action required, continue monitoring.";

pub static SQL_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["' or '1'='1", "union select"],
            severity: Severity::High,
            mitigation: "Use parameterized queries and prepared statements to prevent injection.",
        },
        Rule {
            needles: &["sleep", "admin'--"],
            severity: Severity::High,
            mitigation: "Validate and sanitize user input and avoid constructing queries from raw user input.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Implement server-side escaping and filtering for special characters.",
    evidence_gated: false,
};

pub static XSS_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["<script"],
            severity: Severity::High,
            mitigation: "Escape HTML characters and enforce a strict Content Security Policy to block inline scripts.",
        },
        Rule {
            needles: &["onerror", "onload", "onfocus"],
            severity: Severity::High,
            mitigation: "Sanitize attributes and use a Content Security Policy to restrict event handler execution.",
        },
        Rule {
            needles: &["javascript:"],
            severity: Severity::High,
            mitigation: "Filter out 'javascript:' schemes and validate URL inputs.",
        },
        Rule {
            needles: &["<img", "<svg", "<iframe"],
            severity: Severity::High,
            mitigation: "Escape HTML tags and enforce strict input validation.",
        },
        Rule {
            needles: &["alert"],
            severity: Severity::Medium,
            mitigation: "Validate and sanitize all user inputs to prevent script injection.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Implement server-side input sanitization and output encoding.",
    evidence_gated: false,
};

pub static CMD_INJECTION_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["sleep", "ping"],
            severity: Severity::High,
            mitigation: "Implement strict input validation and use parameterized commands.",
        },
        Rule {
            needles: &["id", "whoami", "uname", "%username%"],
            severity: Severity::Critical,
            mitigation: "Sanitize inputs and restrict command execution privileges.",
        },
        Rule {
            needles: &["passwd", "win.ini", "dir", "type"],
            severity: Severity::Critical,
            mitigation: "Block file access through input sanitization and server hardening.",
        },
        Rule {
            needles: &["curl", "powershell"],
            severity: Severity::High,
            mitigation: "Filter external command calls and enforce least privilege.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Validate and sanitize all user inputs to prevent injection.",
    evidence_gated: true,
};

pub static NOSQL_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["sleep", "func"],
            severity: Severity::High,
            mitigation: "Disable server-side JavaScript evaluation and validate query operators.",
        },
        Rule {
            needles: &["$gt", "$ne", "$or"],
            severity: Severity::Critical,
            mitigation: "Apply strict schema validation and reject raw query operators from user input.",
        },
        Rule {
            needles: &["$where", "$eval"],
            severity: Severity::Critical,
            mitigation: "Disable JavaScript execution operators and sanitize all query inputs.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Sanitize user input and apply an allowlist for queryable fields.",
    evidence_gated: true,
};

pub static ACCESS_CONTROL_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["idor"],
            severity: Severity::High,
            mitigation: "Enforce object-level authorization checks on every request.",
        },
        Rule {
            needles: &["forced browsing"],
            severity: Severity::Medium,
            mitigation: "Require authentication and authorization for all sensitive paths.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Apply deny-by-default access control on the server side.",
    evidence_gated: false,
};

pub static CRYPTO_FAILURES_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["does not use https"],
            severity: Severity::High,
            mitigation: "Serve all traffic over HTTPS and redirect plain HTTP requests.",
        },
        Rule {
            needles: &["weak tls"],
            severity: Severity::High,
            mitigation: "Disable TLS versions older than 1.2 and prefer modern cipher suites.",
        },
        Rule {
            needles: &["sensitive data exposure"],
            severity: Severity::Medium,
            mitigation: "Avoid returning sensitive values in responses and encrypt data at rest.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Review the cryptographic configuration against current best practice.",
    evidence_gated: false,
};

pub static SECURITY_MISCONFIG_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["exposed admin panel"],
            severity: Severity::High,
            mitigation: "Restrict admin interfaces to trusted networks and require strong authentication.",
        },
        Rule {
            needles: &["directory listing"],
            severity: Severity::Medium,
            mitigation: "Disable directory listing in the web server configuration.",
        },
        Rule {
            needles: &["missing security header"],
            severity: Severity::Low,
            mitigation: "Add the missing security headers to all responses.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Harden the server configuration and remove unused features.",
    evidence_gated: false,
};

pub static AUTH_FAILURES_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["default credentials"],
            severity: Severity::High,
            mitigation: "Change default credentials immediately and enforce a strong password policy.",
        },
        Rule {
            needles: &["login page found"],
            severity: Severity::Low,
            mitigation: "Rate-limit login attempts and monitor for credential stuffing.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Implement multi-factor authentication and account lockout policies.",
    evidence_gated: false,
};

pub static LOGGING_MONITOR_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["exposed sensitive error message"],
            severity: Severity::Medium,
            mitigation: "Return generic error pages and keep detailed errors in server-side logs only.",
        },
        Rule {
            needles: &["missing security header"],
            severity: Severity::Low,
            mitigation: "Add the missing header and make sure security events are logged.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Centralize application logs and alert on suspicious activity.",
    evidence_gated: false,
};

pub static DEPENDENCY_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["cve", "known vulnerability", "prototype pollution", "xss"],
            severity: Severity::High,
            mitigation: "Upgrade the affected library to a patched release.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Keep third-party dependencies up to date and monitor security advisories.",
    evidence_gated: false,
};

/// SSRF severity rules run over the combined issue and evidence text. The
/// mitigation sentence for SSRF comes from the dedicated recommendation
/// function, not from this table.
pub static SSRF_RULES: RuleSet = RuleSet {
    rules: &[
        Rule {
            needles: &["169.254.169.254", "metadata.google.internal"],
            severity: Severity::Critical,
            mitigation: "Prevent access to cloud metadata services and implement network-level restrictions.",
        },
        Rule {
            needles: &["127.0.0.1", "localhost", "0.0.0.0"],
            severity: Severity::High,
            mitigation: "Block internal IP addresses and implement strict URL whitelisting.",
        },
        Rule {
            needles: &["192.168.", "10.0.", "172.16."],
            severity: Severity::High,
            mitigation: "Restrict private network access and validate redirect URLs against an allowlist.",
        },
        Rule {
            needles: &["file://", "gopher://"],
            severity: Severity::High,
            mitigation: "Restrict URL schemes to HTTP and HTTPS only.",
        },
    ],
    default_severity: Severity::Medium,
    default_mitigation: "Implement strict URL validation and restrict internal network access.",
    evidence_gated: false,
};
