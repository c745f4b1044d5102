// src/core/client.rs

use tracing::{debug, error, info};

use crate::core::models::{RawScanResult, ScanKind};

/// Where the SecuriScan engine listens when run alongside the dashboard.
pub const DEFAULT_ENGINE_URL: &str = "http://127.0.0.1:5001";

/// A failed round trip to the scanning engine: connection failure, non-2xx
/// status, or a body that is not valid JSON. Carries a message fit for the
/// error report the aggregator builds from it; never propagated past the
/// aggregation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    Transport(String),
    Status(u16),
    Decode(String),
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::Transport(msg) => write!(f, "Request to scan engine failed: {}", msg),
            ScanError::Status(code) => write!(f, "Scan engine returned HTTP status {}", code),
            ScanError::Decode(msg) => write!(f, "Scan engine returned an unreadable response: {}", msg),
        }
    }
}

impl std::error::Error for ScanError {}

/// Maps a scan-kind name to the engine's endpoint name.
///
/// The table mirrors the engine's route registry and must stay in sync with
/// it. Names without an entry pass through unchanged.
pub fn endpoint_name(kind: &str) -> &str {
    match kind {
        "sql" => "sql_injection",
        "xss" => "xss",
        "csrf" => "csrf",
        "directory_enum" => "dirs",
        "dependencies" => "dependencies",
        "access_control" => "access_control",
        "cmd_injection" => "cmd_injection",
        "nosql" => "nosql",
        "crypto_failures" => "crypto_failures",
        "security_misconfig" => "security_misconfig",
        "auth_failures" => "auth_failures",
        "logging_monitor" => "logging_monitor",
        "ssrf" => "ssrf",
        other => other,
    }
}

/// Issues one HTTP request per scan against the remote SecuriScan engine.
///
/// The client performs no retries and no caching: every user-initiated scan
/// is a fresh call. Malformed target URLs are the engine's concern and come
/// back either as an upstream-reported `error` field or as a `ScanError`.
pub struct ScanClient {
    http: reqwest::Client,
    base_url: String,
}

impl ScanClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ScanError> {
        let http = reqwest::Client::builder()
            .user_agent("SecuriScan-TUI/0.1")
            .build()
            .map_err(|e| {
                error!(error = %e, "Failed to build HTTP client for scan engine.");
                ScanError::Transport(format!("Failed to build HTTP client: {}", e))
            })?;
        Ok(Self {
            http,
            base_url: base_url.into(),
        })
    }

    /// Runs one scan of `kind` against `target_url` and returns the engine's
    /// raw JSON payload.
    ///
    /// POSTs `{"url": target_url}` to `<base>/check_<endpoint>` where the
    /// endpoint name comes from the static lookup table.
    pub async fn scan(&self, target_url: &str, kind: ScanKind) -> Result<RawScanResult, ScanError> {
        let kind_name = kind.to_string();
        let endpoint = format!("{}/check_{}", self.base_url, endpoint_name(&kind_name));
        info!(target = target_url, kind = %kind_name, endpoint = %endpoint, "Dispatching scan request.");

        let response = self
            .http
            .post(&endpoint)
            .json(&serde_json::json!({ "url": target_url }))
            .send()
            .await
            .map_err(|e| {
                error!(endpoint = %endpoint, error = %e, "Scan request failed to reach the engine.");
                ScanError::Transport(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            error!(endpoint = %endpoint, status = %status, "Engine rejected the scan request.");
            return Err(ScanError::Status(status.as_u16()));
        }

        debug!(status = %status, "Engine responded, decoding payload.");
        let raw: RawScanResult = response.json().await.map_err(|e| {
            error!(endpoint = %endpoint, error = %e, "Engine response was not valid JSON.");
            ScanError::Decode(e.to_string())
        })?;

        info!(kind = %kind_name, "Scan response decoded.");
        Ok(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_table_matches_the_engine_routes() {
        assert_eq!(endpoint_name("sql"), "sql_injection");
        assert_eq!(endpoint_name("directory_enum"), "dirs");
        assert_eq!(endpoint_name("xss"), "xss");
        assert_eq!(endpoint_name("csrf"), "csrf");
        assert_eq!(endpoint_name("dependencies"), "dependencies");
        assert_eq!(endpoint_name("access_control"), "access_control");
        assert_eq!(endpoint_name("cmd_injection"), "cmd_injection");
        assert_eq!(endpoint_name("nosql"), "nosql");
        assert_eq!(endpoint_name("crypto_failures"), "crypto_failures");
        assert_eq!(endpoint_name("security_misconfig"), "security_misconfig");
        assert_eq!(endpoint_name("auth_failures"), "auth_failures");
        assert_eq!(endpoint_name("logging_monitor"), "logging_monitor");
        assert_eq!(endpoint_name("ssrf"), "ssrf");
    }

    #[test]
    fn unknown_kind_names_pass_through_unchanged() {
        assert_eq!(endpoint_name("rce"), "rce");
        assert_eq!(endpoint_name(""), "");
    }

    #[test]
    fn kind_names_serialize_in_snake_case() {
        assert_eq!(ScanKind::DirectoryEnum.to_string(), "directory_enum");
        assert_eq!(ScanKind::CmdInjection.to_string(), "cmd_injection");
        assert_eq!(ScanKind::Sql.to_string(), "sql");
    }

    #[test]
    fn scan_error_messages_are_human_readable() {
        let err = ScanError::Status(500);
        assert!(err.to_string().contains("500"));
        let err = ScanError::Transport("connection refused".to_string());
        assert!(err.to_string().contains("connection refused"));
    }
}
