// src/core/mod.rs

// The core module holds everything that is not presentation: the data model,
// the engine client, the classification rules, the report aggregator, and
// the document exporter. The UI consumes these through immutable
// `ScanReport` values only.

/// Data structures shared across the crate: scan kinds, severities, raw
/// engine payloads, and the normalized `ScanReport`.
pub mod models;

/// HTTP client for the remote SecuriScan engine.
pub mod client;

/// Pure rule-based severity and mitigation derivation per scan kind.
pub mod classifier;

/// Aggregation of raw engine payloads into normalized reports.
pub mod report;

/// Paginated document export of a report.
pub mod export;
