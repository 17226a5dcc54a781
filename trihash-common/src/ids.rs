//! Identifier component builders
//!
//! Helpers for producing well-formed CUIDs (`path/secNNN|timestamp`) and
//! version ids (`DOCID-v<version>-SEC<NNN>`) from ingestion data.

use chrono::{DateTime, SecondsFormat, Utc};

/// Zero-pad a section number to three digits
///
/// Sections longer than three characters are kept as given.
pub fn pad_section(section: &str) -> String {
    format!("{:0>3}", section.trim())
}

/// Build a CUID for a document section at `timestamp`
///
/// Backslashes in `path` are normalized to forward slashes.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use trihash_common::ids::build_cuid;
///
/// let ts = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
/// assert_eq!(
///     build_cuid("reports\\2025", "1", ts),
///     "reports/2025/sec001|2025-01-01T00:00:00Z"
/// );
/// ```
pub fn build_cuid(path: &str, section: &str, timestamp: DateTime<Utc>) -> String {
    let normalized = path.replace('\\', "/");
    let normalized = normalized.trim_end_matches('/');
    format!(
        "{}/sec{}|{}",
        normalized,
        pad_section(section),
        timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true)
    )
}

/// Build a CUID stamped with the current time
pub fn build_cuid_now(path: &str, section: &str) -> String {
    build_cuid(path, section, Utc::now())
}

/// Build a version identifier, e.g. `RPT-v2-SEC007`
pub fn build_version_id(doc_id: &str, version: &str, section: &str) -> String {
    format!("{}-v{}-SEC{}", doc_id.trim(), version.trim(), pad_section(section))
}

/// Split a CUID at its last pipe into (context, timestamp)
///
/// Returns `None` when no pipe is present.
pub fn split_cuid(cuid: &str) -> Option<(&str, &str)> {
    cuid.trim().rsplit_once('|')
}
