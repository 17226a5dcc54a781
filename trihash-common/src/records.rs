//! Fingerprint records handed to persistence and export collaborators

use crate::hasher::Fingerprint;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::debug;

/// One fingerprinted content unit with its novelty score
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FingerprintRecord {
    pub fingerprint: Fingerprint,
    pub shc: String,
    pub cuid: String,
    pub version_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Fingerprint>,
    #[serde(default)]
    pub lineage_depth: u32,
    pub novelty: f64,
}

/// Write records as pretty-printed JSON
pub fn save_records(path: &Path, records: &[FingerprintRecord]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)?;
    fs::write(path, json)?;
    debug!(path = %path.display(), count = records.len(), "Saved fingerprint records");
    Ok(())
}

/// Read records written by [`save_records`]
pub fn load_records(path: &Path) -> Result<Vec<FingerprintRecord>> {
    let content = fs::read_to_string(path)?;
    let records: Vec<FingerprintRecord> = serde_json::from_str(&content)?;
    debug!(path = %path.display(), count = records.len(), "Loaded fingerprint records");
    Ok(records)
}
