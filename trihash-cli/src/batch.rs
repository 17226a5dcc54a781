//! Batch fingerprinting: JSON entries in, fingerprint records out

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use tracing::{debug, info};
use trihash_common::{
    Fingerprint, FingerprintRecord, Fingerprinter, NoveltyTracker, TrackerSnapshot,
};

/// One content unit to fingerprint
#[derive(Debug, Clone, Deserialize)]
pub struct BatchEntry {
    pub shc: String,
    pub cuid: String,
    pub uuid: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
    /// Parent fingerprint, linked before scoring
    #[serde(default)]
    pub parent: Option<Fingerprint>,
    #[serde(default = "one")]
    pub entropy: f64,
    #[serde(default = "one")]
    pub age_factor: f64,
}

fn one() -> f64 {
    1.0
}

/// Fingerprint, link and score each entry in order
pub fn process(
    fingerprinter: &Fingerprinter,
    tracker: &NoveltyTracker,
    entries: &[BatchEntry],
) -> Result<Vec<FingerprintRecord>> {
    let mut records = Vec::with_capacity(entries.len());

    for (index, entry) in entries.iter().enumerate() {
        let fp = fingerprinter
            .fingerprint(
                &entry.shc,
                &entry.cuid,
                &entry.uuid,
                entry.suffix.as_deref(),
                entry.version.as_deref(),
            )
            .with_context(|| format!("Entry {} ({})", index, entry.cuid))?;

        if let Some(parent) = &entry.parent {
            tracker.link_lineage(&fp, parent);
        }

        let novelty = tracker.record_and_score_linked(&fp, entry.entropy, entry.age_factor);
        // Read after scoring so a rollover is reflected in the record
        let lineage_depth = tracker.lineage_depth(&fp);
        debug!(fingerprint = %fp, lineage_depth, novelty, "Processed entry {}", index);

        records.push(FingerprintRecord {
            fingerprint: fp,
            shc: entry.shc.trim().to_string(),
            cuid: entry.cuid.trim().to_string(),
            version_id: entry.uuid.trim().to_string(),
            version: entry.version.clone(),
            parent: entry.parent.clone(),
            lineage_depth,
            novelty,
        });
    }

    info!("Fingerprinted {} entries", records.len());
    Ok(records)
}

pub fn load_entries(path: &Path) -> Result<Vec<BatchEntry>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read batch input {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse batch input {}", path.display()))
}

/// Restore tracker state from `path` if it exists
pub fn load_state(tracker: &NoveltyTracker, path: &Path) -> Result<()> {
    if !path.exists() {
        info!("No tracker state at {}, starting empty", path.display());
        return Ok(());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read tracker state {}", path.display()))?;
    let snapshot: TrackerSnapshot = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse tracker state {}", path.display()))?;
    tracker.restore(snapshot);
    info!("Restored tracker state from {}", path.display());
    Ok(())
}

pub fn save_state(tracker: &NoveltyTracker, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&tracker.snapshot())?;
    fs::write(path, json)
        .with_context(|| format!("Failed to write tracker state {}", path.display()))?;
    Ok(())
}
