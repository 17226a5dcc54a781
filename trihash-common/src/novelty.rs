//! Novelty scoring and lineage tracking
//!
//! A [`NoveltyTracker`] owns two maps behind one mutex:
//! - frequency table: fingerprint → observation count
//! - lineage map: child fingerprint → parent fingerprint
//!
//! # Scoring
//! Each `record_and_score` call increments the fingerprint's count, then:
//!
//! ```text
//! score = w_f / freq + entropy * w_e + w_l / (lineage_depth + 1) + age_factor * w_a
//! ```
//!
//! rounded to 4 decimal places. Default weights are 1.0 / 0.4 / 0.2 / 0.1.
//!
//! The tracker is an ordinary value: callers construct it, share it (e.g.
//! behind an `Arc`), snapshot and restore it. Nothing is global.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{trace, warn};

/// Hop cap for lineage walks; reached only through cycles or very deep chains
pub const DEFAULT_MAX_LINEAGE_HOPS: u32 = 100;

/// Weights applied to each term of the novelty formula
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoveltyWeights {
    /// Numerator of the harmonic frequency term
    pub frequency: f64,
    /// Multiplier for caller-supplied entropy
    pub entropy: f64,
    /// Numerator of the harmonic lineage term
    pub lineage: f64,
    /// Multiplier for caller-supplied age factor
    pub age: f64,
}

impl Default for NoveltyWeights {
    fn default() -> Self {
        Self {
            frequency: 1.0,
            entropy: 0.4,
            lineage: 0.2,
            age: 0.1,
        }
    }
}

/// Tracker policy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NoveltyConfig {
    pub max_lineage_hops: u32,
    /// Upper bound on entries per map; `None` grows without bound
    ///
    /// When inserting a new key would exceed the bound, both maps are cleared
    /// first (rollover).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_entries: Option<usize>,
    pub weights: NoveltyWeights,
}

impl Default for NoveltyConfig {
    fn default() -> Self {
        Self {
            max_lineage_hops: DEFAULT_MAX_LINEAGE_HOPS,
            max_entries: None,
            weights: NoveltyWeights::default(),
        }
    }
}

/// Caller-supplied inputs to a novelty score
///
/// `lineage_depth` is narrowed from an arbitrary number to a whole hop count
/// (`u32`): fractional or negative depths are unrepresentable, so the
/// `1 / (depth + 1)` term is always finite and positive.
/// `entropy` and `age_factor` are unconstrained.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreInputs {
    pub lineage_depth: u32,
    pub entropy: f64,
    pub age_factor: f64,
}

impl Default for ScoreInputs {
    fn default() -> Self {
        Self {
            lineage_depth: 0,
            entropy: 1.0,
            age_factor: 1.0,
        }
    }
}

/// Serializable copy of tracker state, for explicit persistence by the caller
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerSnapshot {
    pub frequencies: BTreeMap<String, u64>,
    pub lineage: BTreeMap<String, String>,
}

/// Point-in-time counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrackerStats {
    pub fingerprints: usize,
    pub lineage_links: usize,
    pub observations: u64,
    pub rollovers: u64,
}

#[derive(Debug, Default)]
struct TrackerState {
    frequencies: HashMap<String, u64>,
    lineage: HashMap<String, String>,
    rollovers: u64,
}

impl TrackerState {
    fn clear(&mut self) {
        self.frequencies.clear();
        self.lineage.clear();
    }

    fn depth_of(&self, fingerprint: &str, max_hops: u32) -> u32 {
        let mut depth = 0;
        let mut current = fingerprint;
        while let Some(parent) = self.lineage.get(current) {
            if depth >= max_hops {
                warn!(
                    fingerprint,
                    max_hops, "Lineage walk hit hop cap (possible cycle)"
                );
                return max_hops;
            }
            depth += 1;
            current = parent.as_str();
        }
        depth
    }
}

/// Frequency and lineage tracker; all operations serialize on one lock
#[derive(Debug, Default)]
pub struct NoveltyTracker {
    config: NoveltyConfig,
    state: Mutex<TrackerState>,
}

impl NoveltyTracker {
    /// Create an empty tracker with default weights and no size bound
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: NoveltyConfig) -> Self {
        Self {
            config,
            state: Mutex::new(TrackerState::default()),
        }
    }

    pub fn config(&self) -> &NoveltyConfig {
        &self.config
    }

    // Every mutation leaves both maps consistent, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, TrackerState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn make_room(&self, state: &mut TrackerState, is_new_frequency: bool, is_new_link: bool) {
        let Some(max) = self.config.max_entries else {
            return;
        };
        let over = (is_new_frequency && state.frequencies.len() >= max)
            || (is_new_link && state.lineage.len() >= max);
        if over {
            warn!(
                max_entries = max,
                fingerprints = state.frequencies.len(),
                lineage_links = state.lineage.len(),
                "Novelty tracker full, rolling over"
            );
            state.clear();
            state.rollovers += 1;
        }
    }

    /// Increment the fingerprint's count and score it
    pub fn record_and_score(&self, fingerprint: impl AsRef<str>, inputs: ScoreInputs) -> f64 {
        let fingerprint = fingerprint.as_ref();
        let mut state = self.lock();
        self.record_locked(&mut state, fingerprint, inputs)
    }

    /// Like [`record_and_score`](Self::record_and_score), with lineage depth
    /// read from the tracker's own lineage map under the same lock
    pub fn record_and_score_linked(
        &self,
        fingerprint: impl AsRef<str>,
        entropy: f64,
        age_factor: f64,
    ) -> f64 {
        let fingerprint = fingerprint.as_ref();
        let mut state = self.lock();
        // Rollover must happen before the walk so the depth matches what is left
        self.make_room_for_observation(&mut state, fingerprint);
        let lineage_depth = state.depth_of(fingerprint, self.config.max_lineage_hops);
        let inputs = ScoreInputs {
            lineage_depth,
            entropy,
            age_factor,
        };
        self.score_locked(&mut state, fingerprint, inputs)
    }

    fn make_room_for_observation(&self, state: &mut TrackerState, fingerprint: &str) {
        let is_new = !state.frequencies.contains_key(fingerprint);
        self.make_room(state, is_new, false);
    }

    fn record_locked(&self, state: &mut TrackerState, fingerprint: &str, inputs: ScoreInputs) -> f64 {
        self.make_room_for_observation(state, fingerprint);
        self.score_locked(state, fingerprint, inputs)
    }

    fn score_locked(&self, state: &mut TrackerState, fingerprint: &str, inputs: ScoreInputs) -> f64 {
        let freq = {
            let count = state
                .frequencies
                .entry(fingerprint.to_string())
                .or_insert(0);
            *count += 1;
            *count
        };

        let score = compute_score(&self.config.weights, freq, inputs);
        trace!(
            fingerprint,
            freq,
            lineage_depth = inputs.lineage_depth,
            entropy = inputs.entropy,
            age_factor = inputs.age_factor,
            score,
            "Novelty score"
        );
        score
    }

    /// Record `parent` as the parent of `child`, replacing any previous parent
    ///
    /// Neither existence of `parent` nor `child != parent` is checked.
    pub fn link_lineage(&self, child: impl AsRef<str>, parent: impl AsRef<str>) {
        let child = child.as_ref();
        let mut state = self.lock();
        let is_new = !state.lineage.contains_key(child);
        self.make_room(&mut state, false, is_new);
        state
            .lineage
            .insert(child.to_string(), parent.as_ref().to_string());
    }

    /// Recorded parent of `fingerprint`, if any
    pub fn parent(&self, fingerprint: impl AsRef<str>) -> Option<String> {
        self.lock().lineage.get(fingerprint.as_ref()).cloned()
    }

    /// Hops from `fingerprint` to its root ancestor, capped at `max_lineage_hops`
    pub fn lineage_depth(&self, fingerprint: impl AsRef<str>) -> u32 {
        self.lock()
            .depth_of(fingerprint.as_ref(), self.config.max_lineage_hops)
    }

    /// Observation count; 0 for unseen fingerprints
    pub fn frequency(&self, fingerprint: impl AsRef<str>) -> u64 {
        self.lock()
            .frequencies
            .get(fingerprint.as_ref())
            .copied()
            .unwrap_or(0)
    }

    /// Clear both maps
    pub fn reset(&self) {
        self.lock().clear();
    }

    pub fn stats(&self) -> TrackerStats {
        let state = self.lock();
        TrackerStats {
            fingerprints: state.frequencies.len(),
            lineage_links: state.lineage.len(),
            observations: state.frequencies.values().sum(),
            rollovers: state.rollovers,
        }
    }

    pub fn snapshot(&self) -> TrackerSnapshot {
        let state = self.lock();
        TrackerSnapshot {
            frequencies: state
                .frequencies
                .iter()
                .map(|(k, v)| (k.clone(), *v))
                .collect(),
            lineage: state
                .lineage
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Replace all state with `snapshot`
    pub fn restore(&self, snapshot: TrackerSnapshot) {
        let mut state = self.lock();
        state.frequencies = snapshot.frequencies.into_iter().collect();
        state.lineage = snapshot.lineage.into_iter().collect();
    }
}

/// Apply the novelty formula; `freq` must be at least 1
pub fn compute_score(weights: &NoveltyWeights, freq: u64, inputs: ScoreInputs) -> f64 {
    let raw = weights.frequency / freq as f64
        + inputs.entropy * weights.entropy
        + weights.lineage / (inputs.lineage_depth as f64 + 1.0)
        + inputs.age_factor * weights.age;
    round4(raw)
}

// Rounds the exact binary value. Scaling by 10^4 first can push a value just
// below the half step onto it and round it up.
fn round4(value: f64) -> f64 {
    format!("{:.4}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_observation_score() {
        let tracker = NoveltyTracker::new();
        assert_eq!(tracker.record_and_score("fp", ScoreInputs::default()), 1.7);
        assert_eq!(tracker.frequency("fp"), 1);
    }

    #[test]
    fn test_scores_decay_with_frequency() {
        let tracker = NoveltyTracker::new();
        let scores: Vec<f64> = (0..3)
            .map(|_| tracker.record_and_score("fp", ScoreInputs::default()))
            .collect();
        assert_eq!(scores, vec![1.7, 1.2, 1.0333]);
    }

    #[test]
    fn test_lineage_term() {
        let inputs = ScoreInputs {
            lineage_depth: 3,
            entropy: 0.0,
            age_factor: 0.0,
        };
        // 1/1 + 0 + 0.2/4 + 0
        assert_eq!(compute_score(&NoveltyWeights::default(), 1, inputs), 1.05);
    }

    #[test]
    fn test_custom_weights() {
        let weights = NoveltyWeights {
            frequency: 2.0,
            entropy: 0.0,
            lineage: 0.0,
            age: 1.0,
        };
        let inputs = ScoreInputs {
            lineage_depth: 0,
            entropy: 5.0,
            age_factor: 0.5,
        };
        assert_eq!(compute_score(&weights, 4, inputs), 1.0);
    }

    #[test]
    fn test_rounding_to_four_places() {
        let inputs = ScoreInputs {
            lineage_depth: 2,
            entropy: 0.0,
            age_factor: 0.0,
        };
        // 1/7 + 0.2/3 = 0.142857... + 0.066666... = 0.20952...
        assert_eq!(compute_score(&NoveltyWeights::default(), 7, inputs), 0.2095);
    }

    #[test]
    fn test_rounding_uses_exact_binary_value() {
        // raw sum sits just below 1.20065 in binary
        let inputs = ScoreInputs {
            lineage_depth: 0,
            entropy: 0.001625,
            age_factor: 0.0,
        };
        let tracker = NoveltyTracker::new();
        assert_eq!(tracker.record_and_score("fp", inputs), 1.2006);
    }

    #[test]
    fn test_round4_passes_non_finite_through() {
        assert!(round4(f64::NAN).is_nan());
        assert_eq!(round4(f64::INFINITY), f64::INFINITY);
        assert_eq!(round4(-0.00004), -0.0);
    }

    #[test]
    fn test_lineage_depth_chain_and_root() {
        let tracker = NoveltyTracker::new();
        tracker.link_lineage("B", "A");
        tracker.link_lineage("C", "B");
        assert_eq!(tracker.lineage_depth("C"), 2);
        assert_eq!(tracker.lineage_depth("B"), 1);
        assert_eq!(tracker.lineage_depth("A"), 0);
        assert_eq!(tracker.parent("C").as_deref(), Some("B"));
    }

    #[test]
    fn test_link_overwrites_parent() {
        let tracker = NoveltyTracker::new();
        tracker.link_lineage("B", "A");
        tracker.link_lineage("A", "root");
        tracker.link_lineage("B", "root");
        assert_eq!(tracker.lineage_depth("B"), 1);
    }

    #[test]
    fn test_cycle_hits_cap() {
        let tracker = NoveltyTracker::new();
        tracker.link_lineage("A", "B");
        tracker.link_lineage("B", "A");
        assert_eq!(tracker.lineage_depth("A"), DEFAULT_MAX_LINEAGE_HOPS);

        tracker.link_lineage("S", "S");
        assert_eq!(tracker.lineage_depth("S"), DEFAULT_MAX_LINEAGE_HOPS);
    }

    #[test]
    fn test_chain_of_exactly_cap_length() {
        let tracker = NoveltyTracker::with_config(NoveltyConfig {
            max_lineage_hops: 3,
            ..Default::default()
        });
        tracker.link_lineage("d", "c");
        tracker.link_lineage("c", "b");
        tracker.link_lineage("b", "a");
        assert_eq!(tracker.lineage_depth("d"), 3);
        tracker.link_lineage("a", "root");
        assert_eq!(tracker.lineage_depth("d"), 3);
    }

    #[test]
    fn test_record_and_score_linked_uses_lineage() {
        let tracker = NoveltyTracker::new();
        tracker.link_lineage("child", "parent");
        // 1/1 + 0.4 + 0.2/2 + 0.1
        assert_eq!(tracker.record_and_score_linked("child", 1.0, 1.0), 1.6);
    }

    #[test]
    fn test_reset_clears_everything() {
        let tracker = NoveltyTracker::new();
        tracker.record_and_score("fp", ScoreInputs::default());
        tracker.link_lineage("B", "A");
        tracker.reset();
        assert_eq!(tracker.frequency("fp"), 0);
        assert_eq!(tracker.lineage_depth("B"), 0);
        assert_eq!(tracker.stats().fingerprints, 0);
    }

    #[test]
    fn test_bounded_tracker_rolls_over() {
        let tracker = NoveltyTracker::with_config(NoveltyConfig {
            max_entries: Some(2),
            ..Default::default()
        });
        tracker.record_and_score("a", ScoreInputs::default());
        tracker.record_and_score("b", ScoreInputs::default());
        // Existing key never triggers rollover
        tracker.record_and_score("a", ScoreInputs::default());
        assert_eq!(tracker.frequency("a"), 2);

        tracker.record_and_score("c", ScoreInputs::default());
        assert_eq!(tracker.frequency("a"), 0);
        assert_eq!(tracker.frequency("c"), 1);
        assert_eq!(tracker.stats().rollovers, 1);
    }

    #[test]
    fn test_linked_score_sees_lineage_after_rollover() {
        let tracker = NoveltyTracker::with_config(NoveltyConfig {
            max_entries: Some(1),
            ..Default::default()
        });
        tracker.record_and_score("a", ScoreInputs::default());
        tracker.link_lineage("b", "a");

        // Recording "b" overflows the frequency table and clears the lineage too
        let score = tracker.record_and_score_linked("b", 1.0, 1.0);
        assert_eq!(tracker.stats().rollovers, 1);
        assert_eq!(tracker.lineage_depth("b"), 0);
        // 1/1 + 0.4 + 0.2/1 + 0.1, scored at depth 0
        assert_eq!(score, 1.7);
    }

    #[test]
    fn test_snapshot_restore() {
        let tracker = NoveltyTracker::new();
        tracker.record_and_score("fp", ScoreInputs::default());
        tracker.record_and_score("fp", ScoreInputs::default());
        tracker.link_lineage("fp", "root");
        let snapshot = tracker.snapshot();

        let restored = NoveltyTracker::new();
        restored.restore(snapshot.clone());
        assert_eq!(restored.frequency("fp"), 2);
        assert_eq!(restored.lineage_depth("fp"), 1);
        assert_eq!(restored.snapshot(), snapshot);
    }

    #[test]
    fn test_stats() {
        let tracker = NoveltyTracker::new();
        tracker.record_and_score("a", ScoreInputs::default());
        tracker.record_and_score("a", ScoreInputs::default());
        tracker.record_and_score("b", ScoreInputs::default());
        tracker.link_lineage("b", "a");
        let stats = tracker.stats();
        assert_eq!(stats.fingerprints, 2);
        assert_eq!(stats.lineage_links, 1);
        assert_eq!(stats.observations, 3);
    }
}
