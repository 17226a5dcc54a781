//! Canonical string construction
//!
//! The canonical form `SHC|CUID|UUID[|VERSION]` is the only input to hashing,
//! so it must be byte-identical for equal trimmed inputs on every platform.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Delimiter between canonical components
pub const DELIMITER: char = '|';

/// Deterministic pipe-delimited join of the identifier components
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalString(String);

impl CanonicalString {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the canonical string from (possibly unvalidated) components
///
/// Each component is trimmed independently. A version that is empty after
/// trimming is treated as absent. Never fails.
///
/// # Examples
///
/// ```
/// use trihash_common::canonical::canonicalize;
///
/// let canon = canonicalize(" λ ", "docs/sec001|2025-01-01T00:00:00Z", "DOC-v1-SEC001", None);
/// assert_eq!(canon.as_str(), "λ|docs/sec001|2025-01-01T00:00:00Z|DOC-v1-SEC001");
///
/// let versioned = canonicalize("λ", "a|b", "DOC-v1-SEC001", Some(" 2 "));
/// assert_eq!(versioned.as_str(), "λ|a|b|DOC-v1-SEC001|2");
/// ```
pub fn canonicalize(shc: &str, cuid: &str, uuid: &str, version: Option<&str>) -> CanonicalString {
    let mut canonical = String::with_capacity(shc.len() + cuid.len() + uuid.len() + 8);
    canonical.push_str(shc.trim());
    canonical.push(DELIMITER);
    canonical.push_str(cuid.trim());
    canonical.push(DELIMITER);
    canonical.push_str(uuid.trim());

    if let Some(version) = version.map(str::trim).filter(|v| !v.is_empty()) {
        canonical.push(DELIMITER);
        canonical.push_str(version);
    }

    CanonicalString(canonical)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_order_and_delimiter() {
        let canon = canonicalize("Ψ", "p/sec002|t", "D-v3-SEC002", None);
        assert_eq!(canon.as_str(), "Ψ|p/sec002|t|D-v3-SEC002");
    }

    #[test]
    fn test_each_component_trimmed() {
        let a = canonicalize("\tλ\n", "  a|b ", " D-v1-SEC001", Some(" v2 "));
        let b = canonicalize("λ", "a|b", "D-v1-SEC001", Some("v2"));
        assert_eq!(a, b);
    }

    #[test]
    fn test_blank_version_is_absent() {
        let blank = canonicalize("λ", "a|b", "D-v1-SEC001", Some("   "));
        let none = canonicalize("λ", "a|b", "D-v1-SEC001", None);
        assert_eq!(blank, none);
    }

    #[test]
    fn test_unvalidated_input_accepted() {
        let canon = canonicalize("", "", "", None);
        assert_eq!(canon.as_str(), "||");
    }
}
