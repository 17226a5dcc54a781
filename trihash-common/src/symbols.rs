//! Recognized symbolic classes (SHC)
//!
//! The set is configuration data: an ordered list of distinct glyphs. The
//! default is the 14-member reference set, but deployments may supply their own
//! through `TomlConfig::symbols` without touching the validator.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Reference symbol set, in canonical order
pub const DEFAULT_SYMBOLS: [&str; 14] = [
    "λ", "Ξ", "∂", "Φ", "Ψ", "Ω", "α", "β", "γ", "δ", "ε", "ζ", "η", "θ",
];

/// Ordered set of distinct symbolic classes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct SymbolSet {
    symbols: Vec<String>,
}

impl SymbolSet {
    /// Build a set from an ordered list, rejecting duplicates and empty lists
    ///
    /// Symbols are trimmed before insertion so that `" λ "` and `"λ"` are the
    /// same class.
    pub fn new<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: Vec<String> = Vec::new();
        for symbol in symbols {
            let symbol = symbol.into().trim().to_string();
            if symbol.is_empty() {
                return Err(Error::Config("Symbol set contains an empty symbol".to_string()));
            }
            if set.contains(&symbol) {
                return Err(Error::DuplicateSymbol(symbol));
            }
            set.push(symbol);
        }

        if set.is_empty() {
            return Err(Error::EmptySymbolSet);
        }

        Ok(Self { symbols: set })
    }

    /// Membership test; the only validation rule for an SHC
    pub fn contains(&self, shc: &str) -> bool {
        self.symbols.iter().any(|s| s == shc)
    }

    /// Symbols in configured order
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Display suffix grouping fingerprints by class, e.g. `"(Ψ)"`
    ///
    /// Returns `None` for symbols outside the set.
    pub fn suffix_for(&self, shc: &str) -> Option<String> {
        let shc = shc.trim();
        self.contains(shc).then(|| format!("({})", shc))
    }

    /// Return a copy extended with additional symbols, appended in order
    pub fn extended<I, S>(&self, extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let merged = self
            .symbols
            .iter()
            .cloned()
            .chain(extra.into_iter().map(Into::<String>::into));
        Self::new(merged)
    }
}

impl Default for SymbolSet {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_SYMBOLS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for SymbolSet {
    type Error = Error;

    fn try_from(symbols: Vec<String>) -> Result<Self> {
        Self::new(symbols)
    }
}

impl From<SymbolSet> for Vec<String> {
    fn from(set: SymbolSet) -> Self {
        set.symbols
    }
}
