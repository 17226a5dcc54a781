//! Fingerprint generation
//!
//! Pipeline: validate (optional) → canonicalize → 32-bit hash → base-96 → suffix.
//!
//! The hash is a pluggable [`HashStrategy`]. The only hard requirement is that
//! a deployment keeps the same strategy and seed, otherwise previously issued
//! fingerprints stop matching. MurmurHash3 (x86, 32-bit, seed 0) is the
//! default and reproduces fingerprints issued by the reference deployment for
//! hashes whose base-96 digits fall inside the shared 91-symbol prefix.

use crate::canonical::{canonicalize, CanonicalString};
use crate::encoder::encode_base96;
use crate::symbols::SymbolSet;
use crate::validator::validate;
use crate::Result;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use tracing::debug;

/// Suffix appended when the caller does not supply one
pub const DEFAULT_SUFFIX: &str = "(λ)";

/// Deterministic `bytes -> u32` hash function
pub trait HashStrategy: Send + Sync {
    /// Hash `bytes` to an unsigned 32-bit value
    fn hash32(&self, bytes: &[u8]) -> u32;

    /// Short identifier used in logs
    fn name(&self) -> &'static str;
}

/// MurmurHash3 x86_32
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Murmur3 {
    pub seed: u32,
}

impl Murmur3 {
    const C1: u32 = 0xcc9e_2d51;
    const C2: u32 = 0x1b87_3593;

    pub fn with_seed(seed: u32) -> Self {
        Self { seed }
    }

    #[inline]
    fn mix_k(mut k: u32) -> u32 {
        k = k.wrapping_mul(Self::C1);
        k = k.rotate_left(15);
        k.wrapping_mul(Self::C2)
    }

    #[inline]
    fn fmix(mut h: u32) -> u32 {
        h ^= h >> 16;
        h = h.wrapping_mul(0x85eb_ca6b);
        h ^= h >> 13;
        h = h.wrapping_mul(0xc2b2_ae35);
        h ^ (h >> 16)
    }
}

impl HashStrategy for Murmur3 {
    fn hash32(&self, bytes: &[u8]) -> u32 {
        let mut h = self.seed;

        let mut blocks = bytes.chunks_exact(4);
        for block in &mut blocks {
            let k = u32::from_le_bytes([block[0], block[1], block[2], block[3]]);
            h ^= Self::mix_k(k);
            h = h.rotate_left(13);
            h = h.wrapping_mul(5).wrapping_add(0xe654_6b64);
        }

        let tail = blocks.remainder();
        if !tail.is_empty() {
            let mut k: u32 = 0;
            for (i, byte) in tail.iter().enumerate() {
                k ^= (*byte as u32) << (8 * i);
            }
            h ^= Self::mix_k(k);
        }

        // Length is mixed modulo 2^32
        h ^= bytes.len() as u32;
        Self::fmix(h)
    }

    fn name(&self) -> &'static str {
        "murmur3"
    }
}

/// xxHash32
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Xxh32 {
    pub seed: u32,
}

impl HashStrategy for Xxh32 {
    fn hash32(&self, bytes: &[u8]) -> u32 {
        xxhash_rust::xxh32::xxh32(bytes, self.seed)
    }

    fn name(&self) -> &'static str {
        "xxh32"
    }
}

/// First four bytes (big-endian) of SHA-256
///
/// Slower than the non-cryptographic strategies and no stronger once truncated
/// to 32 bits; available for deployments that standardize on SHA-256.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Prefix;

impl HashStrategy for Sha256Prefix {
    fn hash32(&self, bytes: &[u8]) -> u32 {
        let digest = Sha256::digest(bytes);
        u32::from_be_bytes([digest[0], digest[1], digest[2], digest[3]])
    }

    fn name(&self) -> &'static str {
        "sha256"
    }
}

/// Hash algorithm selection, as written in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
    #[default]
    Murmur3,
    Xxh32,
    Sha256,
}

impl HashAlgorithm {
    /// Instantiate the strategy; `seed` is ignored by SHA-256
    pub fn build(self, seed: u32) -> Box<dyn HashStrategy> {
        match self {
            HashAlgorithm::Murmur3 => Box::new(Murmur3::with_seed(seed)),
            HashAlgorithm::Xxh32 => Box::new(Xxh32 { seed }),
            HashAlgorithm::Sha256 => Box::new(Sha256Prefix),
        }
    }
}

/// How the display suffix is chosen when the caller passes none
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuffixPolicy {
    /// Always append the given literal
    Fixed(String),
    /// Append `(<shc>)` for the fingerprint's own symbolic class
    PerSymbol,
}

impl Default for SuffixPolicy {
    fn default() -> Self {
        SuffixPolicy::Fixed(DEFAULT_SUFFIX.to_string())
    }
}

/// Printable content-derived token: `<base96(hash)><suffix>`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Fingerprint {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Fingerprint> for String {
    fn from(fp: Fingerprint) -> Self {
        fp.0
    }
}

impl From<String> for Fingerprint {
    fn from(s: String) -> Self {
        Fingerprint(s)
    }
}

impl From<&str> for Fingerprint {
    fn from(s: &str) -> Self {
        Fingerprint(s.to_string())
    }
}

/// Stateless fingerprint generator bound to a symbol set and hash strategy
///
/// Safe to share across threads; all methods take `&self`.
pub struct Fingerprinter {
    symbols: SymbolSet,
    strategy: Box<dyn HashStrategy>,
    suffix: SuffixPolicy,
    validate: bool,
}

impl Fingerprinter {
    /// Reference configuration: default symbols, MurmurHash3 seed 0, `(λ)` suffix
    pub fn new() -> Self {
        Self {
            symbols: SymbolSet::default(),
            strategy: Box::new(Murmur3::default()),
            suffix: SuffixPolicy::default(),
            validate: true,
        }
    }

    pub fn with_symbols(mut self, symbols: SymbolSet) -> Self {
        self.symbols = symbols;
        self
    }

    pub fn with_strategy(mut self, strategy: Box<dyn HashStrategy>) -> Self {
        self.strategy = strategy;
        self
    }

    pub fn with_suffix_policy(mut self, suffix: SuffixPolicy) -> Self {
        self.suffix = suffix;
        self
    }

    /// Skip validation before hashing
    ///
    /// Fingerprinting unvalidated input is the caller's responsibility.
    pub fn with_validation(mut self, validate: bool) -> Self {
        self.validate = validate;
        self
    }

    pub fn symbols(&self) -> &SymbolSet {
        &self.symbols
    }

    pub fn strategy_name(&self) -> &'static str {
        self.strategy.name()
    }

    /// Fingerprint the identifier components
    ///
    /// `suffix` overrides the configured policy and is appended verbatim.
    /// Fails only with a validation error, and only when validation is enabled.
    pub fn fingerprint(
        &self,
        shc: &str,
        cuid: &str,
        uuid: &str,
        suffix: Option<&str>,
        version: Option<&str>,
    ) -> Result<Fingerprint> {
        if self.validate {
            validate(&self.symbols, shc, cuid, uuid)?;
        }

        let canonical = canonicalize(shc, cuid, uuid, version);
        let suffix = match suffix {
            Some(s) => s.to_string(),
            None => self.default_suffix(shc),
        };

        Ok(self.fingerprint_canonical(&canonical, &suffix))
    }

    /// Hash an already-built canonical string; never validates
    pub fn fingerprint_canonical(&self, canonical: &CanonicalString, suffix: &str) -> Fingerprint {
        let hash = self.strategy.hash32(canonical.as_bytes());
        let encoded = encode_base96(hash as u64);

        debug!(
            canonical = %canonical,
            hash,
            strategy = self.strategy.name(),
            "Computed fingerprint"
        );

        Fingerprint(format!("{}{}", encoded, suffix))
    }

    fn default_suffix(&self, shc: &str) -> String {
        match &self.suffix {
            SuffixPolicy::Fixed(s) => s.clone(),
            SuffixPolicy::PerSymbol => format!("({})", shc.trim()),
        }
    }
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Fingerprinter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fingerprinter")
            .field("symbols", &self.symbols)
            .field("strategy", &self.strategy.name())
            .field("suffix", &self.suffix)
            .field("validate", &self.validate)
            .finish()
    }
}

/// Fingerprint with the reference configuration
pub fn fingerprint(
    shc: &str,
    cuid: &str,
    uuid: &str,
    suffix: Option<&str>,
    version: Option<&str>,
) -> Result<Fingerprint> {
    Fingerprinter::new().fingerprint(shc, cuid, uuid, suffix, version)
}
