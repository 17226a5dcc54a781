//! # trihash Common Library
//!
//! Content fingerprinting and novelty tracking for versioned document sections:
//! - Symbol set configuration and component validation
//! - Canonical `SHC|CUID|UUID[|VERSION]` strings
//! - Base-96 encoding
//! - Pluggable 32-bit hashing into printable fingerprints
//! - Frequency/lineage novelty tracker
//! - Identifier builders, record I/O and configuration loading

pub mod canonical;
pub mod config;
pub mod encoder;
pub mod error;
pub mod hasher;
pub mod ids;
pub mod novelty;
pub mod records;
pub mod symbols;
pub mod validator;

pub use canonical::{canonicalize, CanonicalString};
pub use encoder::{decode_base96, encode_base96, try_encode_base96};
pub use error::{Error, Result};
pub use hasher::{fingerprint, Fingerprint, Fingerprinter, HashAlgorithm, HashStrategy};
pub use novelty::{NoveltyConfig, NoveltyTracker, ScoreInputs, TrackerSnapshot};
pub use records::FingerprintRecord;
pub use symbols::SymbolSet;
pub use validator::validate;
