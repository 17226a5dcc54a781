//! Common error types for trihash

use thiserror::Error;

/// Common result type for trihash operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by validation, encoding, configuration and record I/O
#[derive(Error, Debug)]
pub enum Error {
    /// Symbolic class is not a member of the recognized symbol set
    #[error("Invalid SHC '{value}'. Must be one of: {}", valid.join(" "))]
    InvalidSymbol { value: String, valid: Vec<String> },

    /// CUID has no pipe delimiter separating context from timestamp
    #[error("Invalid CUID '{0}': must contain a timestamp separated by '|'")]
    InvalidCuid(String),

    /// Version identifier does not follow DOCID-vVER-SEC### (fewer than two hyphens)
    #[error("Invalid version id '{0}': must follow DOCID-vVER-SEC###")]
    InvalidVersionId(String),

    /// Negative value handed to the base-96 encoder
    #[error("Cannot encode negative value {0} in base-96")]
    NegativeInput(i64),

    /// Character outside the base-96 alphabet
    #[error("Invalid base-96 digit {digit:?} at position {position}")]
    InvalidDigit { digit: Option<char>, position: usize },

    /// Decoded value does not fit the target integer
    #[error("Base-96 value '{0}' overflows u64")]
    Overflow(String),

    /// Symbol set configuration lists the same symbol twice
    #[error("Duplicate symbol '{0}' in symbol set")]
    DuplicateSymbol(String),

    /// Symbol set configuration is empty
    #[error("Symbol set must contain at least one symbol")]
    EmptySymbolSet,

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error for records and snapshots
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Malformed TOML configuration file
    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
