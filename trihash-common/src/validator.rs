//! Format validation for the three identifier components
//!
//! Checks are purely referential: membership of the SHC in the configured
//! symbol set, presence of a pipe in the CUID, and at least two hyphens in the
//! version identifier. Timestamps and document ids are not cross-validated.
//! Components are trimmed before checking, matching canonicalization.

use crate::symbols::SymbolSet;
use crate::{Error, Result};

/// Validate `(shc, cuid, uuid)` against `symbols`
///
/// Fails on the first offending component, checked in SHC, CUID, version-id order.
pub fn validate(symbols: &SymbolSet, shc: &str, cuid: &str, uuid: &str) -> Result<()> {
    validate_symbol(symbols, shc)?;
    validate_cuid(cuid)?;
    validate_version_id(uuid)?;
    Ok(())
}

/// SHC must be a member of the recognized set
pub fn validate_symbol(symbols: &SymbolSet, shc: &str) -> Result<()> {
    let shc = shc.trim();
    if symbols.contains(shc) {
        Ok(())
    } else {
        Err(Error::InvalidSymbol {
            value: shc.to_string(),
            valid: symbols.symbols().to_vec(),
        })
    }
}

/// CUID must carry a `|`-separated timestamp
pub fn validate_cuid(cuid: &str) -> Result<()> {
    let cuid = cuid.trim();
    if cuid.contains('|') {
        Ok(())
    } else {
        Err(Error::InvalidCuid(cuid.to_string()))
    }
}

/// Version id must contain at least two hyphens (`DOCID-vVER-SEC###`)
pub fn validate_version_id(uuid: &str) -> Result<()> {
    let uuid = uuid.trim();
    if uuid.matches('-').count() >= 2 {
        Ok(())
    } else {
        Err(Error::InvalidVersionId(uuid.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUID: &str = "path|ts";
    const UUID: &str = "DOC-v1-SEC001";

    #[test]
    fn test_valid_components() {
        let symbols = SymbolSet::default();
        assert!(validate(&symbols, "λ", CUID, UUID).is_ok());
        assert!(validate(&symbols, " θ ", CUID, UUID).is_ok());
    }

    #[test]
    fn test_unknown_symbol_lists_valid_set() {
        let symbols = SymbolSet::default();
        match validate(&symbols, "Z", CUID, UUID) {
            Err(Error::InvalidSymbol { value, valid }) => {
                assert_eq!(value, "Z");
                assert_eq!(valid.len(), 14);
                assert_eq!(valid[0], "λ");
            }
            other => panic!("Expected InvalidSymbol, got {:?}", other),
        }
    }

    #[test]
    fn test_cuid_without_pipe() {
        let symbols = SymbolSet::default();
        let result = validate(&symbols, "λ", "no-pipe-here", UUID);
        assert!(matches!(result, Err(Error::InvalidCuid(c)) if c == "no-pipe-here"));
    }

    #[test]
    fn test_version_id_needs_two_hyphens() {
        let symbols = SymbolSet::default();
        assert!(matches!(
            validate(&symbols, "λ", CUID, "nohyphens"),
            Err(Error::InvalidVersionId(_))
        ));
        assert!(matches!(
            validate(&symbols, "λ", CUID, "DOC-v1"),
            Err(Error::InvalidVersionId(_))
        ));
        assert!(validate(&symbols, "λ", CUID, "a-b-c-d").is_ok());
    }

    #[test]
    fn test_symbol_checked_first() {
        let symbols = SymbolSet::default();
        let result = validate(&symbols, "Z", "nopipe", "nohyphens");
        assert!(matches!(result, Err(Error::InvalidSymbol { .. })));
    }

    #[test]
    fn test_custom_symbol_set() {
        let symbols = SymbolSet::new(["Z"]).unwrap();
        assert!(validate(&symbols, "Z", CUID, UUID).is_ok());
        assert!(validate(&symbols, "λ", CUID, UUID).is_err());
    }
}
