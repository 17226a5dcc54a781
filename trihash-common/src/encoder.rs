//! Base-96 radix encoding
//!
//! Alphabet order: digits, upper-case, lower-case, then punctuation. The first
//! 91 symbols follow the reference deployment's ordering; the final five
//! (`"`, `'`, `\`, `§`, `¶`) complete the radix so every remainder maps to a
//! distinct printable character.

use crate::{Error, Result};
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Radix of the encoding
pub const RADIX: u64 = 96;

/// Encoding alphabet, index 0 through 95
pub const ALPHABET: [char; 96] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
    'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U', 'V',
    'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f', 'g', 'h', 'i', 'j', 'k', 'l',
    'm', 'n', 'o', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z', '!', '#',
    '$', '%', '&', '(', ')', '*', '+', ',', '-', '.', '/', ':', ';', '<', '=', '>',
    '?', '@', '[', ']', '^', '_', '`', '{', '|', '}', '~', '"', '\'', '\\', '§', '¶',
];

static DIGIT_VALUES: Lazy<HashMap<char, u64>> = Lazy::new(|| {
    ALPHABET
        .iter()
        .enumerate()
        .map(|(index, &c)| (c, index as u64))
        .collect()
});

/// Encode a non-negative integer, most significant digit first
///
/// Zero encodes to `"0"` (alphabet index 0), never the empty string.
///
/// # Examples
///
/// ```
/// use trihash_common::encoder::encode_base96;
///
/// assert_eq!(encode_base96(0), "0");
/// assert_eq!(encode_base96(95), "¶");
/// assert_eq!(encode_base96(96), "10");
/// ```
pub fn encode_base96(value: u64) -> String {
    if value == 0 {
        return ALPHABET[0].to_string();
    }

    let mut digits = Vec::with_capacity(10);
    let mut remaining = value;
    while remaining > 0 {
        digits.push(ALPHABET[(remaining % RADIX) as usize]);
        remaining /= RADIX;
    }

    digits.iter().rev().collect()
}

/// Encode a signed integer, rejecting negative values
pub fn try_encode_base96(value: i64) -> Result<String> {
    u64::try_from(value)
        .map(encode_base96)
        .map_err(|_| Error::NegativeInput(value))
}

/// Decode a base-96 string produced by [`encode_base96`]
///
/// Leading zero digits are tolerated. Empty input is rejected.
pub fn decode_base96(encoded: &str) -> Result<u64> {
    if encoded.is_empty() {
        return Err(Error::InvalidDigit {
            digit: None,
            position: 0,
        });
    }

    let mut value: u64 = 0;
    for (position, c) in encoded.chars().enumerate() {
        let digit = *DIGIT_VALUES.get(&c).ok_or(Error::InvalidDigit {
            digit: Some(c),
            position,
        })?;
        value = value
            .checked_mul(RADIX)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| Error::Overflow(encoded.to_string()))?;
    }

    Ok(value)
}
