// crates/grid-manager-core/src/core/encoding.rs
// ============================================================================
// Module: Grid Manager Base32 Encoding
// Description: RFC 4648 lowercase, unpadded base32 used for keys and signatures.
// Purpose: Provide a canonical text form for key and signature bytes.
// Dependencies: thiserror
// ============================================================================

//! ## Overview
//! Keys and signatures travel as lowercase, unpadded base32 strings. Decoding
//! is strict: upper-case letters, padding, impossible lengths, and non-zero
//! trailing bits are rejected so each byte string has exactly one text form.
//! Canonical text matters because certificates compare key strings verbatim.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Alphabet
// ============================================================================

/// Lowercase RFC 4648 base32 alphabet.
const ALPHABET: &[u8; 32] = b"abcdefghijklmnopqrstuvwxyz234567";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when decoding base32 text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodingError {
    /// A character outside the lowercase base32 alphabet was found.
    #[error("invalid base32 character at offset {offset}")]
    InvalidCharacter {
        /// Byte offset of the offending character.
        offset: usize,
    },
    /// The text length cannot be produced by encoding whole bytes.
    #[error("invalid base32 length {length}")]
    InvalidLength {
        /// Text length in characters.
        length: usize,
    },
    /// Unused trailing bits were not zero.
    #[error("non-canonical base32 trailing bits")]
    NonCanonical,
}

// ============================================================================
// SECTION: Codec
// ============================================================================

/// Encodes bytes as lowercase, unpadded base32.
#[must_use]
pub fn base32_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len().div_ceil(5) * 8);
    let mut buffer: usize = 0;
    let mut bits: usize = 0;
    for byte in bytes {
        buffer = (buffer << 8) | usize::from(*byte);
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(char::from(ALPHABET[(buffer >> bits) & 0x1f]));
        }
        buffer &= (1 << bits) - 1;
    }
    if bits > 0 {
        out.push(char::from(ALPHABET[(buffer << (5 - bits)) & 0x1f]));
    }
    out
}

/// Decodes lowercase, unpadded base32 text.
///
/// # Errors
///
/// Returns [`EncodingError`] when the text is not canonical base32.
pub fn base32_decode(text: &str) -> Result<Vec<u8>, EncodingError> {
    let mut out = Vec::with_capacity(text.len() * 5 / 8);
    let mut buffer: usize = 0;
    let mut bits: usize = 0;
    for (offset, byte) in text.bytes().enumerate() {
        let value = match byte {
            b'a' ..= b'z' => byte - b'a',
            b'2' ..= b'7' => byte - b'2' + 26,
            _ => {
                return Err(EncodingError::InvalidCharacter {
                    offset,
                });
            }
        };
        buffer = (buffer << 5) | usize::from(value);
        bits += 5;
        if bits >= 8 {
            bits -= 8;
            let decoded = u8::try_from((buffer >> bits) & 0xff).map_err(|_| {
                EncodingError::InvalidCharacter {
                    offset,
                }
            })?;
            out.push(decoded);
            buffer &= (1 << bits) - 1;
        }
    }
    if bits >= 5 {
        return Err(EncodingError::InvalidLength {
            length: text.len(),
        });
    }
    if buffer != 0 {
        return Err(EncodingError::NonCanonical);
    }
    Ok(out)
}
