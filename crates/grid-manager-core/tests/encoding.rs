// crates/grid-manager-core/tests/encoding.rs
// ============================================================================
// Module: Base32 Encoding Tests
// Description: Tests for the canonical lowercase base32 codec.
// ============================================================================
//! ## Overview
//! Validates RFC 4648 vectors and strict rejection of non-canonical text.

#![allow(
    clippy::panic,
    clippy::print_stdout,
    clippy::print_stderr,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only output and panic-based assertions are permitted."
)]

use grid_manager_core::EncodingError;
use grid_manager_core::base32_decode;
use grid_manager_core::base32_encode;
use proptest::prelude::*;

// ============================================================================
// SECTION: Vectors
// ============================================================================

/// RFC 4648 test vectors, lowercased and unpadded.
const VECTORS: &[(&str, &str)] = &[
    ("", ""),
    ("f", "my"),
    ("fo", "mzxq"),
    ("foo", "mzxw6"),
    ("foob", "mzxw6yq"),
    ("fooba", "mzxw6ytb"),
    ("foobar", "mzxw6ytboi"),
];

/// Tests encoding matches the RFC vectors.
#[test]
fn test_encode_matches_rfc_vectors() {
    for (plain, encoded) in VECTORS {
        assert_eq!(base32_encode(plain.as_bytes()), *encoded, "encoding {plain:?}");
    }
}

/// Tests decoding matches the RFC vectors.
#[test]
fn test_decode_matches_rfc_vectors() {
    for (plain, encoded) in VECTORS {
        assert_eq!(base32_decode(encoded).unwrap(), plain.as_bytes(), "decoding {encoded:?}");
    }
}

// ============================================================================
// SECTION: Rejection
// ============================================================================

/// Tests uppercase and padding characters are rejected.
#[test]
fn test_decode_rejects_characters_outside_alphabet() {
    assert_eq!(
        base32_decode("MY"),
        Err(EncodingError::InvalidCharacter {
            offset: 0
        })
    );
    assert_eq!(
        base32_decode("my======"),
        Err(EncodingError::InvalidCharacter {
            offset: 2
        })
    );
    assert_eq!(
        base32_decode("m1"),
        Err(EncodingError::InvalidCharacter {
            offset: 1
        })
    );
}

/// Tests lengths that cannot encode whole bytes are rejected.
#[test]
fn test_decode_rejects_impossible_lengths() {
    assert_eq!(
        base32_decode("m"),
        Err(EncodingError::InvalidLength {
            length: 1
        })
    );
    assert_eq!(
        base32_decode("mzx"),
        Err(EncodingError::InvalidLength {
            length: 3
        })
    );
}

/// Tests non-zero trailing bits are rejected.
#[test]
fn test_decode_rejects_non_canonical_trailing_bits() {
    assert_eq!(base32_decode("mz"), Err(EncodingError::NonCanonical));
}

// ============================================================================
// SECTION: Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_decode_inverts_encode(bytes in proptest::collection::vec(any::<u8>(), 0 .. 96)) {
        let encoded = base32_encode(&bytes);
        prop_assert_eq!(base32_decode(&encoded).unwrap(), bytes);
    }
}
