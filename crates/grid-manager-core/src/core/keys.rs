// crates/grid-manager-core/src/core/keys.rs
// ============================================================================
// Module: Grid Manager Keys
// Description: Ed25519 key material with versioned, prefixed text encodings.
// Purpose: Parse, render, sign, and verify with Grid Manager and server keys.
// Dependencies: ed25519-dalek, rand, serde, thiserror
// ============================================================================

//! ## Overview
//! Grid Manager authorities and storage servers are identified by Ed25519
//! keys. Verifying keys are exchanged as `pub-v0-<base32>` and signing keys
//! are persisted as `priv-v0-<base32 seed>`. Text forms are canonical, so two
//! equal keys always render to the same string.
//!
//! Security posture: private key material is never rendered by `Debug`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use ed25519_dalek::Signature;
use ed25519_dalek::Signer;
use ed25519_dalek::SigningKey;
use ed25519_dalek::VerifyingKey;
use rand::CryptoRng;
use rand::RngCore;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::encoding::EncodingError;
use crate::core::encoding::base32_decode;
use crate::core::encoding::base32_encode;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Prefix for encoded verifying keys.
pub const PUBLIC_KEY_PREFIX: &str = "pub-v0-";
/// Prefix for encoded signing keys.
pub const PRIVATE_KEY_PREFIX: &str = "priv-v0-";
/// Raw Ed25519 key length in bytes.
const KEY_LENGTH: usize = 32;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised when parsing or generating key material.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyError {
    /// The encoded key did not start with the expected prefix.
    #[error("key must start with {expected}")]
    MissingPrefix {
        /// Required prefix.
        expected: &'static str,
    },
    /// The key body was not canonical base32.
    #[error("key encoding invalid: {0}")]
    Encoding(#[from] EncodingError),
    /// The decoded key had the wrong length.
    #[error("key must decode to {KEY_LENGTH} bytes, got {length}")]
    InvalidLength {
        /// Decoded length in bytes.
        length: usize,
    },
    /// The decoded bytes are not a valid Ed25519 point.
    #[error("key is not a valid ed25519 public key")]
    InvalidPoint,
    /// The entropy source failed while generating a key.
    #[error("key generation failed: {0}")]
    Entropy(String),
}

/// Errors raised when verifying a signature.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The signature text was not canonical base32.
    #[error("signature encoding invalid: {0}")]
    Encoding(#[from] EncodingError),
    /// The signature had the wrong length.
    #[error("signature has invalid length")]
    InvalidLength,
    /// The signature did not verify.
    #[error("signature verification failed")]
    Mismatch,
}

// ============================================================================
// SECTION: Public Key
// ============================================================================

/// Ed25519 verifying key with its canonical `pub-v0-` text form.
#[derive(Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey(VerifyingKey);

impl PublicKey {
    /// Parses a `pub-v0-` encoded verifying key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] when the prefix, encoding, length, or point is invalid.
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        let body = text.strip_prefix(PUBLIC_KEY_PREFIX).ok_or(KeyError::MissingPrefix {
            expected: PUBLIC_KEY_PREFIX,
        })?;
        let bytes = decode_key_bytes(body)?;
        VerifyingKey::from_bytes(&bytes).map(Self).map_err(|_| KeyError::InvalidPoint)
    }

    /// Returns the canonical `pub-v0-` text form.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{PUBLIC_KEY_PREFIX}{}", base32_encode(self.0.as_bytes()))
    }

    /// Returns the underlying verifying key.
    #[must_use]
    pub const fn verifying_key(&self) -> &VerifyingKey {
        &self.0
    }

    /// Verifies a base32 signature over `message` using strict Ed25519 rules.
    ///
    /// # Errors
    ///
    /// Returns [`SignatureError`] when the signature cannot be decoded or does not verify.
    pub fn verify(&self, message: &[u8], signature: &str) -> Result<(), SignatureError> {
        let bytes = base32_decode(signature)?;
        let signature =
            Signature::try_from(bytes.as_slice()).map_err(|_| SignatureError::InvalidLength)?;
        self.0.verify_strict(message, &signature).map_err(|_| SignatureError::Mismatch)
    }
}

impl From<VerifyingKey> for PublicKey {
    fn from(value: VerifyingKey) -> Self {
        Self(value)
    }
}

impl TryFrom<String> for PublicKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PublicKey> for String {
    fn from(value: PublicKey) -> Self {
        value.encode()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("PublicKey").field(&self.encode()).finish()
    }
}

// ============================================================================
// SECTION: Private Key
// ============================================================================

/// Ed25519 signing key with its canonical `priv-v0-` text form.
#[derive(Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrivateKey(SigningKey);

impl PrivateKey {
    /// Generates a fresh signing key from a cryptographic RNG.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError::Entropy`] when the RNG cannot supply bytes.
    pub fn generate<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, KeyError> {
        let mut seed = [0u8; KEY_LENGTH];
        rng.try_fill_bytes(&mut seed).map_err(|err| KeyError::Entropy(err.to_string()))?;
        Ok(Self::from_seed(&seed))
    }

    /// Builds a signing key from a 32-byte seed.
    #[must_use]
    pub fn from_seed(seed: &[u8; KEY_LENGTH]) -> Self {
        Self(SigningKey::from_bytes(seed))
    }

    /// Parses a `priv-v0-` encoded signing key.
    ///
    /// # Errors
    ///
    /// Returns [`KeyError`] when the prefix, encoding, or length is invalid.
    pub fn parse(text: &str) -> Result<Self, KeyError> {
        let body = text.strip_prefix(PRIVATE_KEY_PREFIX).ok_or(KeyError::MissingPrefix {
            expected: PRIVATE_KEY_PREFIX,
        })?;
        let bytes = decode_key_bytes(body)?;
        Ok(Self::from_seed(&bytes))
    }

    /// Returns the canonical `priv-v0-` text form.
    #[must_use]
    pub fn encode(&self) -> String {
        format!("{PRIVATE_KEY_PREFIX}{}", base32_encode(&self.0.to_bytes()))
    }

    /// Returns the public half of this key.
    #[must_use]
    pub fn public_key(&self) -> PublicKey {
        PublicKey(self.0.verifying_key())
    }

    /// Signs `message` and returns the base32 signature text.
    #[must_use]
    pub fn sign(&self, message: &[u8]) -> String {
        base32_encode(&self.0.sign(message).to_bytes())
    }
}

impl PartialEq for PrivateKey {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bytes() == other.0.to_bytes()
    }
}

impl Eq for PrivateKey {}

impl TryFrom<String> for PrivateKey {
    type Error = KeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PrivateKey> for String {
    fn from(value: PrivateKey) -> Self {
        value.encode()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PrivateKey").field("public_key", &self.public_key()).finish()
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Decodes a base32 key body into exactly 32 bytes.
fn decode_key_bytes(body: &str) -> Result<[u8; KEY_LENGTH], KeyError> {
    let bytes = base32_decode(body)?;
    let length = bytes.len();
    bytes.try_into().map_err(|_| KeyError::InvalidLength {
        length,
    })
}
