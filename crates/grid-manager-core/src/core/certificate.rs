// crates/grid-manager-core/src/core/certificate.rs
// ============================================================================
// Module: Grid Manager Certificates
// Description: Signed statements binding a storage server key to an authority.
// Purpose: Issue, parse, and validate Grid Manager certificates.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A certificate is a JSON object with two string fields. `certificate` holds
//! the RFC 8785 canonical JSON of a [`CertificateBody`], and `signature` holds
//! the base32 Ed25519 signature over exactly those bytes. Verification checks
//! the signature against the raw string before the body is parsed, so a
//! tampered body never reaches the JSON decoder as trusted input.
//!
//! Security posture: certificates arrive from untrusted storage servers and
//! are size-limited before parsing.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::core::hashing::HashDigest;
use crate::core::hashing::HashError;
use crate::core::hashing::canonical_json_string;
use crate::core::hashing::hash_bytes;
use crate::core::identifiers::ServerName;
use crate::core::keys::PrivateKey;
use crate::core::keys::PublicKey;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum size of a serialized certificate in bytes.
pub const MAX_CERTIFICATE_BYTES: usize = 8 * 1024;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised while issuing or validating certificates.
///
/// # Invariants
/// - Trust evaluation folds every variant into an untrusted classification;
///   the detail is only visible to explicit inspection callers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CertificateError {
    /// The certificate JSON or body could not be parsed.
    #[error("malformed certificate: {0}")]
    Malformed(String),
    /// The certificate body could not be canonicalized.
    #[error("certificate canonicalization failed: {0}")]
    Canonicalization(String),
    /// The signature does not verify under the issuer key.
    #[error("certificate signature invalid")]
    BadSignature,
    /// The certificate expired at or before the evaluation time.
    #[error("certificate expired at {expires} (now {now})")]
    Expired {
        /// Expiry recorded in the certificate.
        expires: Timestamp,
        /// Evaluation time.
        now: Timestamp,
    },
    /// The certificate names a different server key.
    #[error("certificate public key does not match the presenting server")]
    KeyMismatch,
    /// The certificate exceeds the size limit.
    #[error("certificate exceeds size limit ({size} > {limit} bytes)")]
    TooLarge {
        /// Observed size in bytes.
        size: usize,
        /// Maximum allowed size in bytes.
        limit: usize,
    },
}

impl From<HashError> for CertificateError {
    fn from(error: HashError) -> Self {
        match error {
            HashError::Canonicalization(message) => Self::Canonicalization(message),
        }
    }
}

// ============================================================================
// SECTION: Certificate Types
// ============================================================================

/// Statement signed by a Grid Manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CertificateBody {
    /// Roster name of the authorized server.
    pub name: ServerName,
    /// Identity key of the authorized server.
    pub public_key: PublicKey,
    /// Operator-supplied serial number.
    pub version: u64,
    /// Expiry time; the certificate is valid strictly before this instant.
    pub expires: Timestamp,
}

/// Certificate as distributed to storage servers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignedCertificate {
    /// Canonical JSON text of the [`CertificateBody`].
    pub certificate: String,
    /// Base32 Ed25519 signature over the bytes of `certificate`.
    pub signature: String,
}

impl SignedCertificate {
    /// Canonicalizes and signs a certificate body.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::Canonicalization`] when the body cannot be
    /// serialized.
    pub fn issue(body: &CertificateBody, signing_key: &PrivateKey) -> Result<Self, CertificateError> {
        let certificate = canonical_json_string(body)?;
        let signature = signing_key.sign(certificate.as_bytes());
        Ok(Self {
            certificate,
            signature,
        })
    }

    /// Parses a certificate from its JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError`] when the input is too large or not a
    /// certificate object.
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CertificateError> {
        if bytes.len() > MAX_CERTIFICATE_BYTES {
            return Err(CertificateError::TooLarge {
                size: bytes.len(),
                limit: MAX_CERTIFICATE_BYTES,
            });
        }
        serde_json::from_slice(bytes).map_err(|err| CertificateError::Malformed(err.to_string()))
    }

    /// Parses the signed body without checking the signature.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError`] when the body is too large or malformed.
    pub fn body(&self) -> Result<CertificateBody, CertificateError> {
        if self.certificate.len() > MAX_CERTIFICATE_BYTES {
            return Err(CertificateError::TooLarge {
                size: self.certificate.len(),
                limit: MAX_CERTIFICATE_BYTES,
            });
        }
        serde_json::from_str(&self.certificate)
            .map_err(|err| CertificateError::Malformed(err.to_string()))
    }

    /// Verifies the signature over the certificate bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CertificateError::BadSignature`] when verification fails.
    pub fn verify_signature(&self, issuer: &PublicKey) -> Result<(), CertificateError> {
        issuer
            .verify(self.certificate.as_bytes(), &self.signature)
            .map_err(|_| CertificateError::BadSignature)
    }

    /// Fully validates the certificate for a presenting server at `now`.
    ///
    /// Checks, in order: signature, body shape, expiry, and subject key.
    ///
    /// # Errors
    ///
    /// Returns the first [`CertificateError`] encountered.
    pub fn validate(
        &self,
        issuer: &PublicKey,
        subject: &PublicKey,
        now: Timestamp,
    ) -> Result<CertificateBody, CertificateError> {
        self.verify_signature(issuer)?;
        let body = self.body()?;
        if body.expires <= now {
            return Err(CertificateError::Expired {
                expires: body.expires,
                now,
            });
        }
        if body.public_key != *subject {
            return Err(CertificateError::KeyMismatch);
        }
        Ok(body)
    }

    /// Returns the SHA-256 digest of the signed certificate text.
    #[must_use]
    pub fn digest(&self) -> HashDigest {
        hash_bytes(self.certificate.as_bytes())
    }
}
