// crates/grid-manager-core/tests/certificate.rs
// ============================================================================
// Module: Certificate Tests
// Description: Tests for certificate canonical form and validation order.
// ============================================================================
//! ## Overview
//! Validates the canonical certificate text and each validation failure.

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

use grid_manager_core::CertificateBody;
use grid_manager_core::CertificateError;
use grid_manager_core::MAX_CERTIFICATE_BYTES;
use grid_manager_core::PrivateKey;
use grid_manager_core::ServerName;
use grid_manager_core::SignedCertificate;
use grid_manager_core::Timestamp;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn issuer() -> PrivateKey {
    PrivateKey::from_seed(&[21; 32])
}

fn subject() -> PrivateKey {
    PrivateKey::from_seed(&[22; 32])
}

fn body(expires: i64) -> CertificateBody {
    CertificateBody {
        name: ServerName::new("zara"),
        public_key: subject().public_key(),
        version: 1,
        expires: Timestamp::from_unix_seconds(expires),
    }
}

// ============================================================================
// SECTION: Canonical Form
// ============================================================================

/// Tests the signed text is canonical JSON with sorted keys.
#[test]
fn test_certificate_text_is_canonical() {
    let certificate = SignedCertificate::issue(&body(500), &issuer()).unwrap();
    let expected = format!(
        "{{\"expires\":500,\"name\":\"zara\",\"public_key\":\"{}\",\"version\":1}}",
        subject().public_key().encode()
    );
    assert_eq!(certificate.certificate, expected);
    assert_eq!(certificate.body().unwrap(), body(500));
}

/// Tests the distributed JSON object has exactly two string fields.
#[test]
fn test_certificate_json_shape() {
    let certificate = SignedCertificate::issue(&body(500), &issuer()).unwrap();
    let json = serde_json::to_value(&certificate).unwrap();
    let object = json.as_object().unwrap();
    assert_eq!(object.len(), 2);
    assert!(object["certificate"].is_string());
    assert!(object["signature"].is_string());
    let parsed = SignedCertificate::from_json_slice(&serde_json::to_vec(&json).unwrap()).unwrap();
    assert_eq!(parsed, certificate);
}

/// Tests digests are stable for identical certificates.
#[test]
fn test_digest_is_stable() {
    let first = SignedCertificate::issue(&body(500), &issuer()).unwrap();
    let second = SignedCertificate::issue(&body(500), &issuer()).unwrap();
    let other = SignedCertificate::issue(&body(501), &issuer()).unwrap();
    assert_eq!(first.digest(), second.digest());
    assert_ne!(first.digest(), other.digest());
    assert_eq!(first.digest().as_str().len(), 64);
}

// ============================================================================
// SECTION: Validation
// ============================================================================

/// Tests a fresh certificate validates for its subject.
#[test]
fn test_validate_accepts_fresh_certificate() {
    let certificate = SignedCertificate::issue(&body(500), &issuer()).unwrap();
    let result = certificate.validate(
        &issuer().public_key(),
        &subject().public_key(),
        Timestamp::from_unix_seconds(499),
    );
    assert_eq!(result, Ok(body(500)));
}

/// Tests expiry is exclusive at the expiry instant.
#[test]
fn test_validate_rejects_at_expiry_instant() {
    let certificate = SignedCertificate::issue(&body(500), &issuer()).unwrap();
    let result = certificate.validate(
        &issuer().public_key(),
        &subject().public_key(),
        Timestamp::from_unix_seconds(500),
    );
    assert!(matches!(result, Err(CertificateError::Expired { .. })));
}

/// Tests a certificate presented by another server is rejected.
#[test]
fn test_validate_rejects_key_mismatch() {
    let certificate = SignedCertificate::issue(&body(500), &issuer()).unwrap();
    let impostor = PrivateKey::from_seed(&[23; 32]).public_key();
    let result =
        certificate.validate(&issuer().public_key(), &impostor, Timestamp::from_unix_seconds(0));
    assert_eq!(result, Err(CertificateError::KeyMismatch));
}

/// Tests a certificate from another issuer is rejected before parsing.
#[test]
fn test_validate_rejects_foreign_issuer() {
    let certificate = SignedCertificate::issue(&body(500), &subject()).unwrap();
    let result = certificate.validate(
        &issuer().public_key(),
        &subject().public_key(),
        Timestamp::from_unix_seconds(0),
    );
    assert_eq!(result, Err(CertificateError::BadSignature));
}

/// Tests signed but malformed bodies are reported as malformed.
#[test]
fn test_validate_rejects_signed_garbage() {
    let text = "{\"name\":\"zara\"}".to_string();
    let certificate = SignedCertificate {
        signature: issuer().sign(text.as_bytes()),
        certificate: text,
    };
    let result = certificate.validate(
        &issuer().public_key(),
        &subject().public_key(),
        Timestamp::from_unix_seconds(0),
    );
    assert!(matches!(result, Err(CertificateError::Malformed(_))));
}

/// Tests oversized certificate input is rejected before parsing.
#[test]
fn test_from_json_slice_enforces_size_limit() {
    let oversized = vec![b' '; MAX_CERTIFICATE_BYTES + 1];
    assert_eq!(
        SignedCertificate::from_json_slice(&oversized),
        Err(CertificateError::TooLarge {
            size: MAX_CERTIFICATE_BYTES + 1,
            limit: MAX_CERTIFICATE_BYTES,
        })
    );
    assert!(matches!(
        SignedCertificate::from_json_slice(b"{\"certificate\": 1}"),
        Err(CertificateError::Malformed(_))
    ));
}
