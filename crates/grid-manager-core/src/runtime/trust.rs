// crates/grid-manager-core/src/runtime/trust.rs
// ============================================================================
// Module: Grid Manager Trust Evaluation
// Description: Classifies storage servers against a client trust policy.
// Purpose: Decide which servers may receive shares at a given instant.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Trust evaluation is a pure predicate over a policy, a server snapshot, and
//! the evaluation time. Results are never cached; callers re-evaluate on every
//! reconnection because certificates expire between checks.
//!
//! Security posture: certificate failures of every kind collapse into
//! [`ServerTrust::Untrusted`] so callers cannot probe which check failed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use crate::core::hashing::HashDigest;
use crate::core::identifiers::IssuerLabel;
use crate::core::time::Timestamp;
use crate::core::trust::ServerDescriptor;
use crate::core::trust::ServerTrust;
use crate::core::trust::TrustMode;
use crate::core::trust::TrustPolicy;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Trust classification together with the context that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustVerdict {
    /// Classification outcome.
    pub trust: ServerTrust,
    /// Policy mode in effect.
    pub mode: TrustMode,
    /// First issuer (in label order) whose certificate validated.
    pub issuer: Option<IssuerLabel>,
    /// Digest of the certificate that validated under `issuer`.
    pub certificate: Option<HashDigest>,
}

// ============================================================================
// SECTION: Evaluation
// ============================================================================

/// Classifies a server as trusted or untrusted at `now`.
#[must_use]
pub fn evaluate_trust(
    policy: &TrustPolicy,
    server: &ServerDescriptor,
    now: Timestamp,
) -> ServerTrust {
    assess_trust(policy, server, now).trust
}

/// Classifies a server and reports which issuer vouched for it.
#[must_use]
pub fn assess_trust(policy: &TrustPolicy, server: &ServerDescriptor, now: Timestamp) -> TrustVerdict {
    let mode = policy.mode();
    if mode == TrustMode::Legacy {
        return TrustVerdict {
            trust: ServerTrust::Trusted,
            mode,
            issuer: None,
            certificate: None,
        };
    }
    let accepted = policy.issuers().find_map(|(label, issuer_key)| {
        server
            .certificates
            .iter()
            .find(|certificate| certificate.validate(issuer_key, &server.public_key, now).is_ok())
            .map(|certificate| (label.clone(), certificate.digest()))
    });
    match accepted {
        Some((issuer, digest)) => TrustVerdict {
            trust: ServerTrust::Trusted,
            mode,
            issuer: Some(issuer),
            certificate: Some(digest),
        },
        None => TrustVerdict {
            trust: ServerTrust::Untrusted,
            mode,
            issuer: None,
            certificate: None,
        },
    }
}

/// Returns the servers that are both reachable and trusted at `now`.
#[must_use]
pub fn trusted_reachable<'a>(
    policy: &TrustPolicy,
    servers: &'a [ServerDescriptor],
    now: Timestamp,
) -> Vec<&'a ServerDescriptor> {
    servers
        .iter()
        .filter(|server| {
            server.reachable && evaluate_trust(policy, server, now) == ServerTrust::Trusted
        })
        .collect()
}
