// crates/grid-manager-core/src/runtime/gate.rs
// ============================================================================
// Module: Grid Manager Upload Gate
// Description: Go or no-go coordinator for uploads.
// Purpose: Combine a fresh server snapshot, trust filtering, and peer selection.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! [`UploadGate`] is the single entry point an uploader calls before writing
//! shares. Every call pulls a fresh snapshot from the [`ServerDirectory`],
//! re-evaluates trust for every server, and runs peer selection over the
//! trusted and reachable subset. Nothing is cached between calls, so a
//! certificate that expired or a server that disconnected since the previous
//! decision is never counted.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use thiserror::Error;

use crate::audit::PlacementAuditEvent;
use crate::audit::PlacementAuditEventParams;
use crate::audit::TrustAuditEvent;
use crate::audit::TrustAuditEventParams;
use crate::core::identifiers::ServerId;
use crate::core::identifiers::ShareNumber;
use crate::core::placement::PlacementError;
use crate::core::placement::PlacementPlan;
use crate::core::placement::PlacementRequest;
use crate::core::time::Timestamp;
use crate::core::trust::ServerTrust;
use crate::core::trust::TrustPolicy;
use crate::interfaces::AuditSink;
use crate::interfaces::DirectoryError;
use crate::interfaces::ServerDirectory;
use crate::runtime::placement::PlacementCandidate;
use crate::runtime::placement::PlacementInput;
use crate::runtime::placement::select_peers;
use crate::runtime::trust::assess_trust;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by the upload gate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UploadGateError {
    /// The server directory could not produce a snapshot.
    #[error(transparent)]
    Directory(#[from] DirectoryError),
    /// Peer selection rejected the upload.
    #[error(transparent)]
    Placement(#[from] PlacementError),
}

// ============================================================================
// SECTION: Upload Context
// ============================================================================

/// Per-file state carried between placement attempts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadContext {
    /// Shares already known to be stored, per server.
    pub existing: BTreeMap<ServerId, BTreeSet<ShareNumber>>,
    /// Servers that refused storage for this file.
    pub rejected: BTreeSet<ServerId>,
}

// ============================================================================
// SECTION: Upload Gate
// ============================================================================

/// Coordinator deciding whether an upload may proceed.
pub struct UploadGate<D, A> {
    /// Source of the current server set.
    directory: D,
    /// Decision event sink.
    audit: A,
    /// Client trust policy.
    policy: TrustPolicy,
    /// Erasure-coding shape and threshold.
    request: PlacementRequest,
}

impl<D, A> UploadGate<D, A>
where
    D: ServerDirectory,
    A: AuditSink,
{
    /// Creates an upload gate.
    #[must_use]
    pub const fn new(directory: D, audit: A, policy: TrustPolicy, request: PlacementRequest) -> Self {
        Self {
            directory,
            audit,
            policy,
            request,
        }
    }

    /// Returns the trust policy.
    #[must_use]
    pub const fn policy(&self) -> &TrustPolicy {
        &self.policy
    }

    /// Returns the placement request.
    #[must_use]
    pub const fn request(&self) -> PlacementRequest {
        self.request
    }

    /// Decides placement for one upload at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`UploadGateError`] when no snapshot is available or the
    /// happiness threshold cannot be met.
    pub fn decide(
        &self,
        context: &UploadContext,
        now: Timestamp,
    ) -> Result<PlacementPlan, UploadGateError> {
        let servers = self.directory.snapshot()?;
        let mut candidates = Vec::new();
        for server in &servers {
            let verdict = assess_trust(&self.policy, server, now);
            self.audit.record_trust(&TrustAuditEvent::new(TrustAuditEventParams {
                timestamp: now,
                server_id: server.server_id.clone(),
                trust: verdict.trust,
                mode: verdict.mode,
                issuer_label: verdict.issuer,
                certificate_digest: verdict.certificate,
            }));
            if server.reachable && verdict.trust == ServerTrust::Trusted {
                candidates.push(PlacementCandidate::from(server));
            }
        }
        let servers_considered = candidates.len();
        let input = PlacementInput {
            request: self.request,
            candidates,
            existing: context.existing.clone(),
            rejected: context.rejected.clone(),
        };
        let outcome = select_peers(&input);
        let happiness = match &outcome {
            Ok(plan) => plan.happiness,
            Err(PlacementError::Unhappy(error)) => error.achieved,
            Err(PlacementError::InvalidRequest(_)) => 0,
        };
        self.audit.record_placement(&PlacementAuditEvent::new(PlacementAuditEventParams {
            timestamp: now,
            needed: self.request.needed(),
            happy: self.request.happy(),
            total: self.request.total(),
            servers_considered,
            happiness,
            accepted: outcome.is_ok(),
        }));
        outcome.map_err(UploadGateError::from)
    }
}
