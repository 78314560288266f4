// crates/grid-manager-core/src/audit.rs
// ============================================================================
// Module: Grid Manager Audit Logging
// Description: Structured audit events for trust and placement decisions.
// Purpose: Emit JSON-line decision logs without a logging framework dependency.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Audit events record every trust classification and placement decision.
//! Trust events carry the outcome, the matching issuer label, and the digest
//! of the accepted certificate; the reason a certificate failed is never
//! logged.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::OpenOptions;
use std::io;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

use serde::Serialize;

use crate::core::hashing::HashDigest;
use crate::core::identifiers::IssuerLabel;
use crate::core::identifiers::ServerId;
use crate::core::time::Timestamp;
use crate::core::trust::ServerTrust;
use crate::core::trust::TrustMode;
use crate::interfaces::AuditSink;

// ============================================================================
// SECTION: Types
// ============================================================================

/// Trust decision audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrustAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Evaluation time.
    pub timestamp: Timestamp,
    /// Classified server.
    pub server_id: ServerId,
    /// Classification outcome.
    pub trust: ServerTrust,
    /// Client trust mode.
    pub mode: TrustMode,
    /// Issuer whose certificate was accepted, if any.
    pub issuer_label: Option<IssuerLabel>,
    /// SHA-256 digest of the accepted certificate, if any.
    pub certificate_digest: Option<HashDigest>,
}

/// Placement decision audit event payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementAuditEvent {
    /// Event identifier.
    pub event: &'static str,
    /// Decision time.
    pub timestamp: Timestamp,
    /// Shares needed to recover the file.
    pub needed: u16,
    /// Required happiness.
    pub happy: u16,
    /// Total shares.
    pub total: u16,
    /// Trusted, reachable servers considered.
    pub servers_considered: usize,
    /// Achieved happiness.
    pub happiness: usize,
    /// Whether the placement was accepted.
    pub accepted: bool,
}

/// Inputs required to construct a trust audit event.
pub struct TrustAuditEventParams {
    /// Evaluation time.
    pub timestamp: Timestamp,
    /// Classified server.
    pub server_id: ServerId,
    /// Classification outcome.
    pub trust: ServerTrust,
    /// Client trust mode.
    pub mode: TrustMode,
    /// Issuer whose certificate was accepted, if any.
    pub issuer_label: Option<IssuerLabel>,
    /// SHA-256 digest of the accepted certificate, if any.
    pub certificate_digest: Option<HashDigest>,
}

/// Inputs required to construct a placement audit event.
pub struct PlacementAuditEventParams {
    /// Decision time.
    pub timestamp: Timestamp,
    /// Shares needed to recover the file.
    pub needed: u16,
    /// Required happiness.
    pub happy: u16,
    /// Total shares.
    pub total: u16,
    /// Trusted, reachable servers considered.
    pub servers_considered: usize,
    /// Achieved happiness.
    pub happiness: usize,
    /// Whether the placement was accepted.
    pub accepted: bool,
}

impl TrustAuditEvent {
    /// Creates a trust decision event.
    #[must_use]
    pub fn new(params: TrustAuditEventParams) -> Self {
        Self {
            event: "trust_decision",
            timestamp: params.timestamp,
            server_id: params.server_id,
            trust: params.trust,
            mode: params.mode,
            issuer_label: params.issuer_label,
            certificate_digest: params.certificate_digest,
        }
    }
}

impl PlacementAuditEvent {
    /// Creates a placement decision event.
    #[must_use]
    pub const fn new(params: PlacementAuditEventParams) -> Self {
        Self {
            event: "placement_decision",
            timestamp: params.timestamp,
            needed: params.needed,
            happy: params.happy,
            total: params.total,
            servers_considered: params.servers_considered,
            happiness: params.happiness,
            accepted: params.accepted,
        }
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Audit sink that logs JSON lines to stderr.
pub struct StderrAuditSink;

impl AuditSink for StderrAuditSink {
    fn record_trust(&self, event: &TrustAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }

    fn record_placement(&self, event: &PlacementAuditEvent) {
        if let Ok(payload) = serde_json::to_string(event) {
            let _ = writeln!(std::io::stderr(), "{payload}");
        }
    }
}

/// Audit sink that logs JSON lines to a file.
pub struct FileAuditSink {
    /// File handle used for append-only logging.
    file: Mutex<std::fs::File>,
}

impl FileAuditSink {
    /// Opens the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened.
    pub fn new(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Appends one serialized event.
    fn append<T: Serialize>(&self, event: &T) {
        if let Ok(payload) = serde_json::to_string(event)
            && let Ok(mut file) = self.file.lock()
        {
            let _ = writeln!(file, "{payload}");
            let _ = file.flush();
        }
    }
}

impl AuditSink for FileAuditSink {
    fn record_trust(&self, event: &TrustAuditEvent) {
        self.append(event);
    }

    fn record_placement(&self, event: &PlacementAuditEvent) {
        self.append(event);
    }
}

/// No-op audit sink.
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record_trust(&self, _event: &TrustAuditEvent) {}

    fn record_placement(&self, _event: &PlacementAuditEvent) {}
}
