// crates/grid-manager-core/src/interfaces/mod.rs
// ============================================================================
// Module: Grid Manager Interfaces
// Description: Seams between the core and the transport and logging layers.
// Purpose: Define the contract surfaces used by the upload gate.
// Dependencies: crate::{core, audit}, thiserror
// ============================================================================

//! ## Overview
//! The core never talks to the network or chooses where logs go. Hosts plug
//! in a [`ServerDirectory`] that reports the current server set and an
//! [`AuditSink`] that receives decision events. Implementations must return
//! fresh data on every call and fail closed when they cannot.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::audit::PlacementAuditEvent;
use crate::audit::TrustAuditEvent;
use crate::core::trust::ServerDescriptor;

// ============================================================================
// SECTION: Server Directory
// ============================================================================

/// Server directory errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DirectoryError {
    /// The directory could not produce a snapshot.
    #[error("server directory unavailable: {0}")]
    Unavailable(String),
}

/// Source of the client's current view of storage servers.
pub trait ServerDirectory {
    /// Returns a snapshot of every known server at the moment of the call.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError`] when no snapshot can be produced.
    fn snapshot(&self) -> Result<Vec<ServerDescriptor>, DirectoryError>;
}

// ============================================================================
// SECTION: Audit Sink
// ============================================================================

/// Destination for trust and placement decision events.
pub trait AuditSink: Send + Sync {
    /// Records a trust decision.
    fn record_trust(&self, event: &TrustAuditEvent);

    /// Records a placement decision.
    fn record_placement(&self, _event: &PlacementAuditEvent) {}
}
