// crates/grid-manager-core/src/lib.rs
// ============================================================================
// Module: Grid Manager Core Library
// Description: Public API surface for the Grid Manager core.
// Purpose: Expose core types, interfaces, audit sinks, and runtime helpers.
// Dependencies: crate::{audit, core, interfaces, runtime}
// ============================================================================

//! ## Overview
//! Grid Manager core implements an offline certificate authority for storage
//! servers, the client-side trust policy that consumes its certificates, exact
//! happiness-checked share placement, and connection status reporting. It
//! performs no network I/O and never reads the clock.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;
pub mod runtime;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use core::*;

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::PlacementAuditEvent;
pub use audit::StderrAuditSink;
pub use audit::TrustAuditEvent;
pub use interfaces::AuditSink;
pub use interfaces::DirectoryError;
pub use interfaces::ServerDirectory;
pub use runtime::InMemoryServerDirectory;
pub use runtime::PlacementCandidate;
pub use runtime::PlacementInput;
pub use runtime::TrustVerdict;
pub use runtime::UploadContext;
pub use runtime::UploadGate;
pub use runtime::UploadGateError;
pub use runtime::assess_trust;
pub use runtime::evaluate_trust;
pub use runtime::from_reconnection_info;
pub use runtime::hint_statuses;
pub use runtime::select_peers;
pub use runtime::servers_of_happiness;
pub use runtime::trusted_reachable;
