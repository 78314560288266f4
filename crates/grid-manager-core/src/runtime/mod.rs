// crates/grid-manager-core/src/runtime/mod.rs
// ============================================================================
// Module: Grid Manager Runtime
// Description: Trust evaluation, peer selection, and status classification.
// Purpose: Execute trust and placement decisions over explicit inputs.
// Dependencies: crate::{audit, core, interfaces}
// ============================================================================

//! ## Overview
//! Runtime modules are pure functions over core types, plus the upload gate
//! that wires them to a server directory and an audit sink. No runtime
//! function reads the clock; every decision takes `now` explicitly.

// ============================================================================
// SECTION: Submodules
// ============================================================================

pub mod directory;
pub mod gate;
pub mod matching;
pub mod placement;
pub mod status;
pub mod trust;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use directory::InMemoryServerDirectory;
pub use gate::UploadContext;
pub use gate::UploadGate;
pub use gate::UploadGateError;
pub use matching::HappinessGraph;
pub use matching::Matching;
pub use matching::servers_of_happiness;
pub use placement::PlacementCandidate;
pub use placement::PlacementInput;
pub use placement::select_peers;
pub use status::from_reconnection_info;
pub use status::hint_statuses;
pub use trust::TrustVerdict;
pub use trust::assess_trust;
pub use trust::evaluate_trust;
pub use trust::trusted_reachable;
