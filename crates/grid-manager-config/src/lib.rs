// crates/grid-manager-config/src/lib.rs
// ============================================================================
// Module: Grid Manager Config Library
// Description: Client configuration and on-disk Grid Manager state.
// Purpose: Single source of truth for config files and certificate files.
// Dependencies: grid-manager-core, serde, serde_json, toml
// ============================================================================

//! ## Overview
//! `grid-manager-config` loads the client trust configuration, persists the
//! Grid Manager authority state, names certificate files, and installs
//! certificates on storage nodes. Every loader enforces size and path limits
//! and fails closed; [`read_bounded`] is the one bounded reader shared with
//! the CLI.
//!
//! Security posture: all file inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod certificates;
pub mod client;
pub mod paths;
pub mod signing;
pub mod store;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use certificates::*;
pub use client::*;
pub use paths::*;
pub use signing::*;
pub use store::*;
