// crates/grid-manager-cli/src/lib.rs
// ============================================================================
// Module: Grid Manager CLI Library
// Description: Shared helpers for the grid-manager binary.
// Purpose: Expose the message catalog to the binary and its tests.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Library half of the `grid-manager` CLI. User-facing strings live in the
//! [`i18n`] catalog and are formatted through the [`t!`] macro.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod i18n;

#[cfg(test)]
mod tests;
