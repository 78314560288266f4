// crates/grid-manager-cli/src/tests/mod.rs
// ============================================================================
// Module: CLI Unit Tests
// Description: Unit tests for CLI library helpers.
// Purpose: Group crate-internal tests.
// Dependencies: grid-manager-cli
// ============================================================================

//! ## Overview
//! Crate-internal unit tests.

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

mod i18n;
