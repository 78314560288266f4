// crates/grid-manager-cli/src/main_tests.rs
// ============================================================================
// Module: CLI Main Helpers Tests
// Description: Unit tests for bounded input reads in the CLI entry point.
// Purpose: Ensure bounded reads fail closed on oversized inputs.
// Dependencies: grid-manager-cli main helpers
// ============================================================================

//! ## Overview
//! Validates `read_input` enforces size limits for CLI inputs and names the
//! failing source.
//!
//! Security posture: CLI inputs are untrusted; size limits must fail closed.

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

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs;

use super::read_input;

// ============================================================================
// SECTION: Tests
// ============================================================================

#[test]
fn read_input_accepts_exact_limit() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("exact.bin");
    fs::write(&path, [7_u8; 16]).expect("write");
    let bytes = read_input(&path.display().to_string(), 16, "certificate").expect("within limit");
    assert_eq!(bytes.len(), 16);
}

#[test]
fn read_input_rejects_oversized_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("big.bin");
    fs::write(&path, [7_u8; 17]).expect("write");
    let err = read_input(&path.display().to_string(), 16, "certificate").expect_err("too large");
    assert!(err.to_string().contains("exceeds 16 bytes"));
}

#[test]
fn read_input_error_names_the_source() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("absent.cert");
    let source = path.display().to_string();
    let err = read_input(&source, 16, "certificate").expect_err("missing input");
    assert!(err.to_string().contains("certificate"));
    assert!(err.to_string().contains(&source));
}
