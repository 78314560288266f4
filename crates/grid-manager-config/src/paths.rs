// crates/grid-manager-config/src/paths.rs
// ============================================================================
// Module: Path and Size Limits
// Description: Shared limits for every file the config crate reads.
// Purpose: Reject oversized paths and inputs before touching their contents.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Helpers shared by the client config loader, the file stores, and the CLI.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::io::Read;
use std::path::Path;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum length of a single path component.
pub const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
pub const MAX_TOTAL_PATH_LENGTH: usize = 4096;

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns a description of the first path limit `path` violates.
#[must_use]
pub fn path_violation(path: &Path) -> Option<&'static str> {
    if path.to_string_lossy().len() > MAX_TOTAL_PATH_LENGTH {
        return Some("path exceeds max length");
    }
    path.components()
        .any(|component| component.as_os_str().to_string_lossy().len() > MAX_PATH_COMPONENT_LENGTH)
        .then_some("path component too long")
}

/// Outcome of a bounded read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoundedRead {
    /// The full input, within the limit.
    Complete(Vec<u8>),
    /// The input exceeded the limit; carries the bytes observed.
    TooLarge(usize),
}

/// Reads at most `limit` bytes, reporting inputs that exceed it.
///
/// At most `limit + 1` bytes are consumed from `reader`.
///
/// # Errors
///
/// Returns the underlying I/O error when reading fails.
pub fn read_bounded(reader: impl Read, limit: usize) -> std::io::Result<BoundedRead> {
    let mut bytes = Vec::new();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);
    reader.take(cap).read_to_end(&mut bytes)?;
    if bytes.len() > limit {
        return Ok(BoundedRead::TooLarge(bytes.len()));
    }
    Ok(BoundedRead::Complete(bytes))
}
