// crates/grid-manager-core/src/core/time.rs
// ============================================================================
// Module: Grid Manager Time Model
// Description: Canonical timestamp representation for certificates and status.
// Purpose: Keep expiry checks and status snapshots deterministic and replayable.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Certificate expiry and connection status are evaluated against explicit
//! time values. The core never reads wall-clock time; hosts supply `now` on
//! every call.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

// ============================================================================
// SECTION: Time Values
// ============================================================================

/// Seconds since the Unix epoch.
///
/// # Invariants
/// - Values are explicitly provided by callers; the core never reads wall-clock time.
/// - Arithmetic saturates instead of overflowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    /// Creates a timestamp from Unix seconds.
    #[must_use]
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Returns the timestamp as Unix seconds.
    #[must_use]
    pub const fn as_unix_seconds(self) -> i64 {
        self.0
    }

    /// Returns a timestamp `seconds` later, saturating at the representable bound.
    #[must_use]
    pub fn saturating_add_seconds(self, seconds: u64) -> Self {
        let delta = i64::try_from(seconds).unwrap_or(i64::MAX);
        Self(self.0.saturating_add(delta))
    }

    /// Returns `self - earlier` in whole seconds (negative when `earlier` is later).
    #[must_use]
    pub const fn seconds_since(self, earlier: Self) -> i64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
