// crates/grid-manager-core/src/core/placement.rs
// ============================================================================
// Module: Grid Manager Placement Model
// Description: Erasure-coding shape, share assignments, and placement outcomes.
// Purpose: Provide the validated inputs and outputs of peer selection.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! A [`PlacementRequest`] describes how many shares a file is split into
//! (`total`), how many are needed to recover it (`needed`), and how many
//! distinct servers must hold shares before an upload is acceptable
//! (`happy`). Shares are numbered from zero.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Serialize;
use thiserror::Error;

use crate::core::identifiers::ServerId;
use crate::core::identifiers::ShareNumber;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum number of shares per file.
pub const MAX_TOTAL_SHARES: u16 = 256;

// ============================================================================
// SECTION: Placement Request
// ============================================================================

/// Erasure-coding shape and happiness threshold.
///
/// # Invariants
/// - `1 <= needed <= happy <= total <= MAX_TOTAL_SHARES`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacementRequest {
    /// Shares required to reconstruct the file.
    needed: u16,
    /// Distinct servers required before an upload is accepted.
    happy: u16,
    /// Shares produced by erasure coding.
    total: u16,
}

impl PlacementRequest {
    /// Validates and builds a placement request.
    ///
    /// # Errors
    ///
    /// Returns [`PlacementError::InvalidRequest`] when the ordering invariant
    /// does not hold.
    pub fn new(needed: u16, happy: u16, total: u16) -> Result<Self, PlacementError> {
        if needed == 0 {
            return Err(PlacementError::InvalidRequest("needed must be at least 1".to_string()));
        }
        if needed > happy {
            return Err(PlacementError::InvalidRequest(format!(
                "needed ({needed}) must not exceed happy ({happy})"
            )));
        }
        if happy > total {
            return Err(PlacementError::InvalidRequest(format!(
                "happy ({happy}) must not exceed total ({total})"
            )));
        }
        if total > MAX_TOTAL_SHARES {
            return Err(PlacementError::InvalidRequest(format!(
                "total ({total}) must not exceed {MAX_TOTAL_SHARES}"
            )));
        }
        Ok(Self {
            needed,
            happy,
            total,
        })
    }

    /// Returns the number of shares needed to recover the file.
    #[must_use]
    pub const fn needed(self) -> u16 {
        self.needed
    }

    /// Returns the happiness threshold.
    #[must_use]
    pub const fn happy(self) -> u16 {
        self.happy
    }

    /// Returns the total number of shares.
    #[must_use]
    pub const fn total(self) -> u16 {
        self.total
    }

    /// Iterates every share number of the file.
    pub fn shares(self) -> impl Iterator<Item = ShareNumber> {
        (0 .. self.total).map(ShareNumber::new)
    }
}

// ============================================================================
// SECTION: Assignments
// ============================================================================

/// Mapping from share number to the server that holds or will hold it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ShareAssignment(BTreeMap<ShareNumber, ServerId>);

impl ShareAssignment {
    /// Creates an empty assignment.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Assigns a share, replacing any previous server.
    pub fn assign(&mut self, share: ShareNumber, server: ServerId) {
        self.0.insert(share, server);
    }

    /// Returns the server assigned to `share`.
    #[must_use]
    pub fn get(&self, share: ShareNumber) -> Option<&ServerId> {
        self.0.get(&share)
    }

    /// Returns the number of assigned shares.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true when no shares are assigned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates assignments in share order.
    pub fn iter(&self) -> impl Iterator<Item = (&ShareNumber, &ServerId)> {
        self.0.iter()
    }

    /// Returns the distinct servers used by this assignment.
    #[must_use]
    pub fn servers(&self) -> BTreeSet<&ServerId> {
        self.0.values().collect()
    }
}

/// Accepted outcome of peer selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlacementPlan {
    /// Final holder of every placed share, including shares already stored.
    pub assignment: ShareAssignment,
    /// Subset of `assignment` that requires a new write.
    pub uploads: ShareAssignment,
    /// Exact happiness of the final layout.
    pub happiness: usize,
    /// Shares no eligible server could take.
    pub unplaced: Vec<ShareNumber>,
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Placement could not reach the happiness threshold.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error(
    "shares could be placed on only {achieved} server(s) such that any {needed} of them have \
     enough shares to recover the file, but we were asked to place shares on at least \
     {required} such servers (servers considered: {servers_considered}, total shares: {total})"
)]
pub struct UnhappinessError {
    /// Happiness actually achievable.
    pub achieved: usize,
    /// Required happiness threshold.
    pub required: usize,
    /// Shares needed to recover the file.
    pub needed: u16,
    /// Total shares of the file.
    pub total: u16,
    /// Trusted, reachable servers that were considered.
    pub servers_considered: usize,
}

/// Errors raised by peer selection.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    /// The placement request violated its invariants.
    #[error("invalid placement request: {0}")]
    InvalidRequest(String),
    /// Happiness could not be satisfied.
    #[error(transparent)]
    Unhappy(#[from] UnhappinessError),
}
