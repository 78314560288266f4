// crates/grid-manager-core/src/runtime/placement.rs
// ============================================================================
// Module: Grid Manager Peer Selection
// Description: Assigns shares to trusted servers and enforces happiness.
// Purpose: Decide go or no-go for an upload before any share is written.
// Dependencies: crate::{core, runtime::matching}
// ============================================================================

//! ## Overview
//! Peer selection runs in three steps:
//! 1. Build the eligibility graph. A server may hold a share it already
//!    stores, and may receive any share when it accepts writes and has not
//!    rejected this file.
//! 2. Compute a maximum matching seeded from existing holdings, so stored
//!    shares are reused wherever that does not cost happiness. Shares left
//!    over go to an existing holder, or else to the least-loaded writable
//!    server (ties broken by server id).
//! 3. Measure happiness of the final layout exactly and compare it to the
//!    threshold.
//!
//! Selection is pure. Nothing is written; the returned plan lists which
//! shares need uploads.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::identifiers::ServerId;
use crate::core::identifiers::ShareNumber;
use crate::core::placement::PlacementError;
use crate::core::placement::PlacementPlan;
use crate::core::placement::PlacementRequest;
use crate::core::placement::ShareAssignment;
use crate::core::placement::UnhappinessError;
use crate::core::trust::ServerDescriptor;
use crate::runtime::matching::HappinessGraph;
use crate::runtime::matching::servers_of_happiness;

// ============================================================================
// SECTION: Inputs
// ============================================================================

/// Trusted, reachable server offered to peer selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementCandidate {
    /// Server identifier.
    pub server_id: ServerId,
    /// Whether the server accepts new shares.
    pub accepting_shares: bool,
}

impl From<&ServerDescriptor> for PlacementCandidate {
    fn from(server: &ServerDescriptor) -> Self {
        Self {
            server_id: server.server_id.clone(),
            accepting_shares: server.accepting_shares,
        }
    }
}

/// Complete input to [`select_peers`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementInput {
    /// Erasure-coding shape and threshold.
    pub request: PlacementRequest,
    /// Trusted, reachable servers.
    pub candidates: Vec<PlacementCandidate>,
    /// Shares already stored, per server.
    pub existing: BTreeMap<ServerId, BTreeSet<ShareNumber>>,
    /// Servers that refused storage for this file.
    pub rejected: BTreeSet<ServerId>,
}

impl PlacementInput {
    /// Creates an input with no existing shares and no rejections.
    #[must_use]
    pub const fn new(request: PlacementRequest, candidates: Vec<PlacementCandidate>) -> Self {
        Self {
            request,
            candidates,
            existing: BTreeMap::new(),
            rejected: BTreeSet::new(),
        }
    }

    /// Records shares already stored on a server.
    #[must_use]
    pub fn with_existing(
        mut self,
        server: ServerId,
        shares: impl IntoIterator<Item = ShareNumber>,
    ) -> Self {
        self.existing.entry(server).or_default().extend(shares);
        self
    }

    /// Records a server that refused storage for this file.
    #[must_use]
    pub fn with_rejected(mut self, server: ServerId) -> Self {
        self.rejected.insert(server);
        self
    }
}

// ============================================================================
// SECTION: Selection
// ============================================================================

/// Selects servers for every share and enforces the happiness threshold.
///
/// # Errors
///
/// Returns [`PlacementError::Unhappy`] when the final layout cannot reach
/// the requested happiness.
pub fn select_peers(input: &PlacementInput) -> Result<PlacementPlan, PlacementError> {
    let request = input.request;
    let required = usize::from(request.happy());

    let mut writable: BTreeMap<ServerId, bool> = BTreeMap::new();
    for candidate in &input.candidates {
        let accepts =
            candidate.accepting_shares && !input.rejected.contains(&candidate.server_id);
        writable
            .entry(candidate.server_id.clone())
            .and_modify(|current| *current = *current && accepts)
            .or_insert(accepts);
    }
    let servers_considered = writable.len();

    let holdings: BTreeMap<ServerId, BTreeSet<ShareNumber>> = input
        .existing
        .iter()
        .filter(|(server, _)| writable.contains_key(*server))
        .map(|(server, shares)| {
            let in_range: BTreeSet<ShareNumber> =
                shares.iter().copied().filter(|share| share.get() < request.total()).collect();
            (server.clone(), in_range)
        })
        .filter(|(_, shares)| !shares.is_empty())
        .collect();

    let eligible = writable
        .iter()
        .filter(|(server, accepts)| **accepts || holdings.contains_key(*server))
        .count();
    if eligible < required {
        return Err(unhappy(request, eligible, servers_considered));
    }

    let shares: Vec<ShareNumber> = request.shares().collect();
    let server_ids: Vec<ServerId> = writable.keys().cloned().collect();
    let holds = |server: &ServerId, share: ShareNumber| -> bool {
        holdings.get(server).is_some_and(|held| held.contains(&share))
    };

    let mut graph = HappinessGraph::new(shares.clone(), server_ids.clone());
    let mut stored = HappinessGraph::new(shares.clone(), server_ids.clone());
    for (server_index, (server, accepts)) in writable.iter().enumerate() {
        for (share_index, share) in shares.iter().enumerate() {
            let held = holds(server, *share);
            if held {
                stored.add_edge(share_index, server_index);
            }
            if held || *accepts {
                graph.add_edge(share_index, server_index);
            }
        }
    }
    let matching = graph.maximum_matching_from(&stored.maximum_matching());

    let mut assignment = ShareAssignment::new();
    let mut uploads = ShareAssignment::new();
    let mut load: BTreeMap<&ServerId, usize> = server_ids.iter().map(|id| (id, 0)).collect();
    for (share_index, server_index) in matching.pairs() {
        let share = shares[share_index];
        let server = &server_ids[server_index];
        assignment.assign(share, server.clone());
        if !holds(server, share) {
            uploads.assign(share, server.clone());
        }
        *load.entry(server).or_default() += 1;
    }

    let mut unplaced = Vec::new();
    for share in &shares {
        if assignment.get(*share).is_some() {
            continue;
        }
        if let Some(holder) = server_ids.iter().find(|server| holds(*server, *share)) {
            assignment.assign(*share, holder.clone());
            *load.entry(holder).or_default() += 1;
            continue;
        }
        let target = writable
            .iter()
            .filter(|(_, accepts)| **accepts)
            .map(|(server, _)| server)
            .min_by_key(|server| (load.get(server).copied().unwrap_or_default(), *server));
        match target {
            Some(server) => {
                assignment.assign(*share, server.clone());
                uploads.assign(*share, server.clone());
                *load.entry(server).or_default() += 1;
            }
            None => unplaced.push(*share),
        }
    }

    let mut layout = holdings.clone();
    for (share, server) in assignment.iter() {
        layout.entry(server.clone()).or_default().insert(*share);
    }
    let happiness = servers_of_happiness(&layout);
    if happiness < required {
        return Err(unhappy(request, happiness, servers_considered));
    }
    Ok(PlacementPlan {
        assignment,
        uploads,
        happiness,
        unplaced,
    })
}

/// Builds the unhappiness error for a request.
fn unhappy(
    request: PlacementRequest,
    achieved: usize,
    servers_considered: usize,
) -> PlacementError {
    PlacementError::Unhappy(UnhappinessError {
        achieved,
        required: usize::from(request.happy()),
        needed: request.needed(),
        total: request.total(),
        servers_considered,
    })
}
