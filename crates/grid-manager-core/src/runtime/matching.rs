// crates/grid-manager-core/src/runtime/matching.rs
// ============================================================================
// Module: Grid Manager Happiness Matching
// Description: Exact maximum bipartite matching between shares and servers.
// Purpose: Measure happiness as the size of a maximum share-server matching.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! [`HappinessGraph`] holds shares on the left, servers on the right, and an
//! edge wherever a server may hold a share. Matching uses augmenting paths
//! (Kuhn's algorithm), which is exact: once no augmenting path starts at a
//! share, none ever will, so one pass over the shares yields a maximum
//! matching. A matching may be seeded with any valid partial matching and is
//! still maximum after augmentation.
//!
//! Graphs are at most 256 shares wide, so the recursive search depth is
//! bounded by the share count.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use crate::core::identifiers::ServerId;
use crate::core::identifiers::ShareNumber;

// ============================================================================
// SECTION: Matching
// ============================================================================

/// Pairing of share indices to server indices within a [`HappinessGraph`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Matching {
    /// Matched server index per share index.
    share_to_server: Vec<Option<usize>>,
    /// Matched share index per server index.
    server_to_share: Vec<Option<usize>>,
}

impl Matching {
    /// Creates an empty matching for the given graph dimensions.
    fn empty(shares: usize, servers: usize) -> Self {
        Self {
            share_to_server: vec![None; shares],
            server_to_share: vec![None; servers],
        }
    }

    /// Records `share` and `server` as matched to each other.
    fn pair(&mut self, share: usize, server: usize) {
        self.share_to_server[share] = Some(server);
        self.server_to_share[server] = Some(share);
    }

    /// Returns the number of matched pairs.
    #[must_use]
    pub fn size(&self) -> usize {
        self.share_to_server.iter().flatten().count()
    }

    /// Iterates matched `(share_index, server_index)` pairs in share order.
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.share_to_server
            .iter()
            .enumerate()
            .filter_map(|(share, server)| server.map(|server| (share, server)))
    }
}

// ============================================================================
// SECTION: Graph
// ============================================================================

/// Bipartite eligibility graph between shares and servers.
#[derive(Debug, Clone)]
pub struct HappinessGraph {
    /// Left-side vertices.
    shares: Vec<ShareNumber>,
    /// Right-side vertices.
    servers: Vec<ServerId>,
    /// Server indices adjacent to each share index, ascending.
    adjacency: Vec<BTreeSet<usize>>,
}

impl HappinessGraph {
    /// Creates a graph with the given vertices and no edges.
    #[must_use]
    pub fn new(shares: Vec<ShareNumber>, servers: Vec<ServerId>) -> Self {
        let adjacency = vec![BTreeSet::new(); shares.len()];
        Self {
            shares,
            servers,
            adjacency,
        }
    }

    /// Builds the graph of an existing layout: one edge per stored share.
    #[must_use]
    pub fn from_layout(layout: &BTreeMap<ServerId, BTreeSet<ShareNumber>>) -> Self {
        let shares: Vec<ShareNumber> =
            layout.values().flatten().copied().collect::<BTreeSet<_>>().into_iter().collect();
        let servers: Vec<ServerId> = layout.keys().cloned().collect();
        let mut graph = Self::new(shares, servers);
        for (server_index, held) in layout.values().enumerate() {
            for share in held {
                if let Some(share_index) = graph.share_index(*share) {
                    graph.add_edge(share_index, server_index);
                }
            }
        }
        graph
    }

    /// Adds an edge; out-of-range indices are ignored.
    pub fn add_edge(&mut self, share: usize, server: usize) {
        if server < self.servers.len()
            && let Some(edges) = self.adjacency.get_mut(share)
        {
            edges.insert(server);
        }
    }

    /// Returns true when `share` and `server` are adjacent.
    #[must_use]
    pub fn has_edge(&self, share: usize, server: usize) -> bool {
        self.adjacency.get(share).is_some_and(|edges| edges.contains(&server))
    }

    /// Returns the index of a share vertex.
    #[must_use]
    pub fn share_index(&self, share: ShareNumber) -> Option<usize> {
        self.shares.iter().position(|candidate| *candidate == share)
    }

    /// Computes a maximum matching from scratch.
    #[must_use]
    pub fn maximum_matching(&self) -> Matching {
        self.augment(Matching::empty(self.shares.len(), self.servers.len()))
    }

    /// Extends `seed` to a maximum matching.
    ///
    /// Seed pairs that are not edges of this graph, or that conflict with an
    /// earlier seed pair, are dropped before augmenting.
    #[must_use]
    pub fn maximum_matching_from(&self, seed: &Matching) -> Matching {
        let mut matching = Matching::empty(self.shares.len(), self.servers.len());
        for (share, server) in seed.pairs() {
            if self.has_edge(share, server)
                && matching.share_to_server[share].is_none()
                && matching.server_to_share[server].is_none()
            {
                matching.pair(share, server);
            }
        }
        self.augment(matching)
    }

    /// Runs one augmenting-path search from every unmatched share.
    fn augment(&self, mut matching: Matching) -> Matching {
        let mut visited = vec![false; self.servers.len()];
        for share in 0 .. self.shares.len() {
            if matching.share_to_server[share].is_some() {
                continue;
            }
            visited.fill(false);
            self.try_augment(share, &mut visited, &mut matching);
        }
        matching
    }

    /// Searches for an augmenting path starting at `share`.
    ///
    /// Free servers are tried before re-routing a matched one, so seeded
    /// pairs move only when that is the sole way to grow the matching.
    fn try_augment(&self, share: usize, visited: &mut [bool], matching: &mut Matching) -> bool {
        let edges = &self.adjacency[share];
        let free = edges
            .iter()
            .copied()
            .find(|server| !visited[*server] && matching.server_to_share[*server].is_none());
        if let Some(server) = free {
            visited[server] = true;
            matching.pair(share, server);
            return true;
        }
        for &server in edges {
            if visited[server] {
                continue;
            }
            visited[server] = true;
            if let Some(other) = matching.server_to_share[server]
                && self.try_augment(other, visited, matching)
            {
                matching.pair(share, server);
                return true;
            }
        }
        false
    }
}

// ============================================================================
// SECTION: Happiness
// ============================================================================

/// Computes the exact happiness of an existing layout of shares on servers.
#[must_use]
pub fn servers_of_happiness(layout: &BTreeMap<ServerId, BTreeSet<ShareNumber>>) -> usize {
    HappinessGraph::from_layout(layout).maximum_matching().size()
}
