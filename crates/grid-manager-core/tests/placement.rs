// crates/grid-manager-core/tests/placement.rs
// ============================================================================
// Module: Peer Selection Tests
// Description: Tests for share placement and exact happiness.
// ============================================================================
//! ## Overview
//! Validates acceptance and rejection scenarios, reuse of stored shares, and
//! that happiness is computed by exact matching rather than greedy counting.

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

use std::collections::BTreeMap;
use std::collections::BTreeSet;

use grid_manager_core::PlacementCandidate;
use grid_manager_core::PlacementError;
use grid_manager_core::PlacementInput;
use grid_manager_core::PlacementRequest;
use grid_manager_core::ServerId;
use grid_manager_core::ShareNumber;
use grid_manager_core::select_peers;
use grid_manager_core::servers_of_happiness;

// ============================================================================
// SECTION: Helpers
// ============================================================================

fn writable(id: &str) -> PlacementCandidate {
    PlacementCandidate {
        server_id: ServerId::new(id),
        accepting_shares: true,
    }
}

fn read_only(id: &str) -> PlacementCandidate {
    PlacementCandidate {
        server_id: ServerId::new(id),
        accepting_shares: false,
    }
}

fn shares(values: &[u16]) -> Vec<ShareNumber> {
    values.iter().copied().map(ShareNumber::new).collect()
}

fn layout(entries: &[(&str, &[u16])]) -> BTreeMap<ServerId, BTreeSet<ShareNumber>> {
    entries
        .iter()
        .map(|(id, held)| (ServerId::new(*id), shares(held).into_iter().collect()))
        .collect()
}

// ============================================================================
// SECTION: Request Validation
// ============================================================================

/// Tests the request ordering invariant.
#[test]
fn test_request_enforces_ordering() {
    assert!(PlacementRequest::new(3, 7, 10).is_ok());
    assert!(PlacementRequest::new(2, 2, 2).is_ok());
    assert!(matches!(PlacementRequest::new(0, 1, 1), Err(PlacementError::InvalidRequest(_))));
    assert!(matches!(PlacementRequest::new(3, 2, 4), Err(PlacementError::InvalidRequest(_))));
    assert!(matches!(PlacementRequest::new(1, 5, 4), Err(PlacementError::InvalidRequest(_))));
    assert!(matches!(PlacementRequest::new(1, 1, 257), Err(PlacementError::InvalidRequest(_))));
}

// ============================================================================
// SECTION: Scenarios
// ============================================================================

/// Tests two trusted servers satisfy k=1, h=2, n=2.
#[test]
fn test_two_servers_reach_happiness_two() {
    let request = PlacementRequest::new(1, 2, 2).unwrap();
    let input = PlacementInput::new(request, vec![writable("a"), writable("b")]);
    let plan = select_peers(&input).unwrap();
    assert_eq!(plan.happiness, 2);
    assert_eq!(plan.assignment.len(), 2);
    assert_eq!(plan.uploads, plan.assignment);
    assert_eq!(plan.assignment.servers().len(), 2);
    assert!(plan.unplaced.is_empty());
}

/// Tests a single trusted server cannot satisfy h=2.
#[test]
fn test_single_server_is_unhappy() {
    let request = PlacementRequest::new(2, 2, 2).unwrap();
    let input = PlacementInput::new(request, vec![writable("a")]);
    let Err(PlacementError::Unhappy(error)) = select_peers(&input) else {
        panic!("expected unhappiness");
    };
    assert_eq!(error.achieved, 1);
    assert_eq!(error.required, 2);
    assert_eq!(error.servers_considered, 1);
    assert!(error.to_string().contains("only 1 server(s)"));
}

/// Tests leftover shares spread across the least-loaded servers.
#[test]
fn test_leftover_shares_spread_evenly() {
    let request = PlacementRequest::new(1, 2, 5).unwrap();
    let input = PlacementInput::new(request, vec![writable("a"), writable("b")]);
    let plan = select_peers(&input).unwrap();
    assert_eq!(plan.happiness, 2);
    assert_eq!(plan.assignment.len(), 5);
    let on_a = plan.assignment.iter().filter(|(_, server)| server.as_str() == "a").count();
    assert!((2 ..= 3).contains(&on_a), "a holds {on_a} shares");
}

/// Tests shares already stored are reused instead of uploaded again.
#[test]
fn test_existing_shares_are_reused() {
    let request = PlacementRequest::new(1, 2, 2).unwrap();
    let input = PlacementInput::new(request, vec![writable("a"), writable("b")])
        .with_existing(ServerId::new("a"), shares(&[0]));
    let plan = select_peers(&input).unwrap();
    assert_eq!(plan.assignment.get(ShareNumber::new(0)), Some(&ServerId::new("a")));
    assert_eq!(plan.assignment.get(ShareNumber::new(1)), Some(&ServerId::new("b")));
    assert_eq!(plan.uploads.len(), 1);
    assert_eq!(plan.uploads.get(ShareNumber::new(1)), Some(&ServerId::new("b")));
}

/// Tests servers that rejected the file never receive uploads.
#[test]
fn test_rejected_servers_receive_nothing() {
    let request = PlacementRequest::new(1, 2, 3).unwrap();
    let input = PlacementInput::new(request, vec![writable("a"), writable("b"), writable("c")])
        .with_rejected(ServerId::new("b"));
    let plan = select_peers(&input).unwrap();
    assert!(plan.uploads.iter().all(|(_, server)| server.as_str() != "b"));
    assert_eq!(plan.happiness, 2);
}

/// Tests rejection can push a placement below the threshold.
#[test]
fn test_rejections_can_cause_unhappiness() {
    let request = PlacementRequest::new(1, 2, 2).unwrap();
    let input = PlacementInput::new(request, vec![writable("a"), writable("b")])
        .with_rejected(ServerId::new("b"));
    assert!(matches!(select_peers(&input), Err(PlacementError::Unhappy(_))));
}

/// Tests read-only servers count their stored shares but receive no uploads.
#[test]
fn test_read_only_servers_keep_existing_shares() {
    let request = PlacementRequest::new(1, 2, 3).unwrap();
    let input = PlacementInput::new(request, vec![read_only("a"), writable("b")])
        .with_existing(ServerId::new("a"), shares(&[2]));
    let plan = select_peers(&input).unwrap();
    assert_eq!(plan.happiness, 2);
    assert!(plan.uploads.iter().all(|(_, server)| server.as_str() == "b"));
    assert_eq!(plan.assignment.get(ShareNumber::new(2)), Some(&ServerId::new("a")));
}

/// Tests shares no server can take are reported as unplaced.
#[test]
fn test_unplaceable_shares_are_reported() {
    let request = PlacementRequest::new(1, 1, 3).unwrap();
    let input = PlacementInput::new(request, vec![read_only("a")])
        .with_existing(ServerId::new("a"), shares(&[0]));
    let plan = select_peers(&input).unwrap();
    assert_eq!(plan.happiness, 1);
    assert!(plan.uploads.is_empty());
    assert_eq!(plan.unplaced, shares(&[1, 2]));
}

/// Tests existing shares on servers outside the candidate set are ignored.
#[test]
fn test_holdings_of_untrusted_servers_do_not_count() {
    let request = PlacementRequest::new(1, 2, 2).unwrap();
    let input = PlacementInput::new(request, vec![read_only("a")])
        .with_existing(ServerId::new("a"), shares(&[0]))
        .with_existing(ServerId::new("untrusted"), shares(&[1]));
    let Err(PlacementError::Unhappy(error)) = select_peers(&input) else {
        panic!("expected unhappiness");
    };
    assert_eq!(error.achieved, 1);
}

// ============================================================================
// SECTION: Exact Matching
// ============================================================================

/// Tests happiness uses a maximum matching, not first-fit counting.
#[test]
fn test_servers_of_happiness_is_exact() {
    // First-fit would give share 0 to "a", leaving "b" with nothing to match.
    let stored = layout(&[("a", &[0, 1]), ("b", &[0])]);
    assert_eq!(servers_of_happiness(&stored), 2);
    let stored = layout(&[("a", &[0, 1, 2]), ("b", &[0]), ("c", &[0])]);
    assert_eq!(servers_of_happiness(&stored), 2);
    let stored = layout(&[("a", &[0, 1]), ("b", &[1, 2]), ("c", &[2, 3])]);
    assert_eq!(servers_of_happiness(&stored), 3);
    assert_eq!(servers_of_happiness(&BTreeMap::new()), 0);
}

/// Tests a layout only exact matching can make happy is accepted.
#[test]
fn test_placement_over_read_only_layout_uses_exact_matching() {
    let request = PlacementRequest::new(1, 3, 3).unwrap();
    let input = PlacementInput::new(request, vec![read_only("a"), read_only("b"), read_only("c")])
        .with_existing(ServerId::new("a"), shares(&[0, 1]))
        .with_existing(ServerId::new("b"), shares(&[0]))
        .with_existing(ServerId::new("c"), shares(&[1, 2]));
    let plan = select_peers(&input).unwrap();
    assert_eq!(plan.happiness, 3);
    assert!(plan.uploads.is_empty());
    assert_eq!(plan.assignment.get(ShareNumber::new(0)), Some(&ServerId::new("b")));
    assert_eq!(plan.assignment.get(ShareNumber::new(1)), Some(&ServerId::new("a")));
    assert_eq!(plan.assignment.get(ShareNumber::new(2)), Some(&ServerId::new("c")));
}
