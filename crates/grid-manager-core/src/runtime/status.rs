// crates/grid-manager-core/src/runtime/status.rs
// ============================================================================
// Module: Grid Manager Connection Status
// Description: Classifies reconnection telemetry into a display snapshot.
// Purpose: Render per-connection health without owning the state machine.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! The reconnection state machine lives in the transport layer. This module
//! only reads its telemetry and produces a [`ConnectionStatus`]. Hints are
//! labelled `"{hint} via {handler}"` when a handler is known for them. A
//! winning hint always outranks the listener and is never listed among the
//! non-connected statuses.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use crate::core::status::ConnectionStatus;
use crate::core::status::ReconnectionInfo;
use crate::core::status::ReconnectionState;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Status Classification
// ============================================================================

/// Builds a connection status snapshot from reconnection telemetry.
///
/// `last_received` is passed through unchanged. Waiting-state durations are
/// computed against `now`.
#[must_use]
pub fn from_reconnection_info(
    info: &ReconnectionInfo,
    last_received: Option<Timestamp>,
    now: Timestamp,
) -> ConnectionStatus {
    let all_hints = info.connector_statuses.keys().map(String::as_str);
    match info.state {
        ReconnectionState::Connected => {
            let summary = connected_summary(info);
            let winner = info.winning_hint.as_deref();
            let non_connected_statuses = hint_statuses(
                all_hints.filter(|hint| Some(*hint) != winner),
                &info.connection_handlers,
                &info.connector_statuses,
            );
            ConnectionStatus {
                connected: true,
                summary,
                non_connected_statuses,
                last_connection_time: info.established_at,
                last_received_time: last_received,
            }
        }
        ReconnectionState::Connecting => ConnectionStatus {
            connected: false,
            summary: "Trying to connect".to_string(),
            non_connected_statuses: hint_statuses(
                all_hints,
                &info.connection_handlers,
                &info.connector_statuses,
            ),
            last_connection_time: None,
            last_received_time: last_received,
        },
        ReconnectionState::Waiting => {
            let next = info.next_attempt.map_or(0, |next| next.seconds_since(now));
            let last = info.last_attempt.map_or(0, |last| now.seconds_since(last));
            ConnectionStatus {
                connected: false,
                summary: format!("Reconnecting in {next} seconds (last attempt {last}s ago)"),
                non_connected_statuses: hint_statuses(
                    all_hints,
                    &info.connection_handlers,
                    &info.connector_statuses,
                ),
                last_connection_time: None,
                last_received_time: last_received,
            }
        }
    }
}

/// Summary line for a live connection.
fn connected_summary(info: &ReconnectionInfo) -> String {
    match (&info.listener_status, &info.winning_hint) {
        (Some(listener), None) => format!("Connected via listener ({})", listener.name),
        (_, Some(hint)) => match info.connection_handlers.get(hint) {
            Some(handler) => format!("Connected to {hint} via {handler}"),
            None => format!("Connected to {hint}"),
        },
        (None, None) => "Connected".to_string(),
    }
}

/// Labels the status of every hint that has one.
///
/// Hints without a status are skipped; the result does not depend on the
/// order of `hints`.
#[must_use]
pub fn hint_statuses<'a>(
    hints: impl IntoIterator<Item = &'a str>,
    handlers: &BTreeMap<String, String>,
    statuses: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    hints
        .into_iter()
        .filter_map(|hint| {
            let status = statuses.get(hint)?;
            let label = match handlers.get(hint) {
                Some(handler) => format!("{hint} via {handler}"),
                None => hint.to_string(),
            };
            Some((label, status.clone()))
        })
        .collect()
}
