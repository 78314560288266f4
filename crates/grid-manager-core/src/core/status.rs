// crates/grid-manager-core/src/core/status.rs
// ============================================================================
// Module: Grid Manager Connection Status Model
// Description: Reconnection telemetry and the derived connection status.
// Purpose: Carry per-connection observability data between transport and UI.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! [`ReconnectionInfo`] is read from the external reconnection subsystem and
//! never mutated here. [`ConnectionStatus`] is the display-ready snapshot
//! derived from it and is recomputed on every query.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Reconnection Telemetry
// ============================================================================

/// Lifecycle state reported by the reconnection subsystem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconnectionState {
    /// Connection attempts are in flight.
    Connecting,
    /// A connection is established.
    Connected,
    /// Waiting before the next attempt.
    Waiting,
}

/// Listener that accepted an inbound connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerStatus {
    /// Listener name.
    pub name: String,
    /// Listener status text.
    pub status: String,
}

/// Raw reconnection telemetry for one server connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconnectionInfo {
    /// Current lifecycle state.
    pub state: ReconnectionState,
    /// Status text per connection hint.
    #[serde(default)]
    pub connector_statuses: BTreeMap<String, String>,
    /// Connection handler name per hint.
    #[serde(default)]
    pub connection_handlers: BTreeMap<String, String>,
    /// Hint that produced the live connection, if any.
    #[serde(default)]
    pub winning_hint: Option<String>,
    /// Listener that accepted the live connection, if any.
    #[serde(default)]
    pub listener_status: Option<ListenerStatus>,
    /// When the live connection was established.
    #[serde(default)]
    pub established_at: Option<Timestamp>,
    /// Time of the last connection attempt.
    #[serde(default)]
    pub last_attempt: Option<Timestamp>,
    /// Time of the next scheduled attempt.
    #[serde(default)]
    pub next_attempt: Option<Timestamp>,
}

// ============================================================================
// SECTION: Connection Status
// ============================================================================

/// Display-ready connection status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionStatus {
    /// Whether the connection is live.
    pub connected: bool,
    /// Human-readable summary.
    pub summary: String,
    /// Status of every hint that did not win, keyed by display label.
    pub non_connected_statuses: BTreeMap<String, String>,
    /// When the live connection was established.
    pub last_connection_time: Option<Timestamp>,
    /// When anything was last received from the server.
    pub last_received_time: Option<Timestamp>,
}

impl ConnectionStatus {
    /// Status of a server no connection has been attempted for.
    #[must_use]
    pub fn unstarted() -> Self {
        Self {
            connected: false,
            summary: "unstarted".to_string(),
            non_connected_statuses: BTreeMap::new(),
            last_connection_time: None,
            last_received_time: None,
        }
    }
}
