// crates/grid-manager-core/src/core/trust.rs
// ============================================================================
// Module: Grid Manager Trust Model
// Description: Client trust policy and storage server descriptors.
// Purpose: Describe which issuers a client trusts and what each server presents.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! A [`TrustPolicy`] is the set of Grid Manager keys a client has configured.
//! An empty policy is legacy mode: every server is trusted. A
//! [`ServerDescriptor`] is the snapshot of one storage server the transport
//! layer hands to the core; it is rebuilt on every reconnection.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::core::certificate::SignedCertificate;
use crate::core::identifiers::IssuerLabel;
use crate::core::identifiers::ServerId;
use crate::core::keys::PublicKey;

// ============================================================================
// SECTION: Trust Policy
// ============================================================================

/// Grid Manager keys a client accepts certificates from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrustPolicy {
    /// Configured issuers keyed by client-local label.
    issuers: BTreeMap<IssuerLabel, PublicKey>,
}

impl TrustPolicy {
    /// Creates a policy from labeled issuer keys.
    #[must_use]
    pub const fn new(issuers: BTreeMap<IssuerLabel, PublicKey>) -> Self {
        Self {
            issuers,
        }
    }

    /// Creates an empty, trust-everyone policy.
    #[must_use]
    pub const fn legacy() -> Self {
        Self {
            issuers: BTreeMap::new(),
        }
    }

    /// Returns the mode implied by the configured issuers.
    #[must_use]
    pub fn mode(&self) -> TrustMode {
        if self.issuers.is_empty() { TrustMode::Legacy } else { TrustMode::Restricted }
    }

    /// Iterates configured issuers in label order.
    pub fn issuers(&self) -> impl Iterator<Item = (&IssuerLabel, &PublicKey)> {
        self.issuers.iter()
    }
}

/// Trust mode of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrustMode {
    /// No issuers configured; all servers are trusted.
    Legacy,
    /// At least one issuer configured; servers need a valid certificate.
    Restricted,
}

impl fmt::Display for TrustMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Legacy => f.write_str("legacy"),
            Self::Restricted => f.write_str("restricted"),
        }
    }
}

/// Trust classification for a storage server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerTrust {
    /// Eligible for share placement.
    Trusted,
    /// Excluded from share placement.
    Untrusted,
}

// ============================================================================
// SECTION: Server Descriptors
// ============================================================================

/// Snapshot of one storage server as seen by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerDescriptor {
    /// Connection-level server identifier.
    pub server_id: ServerId,
    /// Identity key the server proved during connection.
    pub public_key: PublicKey,
    /// Whether the server is currently connected.
    pub reachable: bool,
    /// Certificates the server presented.
    #[serde(default)]
    pub certificates: Vec<SignedCertificate>,
    /// Whether the server accepts new shares.
    #[serde(default = "default_accepting_shares")]
    pub accepting_shares: bool,
}

/// Servers accept shares unless they say otherwise.
const fn default_accepting_shares() -> bool {
    true
}
