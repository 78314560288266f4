// crates/grid-manager-core/src/core/authority.rs
// ============================================================================
// Module: Grid Manager Authority
// Description: Offline certificate authority state and its pure operations.
// Purpose: Manage the server roster and issue certificates for roster members.
// Dependencies: rand, serde, thiserror
// ============================================================================

//! ## Overview
//! [`GridManagerConfig`] is the complete authority state: one signing key and
//! an optional, non-empty roster of server names and identity keys. Every
//! operation takes the config by value or reference and returns a new value,
//! so a config can be round-tripped through JSON between any two calls.
//!
//! The roster is `None` whenever it has no entries. Serialization omits the
//! `storage_servers` key in that case, and deserialization normalizes an
//! empty map back to `None`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;

use rand::CryptoRng;
use rand::RngCore;
use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::de::Error as _;
use thiserror::Error;

use crate::core::certificate::CertificateBody;
use crate::core::certificate::CertificateError;
use crate::core::certificate::SignedCertificate;
use crate::core::identifiers::InvalidServerName;
use crate::core::identifiers::ServerName;
use crate::core::keys::KeyError;
use crate::core::keys::PrivateKey;
use crate::core::keys::PublicKey;
use crate::core::time::Timestamp;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by Grid Manager authority operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorityError {
    /// The named server is not on the roster.
    #[error("no such storage server: {name}")]
    UnknownServer {
        /// Requested roster name.
        name: String,
    },
    /// The supplied server key could not be parsed.
    #[error("invalid public key: {0}")]
    InvalidKeyFormat(KeyError),
    /// The supplied server name failed validation.
    #[error(transparent)]
    InvalidServerName(#[from] InvalidServerName),
    /// Key generation failed.
    #[error("failed to generate signing key: {0}")]
    KeyGeneration(KeyError),
    /// Certificate issuance failed.
    #[error(transparent)]
    Certificate(#[from] CertificateError),
}

// ============================================================================
// SECTION: Signing Policy
// ============================================================================

/// Expiry policy applied when issuing certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningPolicy {
    /// Certificate lifetime in seconds from the signing time.
    lifetime_seconds: u64,
}

impl SigningPolicy {
    /// Creates a policy with the given lifetime.
    #[must_use]
    pub const fn new(lifetime_seconds: u64) -> Self {
        Self {
            lifetime_seconds,
        }
    }

    /// Returns the configured lifetime in seconds.
    #[must_use]
    pub const fn lifetime_seconds(self) -> u64 {
        self.lifetime_seconds
    }

    /// Returns the expiry for a certificate signed at `now`.
    #[must_use]
    pub fn expiry_from(self, now: Timestamp) -> Timestamp {
        now.saturating_add_seconds(self.lifetime_seconds)
    }
}

// ============================================================================
// SECTION: Roster
// ============================================================================

/// Non-empty mapping of server names to identity keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster(BTreeMap<ServerName, PublicKey>);

impl Roster {
    /// Wraps a map, returning `None` when it is empty.
    fn from_map(entries: BTreeMap<ServerName, PublicKey>) -> Option<Self> {
        if entries.is_empty() { None } else { Some(Self(entries)) }
    }

    /// Returns the key registered for `name`.
    #[must_use]
    pub fn get(&self, name: &ServerName) -> Option<&PublicKey> {
        self.0.get(name)
    }

    /// Returns the number of roster entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; present for API symmetry with collections.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Iterates entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&ServerName, &PublicKey)> {
        self.0.iter()
    }
}

/// Deserializes an optional roster, validating names and dropping empty maps.
fn deserialize_roster<'de, D>(deserializer: D) -> Result<Option<Roster>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<BTreeMap<String, PublicKey>>::deserialize(deserializer)?;
    let mut entries = BTreeMap::new();
    for (name, key) in raw.unwrap_or_default() {
        let name = ServerName::parse(&name).map_err(D::Error::custom)?;
        entries.insert(name, key);
    }
    Ok(Roster::from_map(entries))
}

// ============================================================================
// SECTION: Authority Config
// ============================================================================

/// Persistent Grid Manager state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GridManagerConfig {
    /// Authority signing key.
    private_key: PrivateKey,
    /// Authorized servers; `None` when there are none.
    #[serde(
        rename = "storage_servers",
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_roster"
    )]
    roster: Option<Roster>,
}

impl GridManagerConfig {
    /// Creates a new authority with a fresh signing key and an empty roster.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorityError::KeyGeneration`] when entropy is unavailable.
    pub fn create<R: RngCore + CryptoRng>(rng: &mut R) -> Result<Self, AuthorityError> {
        let private_key = PrivateKey::generate(rng).map_err(AuthorityError::KeyGeneration)?;
        Ok(Self::from_private_key(private_key))
    }

    /// Creates an authority around an existing signing key.
    #[must_use]
    pub const fn from_private_key(private_key: PrivateKey) -> Self {
        Self {
            private_key,
            roster: None,
        }
    }

    /// Adds or replaces a roster entry.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorityError`] when the name or key is invalid.
    pub fn add(self, name: &str, public_key: &str) -> Result<Self, AuthorityError> {
        let name = ServerName::parse(name)?;
        let key = PublicKey::parse(public_key).map_err(AuthorityError::InvalidKeyFormat)?;
        let mut entries = self.roster.map(|roster| roster.0).unwrap_or_default();
        entries.insert(name, key);
        Ok(Self {
            private_key: self.private_key,
            roster: Roster::from_map(entries),
        })
    }

    /// Removes a roster entry; removing an absent name is a no-op.
    #[must_use]
    pub fn remove(self, name: &str) -> Self {
        let roster = self.roster.and_then(|roster| {
            let mut entries = roster.0;
            entries.remove(&ServerName::new(name));
            Roster::from_map(entries)
        });
        Self {
            private_key: self.private_key,
            roster,
        }
    }

    /// Issues a certificate for a roster member.
    ///
    /// # Errors
    ///
    /// Returns [`AuthorityError::UnknownServer`] when `name` is not on the
    /// roster, or [`AuthorityError::Certificate`] when signing fails.
    pub fn sign(
        &self,
        name: &str,
        version: u64,
        policy: SigningPolicy,
        now: Timestamp,
    ) -> Result<SignedCertificate, AuthorityError> {
        let name = ServerName::new(name);
        let public_key = self.server_key(&name).ok_or_else(|| AuthorityError::UnknownServer {
            name: name.to_string(),
        })?;
        let body = CertificateBody {
            public_key: *public_key,
            name,
            version,
            expires: policy.expiry_from(now),
        };
        SignedCertificate::issue(&body, &self.private_key).map_err(AuthorityError::from)
    }

    /// Returns the authority's verifying key.
    #[must_use]
    pub fn public_identity(&self) -> PublicKey {
        self.private_key.public_key()
    }

    /// Returns the registered key for `name`.
    #[must_use]
    pub fn server_key(&self, name: &ServerName) -> Option<&PublicKey> {
        self.roster.as_ref().and_then(|roster| roster.get(name))
    }

    /// Returns the roster, if any servers are registered.
    #[must_use]
    pub const fn roster(&self) -> Option<&Roster> {
        self.roster.as_ref()
    }

    /// Iterates roster entries in name order.
    pub fn servers(&self) -> impl Iterator<Item = (&ServerName, &PublicKey)> {
        self.roster.iter().flat_map(Roster::iter)
    }
}
