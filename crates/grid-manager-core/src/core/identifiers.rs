// crates/grid-manager-core/src/core/identifiers.rs
// ============================================================================
// Module: Grid Manager Identifiers
// Description: Canonical opaque identifiers for servers, issuers, and shares.
// Purpose: Provide strongly typed, serializable IDs with stable string forms.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! This module defines the identifiers used throughout the Grid Manager core.
//! String identifiers are opaque and serialize as strings. Roster names are the
//! only identifiers validated here because they are embedded in signed
//! certificates; everything else is validated at configuration boundaries.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Maximum length of a roster server name in bytes.
pub const MAX_SERVER_NAME_LENGTH: usize = 128;

// ============================================================================
// SECTION: Identifier Types
// ============================================================================

/// Roster name the Grid Manager operator assigns to a storage server.
///
/// # Invariants
/// - Constructed values from [`ServerName::parse`] are non-empty, at most
///   [`MAX_SERVER_NAME_LENGTH`] bytes, and free of control characters.
/// - Parsed names are usable as a single file name: they contain no path
///   separators and do not start with `.`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerName(String);

impl ServerName {
    /// Creates a server name without validation.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Parses and validates a roster name.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidServerName`] when the name is empty, too long,
    /// contains control characters or path separators, or starts with `.`.
    pub fn parse(name: &str) -> Result<Self, InvalidServerName> {
        if name.is_empty() {
            return Err(InvalidServerName("server name must be non-empty".to_string()));
        }
        if name.len() > MAX_SERVER_NAME_LENGTH {
            return Err(InvalidServerName(format!(
                "server name exceeds {MAX_SERVER_NAME_LENGTH} bytes"
            )));
        }
        if name.chars().any(char::is_control) {
            return Err(InvalidServerName(
                "server name must not contain control characters".to_string(),
            ));
        }
        if name.contains(['/', '\\']) {
            return Err(InvalidServerName(
                "server name must not contain path separators".to_string(),
            ));
        }
        if name.starts_with('.') {
            return Err(InvalidServerName("server name must not start with '.'".to_string()));
        }
        Ok(Self(name.to_string()))
    }

    /// Returns the name as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Validation failure for a roster server name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid server name: {0}")]
pub struct InvalidServerName(pub String);

/// Connection-level identifier for a storage server (its node id).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ServerId(String);

impl ServerId {
    /// Creates a new server identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for ServerId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for ServerId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Client-local label for a configured Grid Manager issuer key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssuerLabel(String);

impl IssuerLabel {
    /// Creates a new issuer label.
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self(label.into())
    }

    /// Returns the label as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IssuerLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<&str> for IssuerLabel {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Zero-based index of an erasure-coded share within a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShareNumber(u16);

impl ShareNumber {
    /// Creates a share number.
    #[must_use]
    pub const fn new(value: u16) -> Self {
        Self(value)
    }

    /// Returns the raw share index.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }
}

impl fmt::Display for ShareNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u16> for ShareNumber {
    fn from(value: u16) -> Self {
        Self::new(value)
    }
}
