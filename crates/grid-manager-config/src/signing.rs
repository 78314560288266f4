// crates/grid-manager-config/src/signing.rs
// ============================================================================
// Module: Certificate Signing Settings
// Description: Operator-facing certificate lifetime settings.
// Purpose: Bound certificate lifetimes and convert them into a signing policy.
// Dependencies: grid-manager-core
// ============================================================================

//! ## Overview
//! Operators choose certificate lifetimes in whole days. Lifetimes outside
//! one day to five years are rejected.

// ============================================================================
// SECTION: Imports
// ============================================================================

use grid_manager_core::SigningPolicy;

use crate::client::ConfigError;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Default certificate lifetime in days.
pub const DEFAULT_CERTIFICATE_DAYS: u32 = 30;
/// Minimum certificate lifetime in days.
pub const MIN_CERTIFICATE_DAYS: u32 = 1;
/// Maximum certificate lifetime in days.
pub const MAX_CERTIFICATE_DAYS: u32 = 1825;
/// Seconds per day.
const SECONDS_PER_DAY: u64 = 86_400;

// ============================================================================
// SECTION: Signing Settings
// ============================================================================

/// Validated certificate lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SigningSettings {
    /// Lifetime in days.
    expiry_days: u32,
}

impl SigningSettings {
    /// Creates settings for a lifetime of `expiry_days`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the lifetime is out of range.
    pub fn new(expiry_days: u32) -> Result<Self, ConfigError> {
        if !(MIN_CERTIFICATE_DAYS ..= MAX_CERTIFICATE_DAYS).contains(&expiry_days) {
            return Err(ConfigError::Invalid(format!(
                "expiry days must be between {MIN_CERTIFICATE_DAYS} and {MAX_CERTIFICATE_DAYS}"
            )));
        }
        Ok(Self {
            expiry_days,
        })
    }

    /// Returns the lifetime in days.
    #[must_use]
    pub const fn expiry_days(self) -> u32 {
        self.expiry_days
    }

    /// Converts the lifetime into a signing policy.
    #[must_use]
    pub fn policy(self) -> SigningPolicy {
        SigningPolicy::new(u64::from(self.expiry_days) * SECONDS_PER_DAY)
    }
}

impl Default for SigningSettings {
    fn default() -> Self {
        Self {
            expiry_days: DEFAULT_CERTIFICATE_DAYS,
        }
    }
}
