// crates/grid-manager-config/src/client.rs
// ============================================================================
// Module: Client Trust Configuration
// Description: TOML configuration for upload-side trust and placement.
// Purpose: Load, validate, and convert client settings into core types.
// Dependencies: grid-manager-core, serde, thiserror, toml
// ============================================================================

//! ## Overview
//! A client config names the Grid Manager keys the client trusts, the
//! erasure-coding shape it uploads with, and where decision events go. The
//! loader resolves the path from an explicit argument, then the
//! `GRID_MANAGER_CLIENT_CONFIG` environment variable, then
//! `grid-client.toml`, and fails closed on any invalid value.
//!
//! ```toml
//! [grid_managers]
//! production = "pub-v0-..."
//!
//! [placement]
//! needed = 3
//! happy = 7
//! total = 10
//!
//! [audit]
//! sink = "file"
//! path = "grid-audit.jsonl"
//! ```
//!
//! Security posture: config inputs are untrusted and must be validated.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::path::PathBuf;

use grid_manager_core::AuditSink;
use grid_manager_core::FileAuditSink;
use grid_manager_core::IssuerLabel;
use grid_manager_core::NoopAuditSink;
use grid_manager_core::PlacementAuditEvent;
use grid_manager_core::PlacementRequest;
use grid_manager_core::PublicKey;
use grid_manager_core::StderrAuditSink;
use grid_manager_core::TrustAuditEvent;
use grid_manager_core::TrustPolicy;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use crate::paths::MAX_TOTAL_PATH_LENGTH;
use crate::paths::path_violation;

// ============================================================================
// SECTION: Limits and Defaults
// ============================================================================

/// Default config file name.
pub const DEFAULT_CONFIG_NAME: &str = "grid-client.toml";
/// Environment variable for config path override.
pub const CONFIG_ENV_VAR: &str = "GRID_MANAGER_CLIENT_CONFIG";
/// Maximum config file size in bytes.
pub const MAX_CONFIG_FILE_SIZE: usize = 1024 * 1024;
/// Maximum number of configured Grid Managers.
pub const MAX_GRID_MANAGERS: usize = 64;
/// Maximum length of a Grid Manager label.
pub const MAX_LABEL_LENGTH: usize = 64;
/// Default number of shares needed to recover a file.
pub const DEFAULT_NEEDED_SHARES: u16 = 3;
/// Default happiness threshold.
pub const DEFAULT_HAPPY_SHARES: u16 = 7;
/// Default number of shares produced per file.
pub const DEFAULT_TOTAL_SHARES: u16 = 10;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Config loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// I/O error while reading the config file.
    #[error("config io error: {0}")]
    Io(String),
    /// Parse error in the config file.
    #[error("config parse error: {0}")]
    Parse(String),
    /// Invalid config data.
    #[error("invalid config: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Client Config
// ============================================================================

/// Top-level client configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    /// Trusted Grid Manager public keys keyed by label.
    #[serde(default)]
    pub grid_managers: BTreeMap<String, String>,
    /// Erasure-coding shape and happiness threshold.
    #[serde(default)]
    pub placement: PlacementConfig,
    /// Decision event destination.
    #[serde(default)]
    pub audit: AuditConfig,
}

impl ClientConfig {
    /// Loads config using the default resolution rules.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when loading or validation fails.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let resolved = resolve_path(path)?;
        if let Some(reason) = path_violation(&resolved) {
            return Err(ConfigError::Invalid(reason.to_string()));
        }
        let bytes = fs::read(&resolved).map_err(|err| ConfigError::Io(err.to_string()))?;
        if bytes.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::Invalid("config file exceeds size limit".to_string()));
        }
        let content = std::str::from_utf8(&bytes)
            .map_err(|_| ConfigError::Invalid("config file must be utf-8".to_string()))?;
        Self::from_toml_str(content)
    }

    /// Parses and validates config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self =
            toml::from_str(content).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates config values.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid_managers.len() > MAX_GRID_MANAGERS {
            return Err(ConfigError::Invalid("too many grid managers".to_string()));
        }
        self.trust_policy()?;
        self.placement_request()?;
        self.audit.validate()
    }

    /// Builds the trust policy from the configured Grid Managers.
    ///
    /// No configured Grid Managers yields legacy mode.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when a label or key is malformed.
    pub fn trust_policy(&self) -> Result<TrustPolicy, ConfigError> {
        let mut issuers = BTreeMap::new();
        for (label, key) in &self.grid_managers {
            validate_label(label)?;
            let public_key = PublicKey::parse(key).map_err(|err| {
                ConfigError::Invalid(format!("grid_managers.{label}: {err}"))
            })?;
            issuers.insert(IssuerLabel::new(label.clone()), public_key);
        }
        Ok(TrustPolicy::new(issuers))
    }

    /// Builds the placement request.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the placement shape is invalid.
    pub fn placement_request(&self) -> Result<PlacementRequest, ConfigError> {
        PlacementRequest::new(self.placement.needed, self.placement.happy, self.placement.total)
            .map_err(|err| ConfigError::Invalid(format!("placement: {err}")))
    }

    /// Opens the configured audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the audit file cannot be opened.
    pub fn audit_sink(&self) -> Result<ConfiguredAuditSink, ConfigError> {
        self.audit.validate()?;
        match (self.audit.sink, &self.audit.path) {
            (AuditSinkKind::None, _) => Ok(ConfiguredAuditSink::Noop(NoopAuditSink)),
            (AuditSinkKind::Stderr, _) => Ok(ConfiguredAuditSink::Stderr(StderrAuditSink)),
            (AuditSinkKind::File, Some(path)) => FileAuditSink::new(path)
                .map(ConfiguredAuditSink::File)
                .map_err(|err| ConfigError::Io(err.to_string())),
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for file sink".to_string()))
            }
        }
    }
}

// ============================================================================
// SECTION: Placement Config
// ============================================================================

/// Erasure-coding settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlacementConfig {
    /// Shares needed to recover a file.
    #[serde(default = "default_needed")]
    pub needed: u16,
    /// Minimum servers that must hold distinct shares.
    #[serde(default = "default_happy")]
    pub happy: u16,
    /// Shares produced per file.
    #[serde(default = "default_total")]
    pub total: u16,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            needed: DEFAULT_NEEDED_SHARES,
            happy: DEFAULT_HAPPY_SHARES,
            total: DEFAULT_TOTAL_SHARES,
        }
    }
}

/// Default for `placement.needed`.
const fn default_needed() -> u16 {
    DEFAULT_NEEDED_SHARES
}

/// Default for `placement.happy`.
const fn default_happy() -> u16 {
    DEFAULT_HAPPY_SHARES
}

/// Default for `placement.total`.
const fn default_total() -> u16 {
    DEFAULT_TOTAL_SHARES
}

// ============================================================================
// SECTION: Audit Config
// ============================================================================

/// Decision event destination settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AuditConfig {
    /// Sink kind.
    #[serde(default)]
    pub sink: AuditSinkKind,
    /// Log file path for the file sink.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

impl AuditConfig {
    /// Validates audit settings.
    fn validate(&self) -> Result<(), ConfigError> {
        match (&self.sink, &self.path) {
            (AuditSinkKind::File, None) => {
                Err(ConfigError::Invalid("audit.path is required for file sink".to_string()))
            }
            (_, Some(path)) => match path_violation(path) {
                Some(reason) => Err(ConfigError::Invalid(format!("audit.path: {reason}"))),
                None => Ok(()),
            },
            (_, None) => Ok(()),
        }
    }
}

/// Supported audit sinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditSinkKind {
    /// Discard events.
    #[default]
    None,
    /// JSON lines on stderr.
    Stderr,
    /// JSON lines appended to a file.
    File,
}

/// Audit sink selected by configuration.
pub enum ConfiguredAuditSink {
    /// Events are discarded.
    Noop(NoopAuditSink),
    /// Events go to stderr.
    Stderr(StderrAuditSink),
    /// Events are appended to a file.
    File(FileAuditSink),
}

impl AuditSink for ConfiguredAuditSink {
    fn record_trust(&self, event: &TrustAuditEvent) {
        match self {
            Self::Noop(sink) => sink.record_trust(event),
            Self::Stderr(sink) => sink.record_trust(event),
            Self::File(sink) => sink.record_trust(event),
        }
    }

    fn record_placement(&self, event: &PlacementAuditEvent) {
        match self {
            Self::Noop(sink) => sink.record_placement(event),
            Self::Stderr(sink) => sink.record_placement(event),
            Self::File(sink) => sink.record_placement(event),
        }
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates a Grid Manager label.
///
/// Labels are 1 to 64 characters of ASCII letters, digits, `-`, or `_`.
///
/// # Errors
///
/// Returns [`ConfigError::Invalid`] when the label is malformed.
pub fn validate_label(label: &str) -> Result<(), ConfigError> {
    if label.is_empty() || label.len() > MAX_LABEL_LENGTH {
        return Err(ConfigError::Invalid(format!(
            "label must be 1 to {MAX_LABEL_LENGTH} characters: '{label}'"
        )));
    }
    if !label.bytes().all(|byte| byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_') {
        return Err(ConfigError::Invalid(format!(
            "label may contain only letters, digits, '-' and '_': '{label}'"
        )));
    }
    Ok(())
}

/// Resolves the config path using CLI and environment overrides.
fn resolve_path(path: Option<&Path>) -> Result<PathBuf, ConfigError> {
    if let Some(path) = path {
        return Ok(path.to_path_buf());
    }
    if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
        if env_path.len() > MAX_TOTAL_PATH_LENGTH {
            return Err(ConfigError::Invalid("config path exceeds max length".to_string()));
        }
        return Ok(PathBuf::from(env_path));
    }
    Ok(PathBuf::from(DEFAULT_CONFIG_NAME))
}
