// crates/grid-manager-config/src/store.rs
// ============================================================================
// Module: Grid Manager Authority Store
// Description: Persistence for the authority config and issued certificates.
// Purpose: Read and write Grid Manager state in a directory or over stdio.
// Dependencies: grid-manager-core, serde_json, thiserror
// ============================================================================

//! ## Overview
//! Authority state lives either in a directory, as `config.json` plus one
//! `.cert` file per issued certificate, or on standard streams when the
//! location is `-`. Certificate files never overwrite: re-signing a server
//! writes `<name>.cert.1`, `<name>.cert.2`, and so on.
//!
//! Security posture: the config file holds the private signing key; inputs
//! are size-limited and parsed strictly.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::ffi::OsStr;
use std::fs;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Read;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use grid_manager_core::GridManagerConfig;
use grid_manager_core::ServerName;
use grid_manager_core::SignedCertificate;
use thiserror::Error;

use crate::paths::BoundedRead;
use crate::paths::path_violation;
use crate::paths::read_bounded;

// ============================================================================
// SECTION: Limits
// ============================================================================

/// Location string that selects standard streams.
pub const STDIO_LOCATION: &str = "-";
/// Authority config file name inside a Grid Manager directory.
pub const AUTHORITY_CONFIG_FILE: &str = "config.json";
/// Certificate file extension.
pub const CERTIFICATE_EXTENSION: &str = "cert";
/// Maximum authority config size in bytes.
pub const MAX_AUTHORITY_CONFIG_SIZE: usize = 1024 * 1024;
/// Maximum numbered certificate suffix tried before giving up.
const MAX_CERTIFICATE_SUFFIX: u32 = 10_000;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Errors raised by file-backed Grid Manager stores.
#[derive(Debug, Error)]
pub enum StoreError {
    /// I/O failure.
    #[error("store io error: {0}")]
    Io(String),
    /// Stored content could not be parsed.
    #[error("store parse error: {0}")]
    Parse(String),
    /// Target already exists.
    #[error("already exists: {}", .0.display())]
    AlreadyExists(PathBuf),
    /// Required file is missing.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Invalid input.
    #[error("invalid store input: {0}")]
    Invalid(String),
    /// Input exceeded its size limit.
    #[error("input exceeds size limit ({size} > {limit} bytes)")]
    TooLarge {
        /// Observed size in bytes.
        size: usize,
        /// Limit in bytes.
        limit: usize,
    },
}

impl StoreError {
    /// Maps an I/O error for `path` into a store error.
    fn from_io(err: &std::io::Error, path: &Path) -> Self {
        match err.kind() {
            ErrorKind::NotFound => Self::NotFound(path.to_path_buf()),
            ErrorKind::AlreadyExists => Self::AlreadyExists(path.to_path_buf()),
            _ => Self::Io(format!("{}: {err}", path.display())),
        }
    }
}

// ============================================================================
// SECTION: Location
// ============================================================================

/// Where the authority state is kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigLocation {
    /// Config on stdin and stdout; certificates are not written to disk.
    Stdio,
    /// Config and certificates in a directory.
    Directory(PathBuf),
}

impl ConfigLocation {
    /// Parses a location argument; `-` selects standard streams.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        if text == STDIO_LOCATION { Self::Stdio } else { Self::Directory(PathBuf::from(text)) }
    }
}

// ============================================================================
// SECTION: Authority Store
// ============================================================================

/// Reads and writes authority state at a [`ConfigLocation`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorityStore {
    /// Storage location.
    location: ConfigLocation,
}

impl AuthorityStore {
    /// Creates a store for `location`.
    #[must_use]
    pub const fn new(location: ConfigLocation) -> Self {
        Self {
            location,
        }
    }

    /// Returns the storage location.
    #[must_use]
    pub const fn location(&self) -> &ConfigLocation {
        &self.location
    }

    /// Initializes storage for a freshly created authority.
    ///
    /// Directory locations must not exist yet; the directory is created and
    /// the config written into it. Stdio locations write the config to
    /// `output`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::AlreadyExists`] when the directory exists, or
    /// another [`StoreError`] when writing fails.
    pub fn create(&self, config: &GridManagerConfig, output: impl Write) -> Result<(), StoreError> {
        if let ConfigLocation::Directory(dir) = &self.location {
            check_path(dir)?;
            if dir.exists() {
                return Err(StoreError::AlreadyExists(dir.clone()));
            }
            fs::create_dir_all(dir).map_err(|err| StoreError::from_io(&err, dir))?;
        }
        self.save(config, output)
    }

    /// Loads the authority config.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the config is missing, too large, or
    /// malformed.
    pub fn load(&self, input: impl Read) -> Result<GridManagerConfig, StoreError> {
        let bytes = match &self.location {
            ConfigLocation::Stdio => read_limited(input, Path::new(STDIO_LOCATION))?,
            ConfigLocation::Directory(dir) => {
                let path = dir.join(AUTHORITY_CONFIG_FILE);
                check_path(&path)?;
                let file = fs::File::open(&path).map_err(|err| StoreError::from_io(&err, &path))?;
                read_limited(file, &path)?
            }
        };
        serde_json::from_slice(&bytes).map_err(|err| StoreError::Parse(err.to_string()))
    }

    /// Saves the authority config as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when serialization or writing fails.
    pub fn save(&self, config: &GridManagerConfig, mut output: impl Write) -> Result<(), StoreError> {
        let mut bytes =
            serde_json::to_vec_pretty(config).map_err(|err| StoreError::Parse(err.to_string()))?;
        bytes.push(b'\n');
        match &self.location {
            ConfigLocation::Stdio => output
                .write_all(&bytes)
                .and_then(|()| output.flush())
                .map_err(|err| StoreError::from_io(&err, Path::new(STDIO_LOCATION))),
            ConfigLocation::Directory(dir) => {
                let path = dir.join(AUTHORITY_CONFIG_FILE);
                check_path(&path)?;
                fs::write(&path, bytes).map_err(|err| StoreError::from_io(&err, &path))
            }
        }
    }

    /// Persists an issued certificate next to the config.
    ///
    /// Returns the written path, or `None` for stdio locations.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the name is not a plain file name, no free
    /// file name exists, or writing fails.
    pub fn write_certificate(
        &self,
        name: &ServerName,
        certificate: &SignedCertificate,
    ) -> Result<Option<PathBuf>, StoreError> {
        let ConfigLocation::Directory(dir) = &self.location else {
            return Ok(None);
        };
        let bytes = certificate_bytes(certificate)?;
        for suffix in 0 ..= MAX_CERTIFICATE_SUFFIX {
            let file_name = certificate_file_name(name, suffix);
            if Path::new(&file_name).file_name() != Some(OsStr::new(&file_name)) {
                return Err(StoreError::Invalid(format!(
                    "certificate file name escapes the config directory: {file_name}"
                )));
            }
            let path = dir.join(file_name);
            check_path(&path)?;
            match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(mut file) => {
                    file.write_all(&bytes).map_err(|err| StoreError::from_io(&err, &path))?;
                    return Ok(Some(path));
                }
                Err(err) if err.kind() == ErrorKind::AlreadyExists => {}
                Err(err) => return Err(StoreError::from_io(&err, &path)),
            }
        }
        Err(StoreError::Invalid(format!("no free certificate file name for {name}")))
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns the certificate file name for `name` and a collision suffix.
///
/// Suffix zero is `<name>.cert`; later suffixes append `.N`.
#[must_use]
pub fn certificate_file_name(name: &ServerName, suffix: u32) -> String {
    if suffix == 0 {
        format!("{name}.{CERTIFICATE_EXTENSION}")
    } else {
        format!("{name}.{CERTIFICATE_EXTENSION}.{suffix}")
    }
}

/// Serializes a certificate the way it is written to disk and stdout.
///
/// # Errors
///
/// Returns [`StoreError::Parse`] when serialization fails.
pub fn certificate_bytes(certificate: &SignedCertificate) -> Result<Vec<u8>, StoreError> {
    let mut bytes =
        serde_json::to_vec(certificate).map_err(|err| StoreError::Parse(err.to_string()))?;
    bytes.push(b'\n');
    Ok(bytes)
}

/// Rejects paths that exceed length limits.
pub(crate) fn check_path(path: &Path) -> Result<(), StoreError> {
    match path_violation(path) {
        Some(reason) => Err(StoreError::Invalid(format!("{}: {reason}", path.display()))),
        None => Ok(()),
    }
}

/// Reads a config input under the size limit.
fn read_limited(input: impl Read, path: &Path) -> Result<Vec<u8>, StoreError> {
    match read_bounded(input, MAX_AUTHORITY_CONFIG_SIZE) {
        Ok(BoundedRead::Complete(bytes)) => Ok(bytes),
        Ok(BoundedRead::TooLarge(size)) => Err(StoreError::TooLarge {
            size,
            limit: MAX_AUTHORITY_CONFIG_SIZE,
        }),
        Err(err) => Err(StoreError::from_io(&err, path)),
    }
}
