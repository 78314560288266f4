// crates/grid-manager-config/src/certificates.rs
// ============================================================================
// Module: Storage Server Certificate Store
// Description: Certificates installed on a storage node.
// Purpose: Install and load the certificates a server presents to clients.
// Dependencies: grid-manager-core
// ============================================================================

//! ## Overview
//! A storage node keeps the certificates it announces under
//! `<node-dir>/grid-manager-certificates/<label>.cert`. Labels are local to
//! the node. Installing never replaces an existing certificate, and every
//! file must parse as a certificate before it is accepted or announced.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fs;
use std::fs::OpenOptions;
use std::io::ErrorKind;
use std::io::Write;
use std::path::Path;
use std::path::PathBuf;

use grid_manager_core::MAX_CERTIFICATE_BYTES;
use grid_manager_core::SignedCertificate;

use crate::client::validate_label;
use crate::paths::BoundedRead;
use crate::paths::read_bounded;
use crate::store::CERTIFICATE_EXTENSION;
use crate::store::StoreError;
use crate::store::check_path;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Certificate directory name inside a node directory.
pub const CERTIFICATE_DIR_NAME: &str = "grid-manager-certificates";

// ============================================================================
// SECTION: Certificate Store
// ============================================================================

/// Certificates installed on one storage node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCertificateStore {
    /// Directory holding `<label>.cert` files.
    dir: PathBuf,
}

impl ServerCertificateStore {
    /// Creates a store for the node rooted at `node_dir`.
    #[must_use]
    pub fn for_node(node_dir: &Path) -> Self {
        Self {
            dir: node_dir.join(CERTIFICATE_DIR_NAME),
        }
    }

    /// Returns the certificate directory.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Installs a certificate under `label`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for a bad label or certificate and
    /// [`StoreError::AlreadyExists`] when the label is taken.
    pub fn install(&self, label: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        validate_label(label).map_err(|err| StoreError::Invalid(err.to_string()))?;
        parse_certificate(bytes)?;
        check_path(&self.dir)?;
        fs::create_dir_all(&self.dir)
            .map_err(|err| StoreError::Io(format!("{}: {err}", self.dir.display())))?;
        let path = self.dir.join(format!("{label}.{CERTIFICATE_EXTENSION}"));
        check_path(&path)?;
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(StoreError::AlreadyExists(path));
            }
            Err(err) => return Err(StoreError::Io(format!("{}: {err}", path.display()))),
        };
        file.write_all(bytes)
            .and_then(|()| file.flush())
            .map_err(|err| StoreError::Io(format!("{}: {err}", path.display())))?;
        Ok(path)
    }

    /// Loads every installed certificate keyed by label.
    ///
    /// A node without a certificate directory has no certificates.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when a certificate file cannot be read or
    /// parsed.
    pub fn load_all(&self) -> Result<BTreeMap<String, SignedCertificate>, StoreError> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(StoreError::Io(format!("{}: {err}", self.dir.display()))),
        };
        let mut certificates = BTreeMap::new();
        for entry in entries {
            let path = entry.map_err(|err| StoreError::Io(err.to_string()))?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CERTIFICATE_EXTENSION) {
                continue;
            }
            let Some(label) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };
            if validate_label(label).is_err() {
                continue;
            }
            let file = fs::File::open(&path)
                .map_err(|err| StoreError::Io(format!("{}: {err}", path.display())))?;
            let bytes = match read_bounded(file, MAX_CERTIFICATE_BYTES) {
                Ok(BoundedRead::Complete(bytes)) => bytes,
                Ok(BoundedRead::TooLarge(size)) => {
                    return Err(StoreError::TooLarge {
                        size,
                        limit: MAX_CERTIFICATE_BYTES,
                    });
                }
                Err(err) => return Err(StoreError::Io(format!("{}: {err}", path.display()))),
            };
            let certificate = parse_certificate(&bytes)
                .map_err(|err| StoreError::Parse(format!("{}: {err}", path.display())))?;
            certificates.insert(label.to_string(), certificate);
        }
        Ok(certificates)
    }

    /// Loads every installed certificate in label order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] under the same conditions as
    /// [`ServerCertificateStore::load_all`].
    pub fn announced(&self) -> Result<Vec<SignedCertificate>, StoreError> {
        Ok(self.load_all()?.into_values().collect())
    }
}

/// Parses certificate bytes and checks the signed body is well formed.
fn parse_certificate(bytes: &[u8]) -> Result<SignedCertificate, StoreError> {
    let certificate =
        SignedCertificate::from_json_slice(bytes).map_err(|err| StoreError::Invalid(err.to_string()))?;
    certificate.body().map_err(|err| StoreError::Invalid(err.to_string()))?;
    Ok(certificate)
}
