// crates/grid-manager-core/src/runtime/directory.rs
// ============================================================================
// Module: Grid Manager In-Memory Server Directory
// Description: Mutable server directory fed by connection events.
// Purpose: Provide a deterministic ServerDirectory without a transport layer.
// Dependencies: crate::core, crate::interfaces
// ============================================================================

//! ## Overview
//! [`InMemoryServerDirectory`] stores the latest [`ServerDescriptor`] per
//! server. Hosts call [`InMemoryServerDirectory::upsert`] on every connection
//! event and the upload gate reads a fresh snapshot per decision. Clones share
//! the same underlying map.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::Mutex;

use crate::core::identifiers::ServerId;
use crate::core::trust::ServerDescriptor;
use crate::interfaces::DirectoryError;
use crate::interfaces::ServerDirectory;

// ============================================================================
// SECTION: In-Memory Directory
// ============================================================================

/// In-memory server directory keyed by server id.
#[derive(Debug, Default, Clone)]
pub struct InMemoryServerDirectory {
    /// Latest descriptor per server, protected by a mutex.
    servers: Arc<Mutex<BTreeMap<ServerId, ServerDescriptor>>>,
}

impl InMemoryServerDirectory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a directory pre-populated with descriptors.
    #[must_use]
    pub fn with_servers(servers: impl IntoIterator<Item = ServerDescriptor>) -> Self {
        let map = servers.into_iter().map(|server| (server.server_id.clone(), server)).collect();
        Self {
            servers: Arc::new(Mutex::new(map)),
        }
    }

    /// Inserts or replaces the descriptor for a server.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the directory lock is poisoned.
    pub fn upsert(&self, server: ServerDescriptor) -> Result<(), DirectoryError> {
        let mut guard = self.lock()?;
        guard.insert(server.server_id.clone(), server);
        drop(guard);
        Ok(())
    }

    /// Removes a server from the directory.
    ///
    /// # Errors
    ///
    /// Returns [`DirectoryError::Unavailable`] when the directory lock is poisoned.
    pub fn remove(&self, server_id: &ServerId) -> Result<(), DirectoryError> {
        let mut guard = self.lock()?;
        guard.remove(server_id);
        drop(guard);
        Ok(())
    }

    /// Locks the server map.
    fn lock(
        &self,
    ) -> Result<std::sync::MutexGuard<'_, BTreeMap<ServerId, ServerDescriptor>>, DirectoryError>
    {
        self.servers
            .lock()
            .map_err(|_| DirectoryError::Unavailable("server directory lock poisoned".to_string()))
    }
}

impl ServerDirectory for InMemoryServerDirectory {
    fn snapshot(&self) -> Result<Vec<ServerDescriptor>, DirectoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}
