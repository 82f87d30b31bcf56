//! Entry point for front ends.
//!
//! `authenticate` is the only way to get at the credentials: it runs the
//! master password gate first, and only on success loads the key and
//! opens the store.

use crate::auth::MasterAuthenticator;
use crate::config::VaultPaths;
use crate::crypto::kdf::Argon2Params;
use crate::crypto::keystore::KeyStore;
use crate::errors::Result;
use crate::vault::{Lookup, ServiceSummary, Upsert, VaultLock, VaultStore};

/// An unlocked vault.
pub struct VaultHandle {
    store: VaultStore,
}

impl VaultHandle {
    /// Add a credential or update its password.
    pub fn add(&mut self, service: &str, username: &str, password: &str) -> Result<Upsert> {
        self.store.add_or_update(service, username, password)
    }

    /// Fetch one entry or all entries of a service.
    pub fn get(&self, service: &str, username: Option<&str>) -> Result<Lookup> {
        self.store.get(service, username)
    }

    /// Services with their account counts, sorted by name.
    pub fn list(&self) -> Vec<ServiceSummary> {
        self.store.list_services()
    }

    /// Remove a credential.
    pub fn delete(&mut self, service: &str, username: &str) -> Result<()> {
        self.store.delete(service, username)
    }

    pub fn store(&self) -> &VaultStore {
        &self.store
    }
}

/// Returns `true` when no master password has been set yet.
pub fn is_first_run(paths: &VaultPaths) -> bool {
    !paths.master_file.exists()
}

/// Verify (or, on first run, establish) the master password and open the vault.
///
/// The vault lock is taken first, so concurrent first runs cannot race on
/// the master record or key file.  The key file and data file are not
/// touched unless the password is accepted.
pub fn authenticate(
    paths: &VaultPaths,
    params: &Argon2Params,
    candidate: &[u8],
) -> Result<VaultHandle> {
    let lock = VaultLock::acquire(&paths.data_file)?;

    MasterAuthenticator::new(&paths.master_file, *params).establish_or_verify(candidate)?;

    let key = KeyStore::new(&paths.key_file).ensure_key()?;
    let store = VaultStore::open_locked(&paths.data_file, key, lock)?;

    Ok(VaultHandle { store })
}
