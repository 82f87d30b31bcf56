//! High-level vault operations used by the CLI.
//!
//! `VaultStore` owns the decrypted `VaultDatabase` and keeps the sealed
//! file on disk equivalent to it: every mutation is applied to a copy,
//! the copy is sealed and written atomically, and only then does it
//! replace the in-memory state.  A failed write therefore leaves both
//! memory and disk at the previous snapshot.

use std::path::{Path, PathBuf};

use crate::crypto::encryption::{seal, unseal};
use crate::crypto::keys::VaultKey;
use crate::errors::Result;

use super::format::{self, StagedWrite};
use super::lock::VaultLock;
use super::model::{Lookup, ServiceSummary, Upsert, VaultDatabase};

/// The main vault handle.  Open one with `VaultStore::open`, then use
/// its methods to manage credentials.
pub struct VaultStore {
    /// Path to the sealed data file on disk.
    path: PathBuf,

    /// In-memory database, always equal to the last persisted snapshot.
    db: VaultDatabase,

    /// The encryption key (zeroized on drop).
    key: VaultKey,

    /// Exclusive lock for as long as this store is alive.
    _lock: VaultLock,
}

impl VaultStore {
    // ------------------------------------------------------------------
    // Construction
    // ------------------------------------------------------------------

    /// Lock and load the vault at `path`.
    ///
    /// A missing data file is an empty vault.  An existing file that does
    /// not unseal or parse is an error; it is never treated as empty.
    pub fn open(path: &Path, key: VaultKey) -> Result<Self> {
        let lock = VaultLock::acquire(path)?;
        Self::open_locked(path, key, lock)
    }

    /// Load the vault under a lock the caller already holds for `path`.
    pub fn open_locked(path: &Path, key: VaultKey, lock: VaultLock) -> Result<Self> {
        let db = match format::read_blob(path)? {
            Some(blob) => {
                let plaintext = unseal(key.as_bytes(), &blob)?;
                VaultDatabase::from_json(&plaintext)?
            }
            None => VaultDatabase::new(),
        };

        tracing::debug!(
            path = %path.display(),
            services = db.service_count(),
            "opened vault"
        );

        Ok(Self {
            path: path.to_path_buf(),
            db,
            key,
            _lock: lock,
        })
    }

    // ------------------------------------------------------------------
    // Credential operations
    // ------------------------------------------------------------------

    /// Add a credential, or update the password if the username exists.
    ///
    /// Persisted before returning.
    pub fn add_or_update(
        &mut self,
        service: &str,
        username: &str,
        password: &str,
    ) -> Result<Upsert> {
        let mut next = self.db.clone();
        let outcome = next.upsert(service, username, password)?;
        self.commit(next)?;
        Ok(outcome)
    }

    /// Fetch one entry (`username` given) or all entries of a service.
    pub fn get(&self, service: &str, username: Option<&str>) -> Result<Lookup> {
        Ok(self.db.lookup(service, username)?)
    }

    /// Services sorted by name with their entry counts.  Read-only.
    pub fn list_services(&self) -> Vec<ServiceSummary> {
        self.db.summaries()
    }

    /// Remove an entry; the service goes away with its last entry.
    ///
    /// Nothing is written when the entry does not exist.
    pub fn delete(&mut self, service: &str, username: &str) -> Result<()> {
        let mut next = self.db.clone();
        next.remove(service, username)?;
        self.commit(next)
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Seal `db` and stage it next to the data file without renaming.
    ///
    /// Exposed so callers (and tests) can separate the write from the
    /// final rename.
    pub fn stage(&self, db: &VaultDatabase) -> Result<StagedWrite> {
        let plaintext = db.to_json()?;
        let blob = seal(self.key.as_bytes(), &plaintext)?;
        format::stage_atomic(&self.path, blob.as_bytes())
    }

    /// Persist `next` and adopt it as the in-memory state.
    ///
    /// `StagedWrite::commit` only fails before its rename, so on error the
    /// file on disk still matches `self.db`.
    fn commit(&mut self, next: VaultDatabase) -> Result<()> {
        self.stage(&next)?.commit()?;
        self.db = next;
        tracing::debug!(
            path = %self.path.display(),
            services = self.db.service_count(),
            "persisted vault"
        );
        Ok(())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Returns the path to the data file on disk.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read-only view of the in-memory database.
    pub fn database(&self) -> &VaultDatabase {
        &self.db
    }

    pub fn service_count(&self) -> usize {
        self.db.service_count()
    }

    pub fn entry_count(&self) -> usize {
        self.db.entry_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::VaultError;
    use std::fs;
    use tempfile::TempDir;

    fn open_fresh(dir: &TempDir) -> VaultStore {
        let path = dir.path().join("passwords.json");
        VaultStore::open(&path, VaultKey::new([7u8; 32])).unwrap()
    }

    #[test]
    fn open_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = open_fresh(&dir);

        assert_eq!(store.path(), dir.path().join("passwords.json"));
        assert_eq!(store.service_count(), 0);
        assert_eq!(store.entry_count(), 0);
        assert!(!store.path().exists());
    }

    #[test]
    fn counts_follow_mutations() {
        let dir = TempDir::new().unwrap();
        let mut store = open_fresh(&dir);

        store.add_or_update("Gmail", "alice", "p1").unwrap();
        store.add_or_update("Gmail", "bob", "p2").unwrap();
        store.add_or_update("GitHub", "alice", "p3").unwrap();
        assert_eq!(store.service_count(), 2);
        assert_eq!(store.entry_count(), 3);

        store.delete("GitHub", "alice").unwrap();
        assert_eq!(store.service_count(), 1);
        assert_eq!(store.entry_count(), 2);
    }

    #[test]
    fn failed_write_rolls_back_memory() {
        let dir = TempDir::new().unwrap();
        let mut store = open_fresh(&dir);
        store.add_or_update("Gmail", "alice", "p1").unwrap();
        let before = fs::read(store.path()).unwrap();

        // A directory squatting on the temp path makes staging fail.
        fs::create_dir(format::temp_path(store.path())).unwrap();

        let err = store.add_or_update("Gmail", "alice", "p2").unwrap_err();
        assert!(matches!(err, VaultError::Io(_)));
        assert_eq!(
            store.get("Gmail", Some("alice")).unwrap(),
            Lookup::One(crate::vault::CredentialEntry::new("alice", "p1"))
        );
        assert_eq!(fs::read(store.path()).unwrap(), before);
    }
}
