//! Key file management.
//!
//! The vault key is 32 random bytes kept in a file next to the data.
//! It is created on first run and loaded verbatim afterwards; nothing
//! ever regenerates or rotates it.  Anyone holding this file can decrypt
//! the vault, so it gets the same owner-only permissions as the master
//! record.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use rand::rngs::OsRng;
use rand::TryRngCore;
use zeroize::Zeroize;

use super::encryption::KEY_LEN;
use super::keys::VaultKey;
use crate::errors::{Result, VaultError};

/// Owns the location of the key file.
#[derive(Debug, Clone)]
pub struct KeyStore {
    path: PathBuf,
}

impl KeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once a key file has been written.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Load the key, generating and persisting one if none exists yet.
    ///
    /// Repeated calls return the same bytes.
    pub fn ensure_key(&self) -> Result<VaultKey> {
        if self.exists() {
            return self.load();
        }

        match self.generate() {
            Ok(key) => Ok(key),
            // Another process created it between our check and create_new.
            Err(VaultError::Io(e)) if e.kind() == ErrorKind::AlreadyExists => self.load(),
            Err(e) => Err(e),
        }
    }

    /// Read the key file and validate its length.
    fn load(&self) -> Result<VaultKey> {
        let mut data = fs::read(&self.path).map_err(|e| {
            VaultError::KeyUnavailable(format!(
                "failed to read key file {}: {e}",
                self.path.display()
            ))
        })?;

        let key = VaultKey::from_slice(&data);
        data.zeroize();

        tracing::debug!(path = %self.path.display(), "loaded vault key");
        key
    }

    /// Generate 32 random bytes and write them with `create_new`.
    fn generate(&self) -> Result<VaultKey> {
        let mut bytes = [0u8; KEY_LEN];
        OsRng.try_fill_bytes(&mut bytes).map_err(|e| {
            VaultError::KeyUnavailable(format!("OS random source failed: {e}"))
        })?;
        let key = VaultKey::new(bytes);
        bytes.zeroize();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let mut options = fs::OpenOptions::new();
        options.write(true).create_new(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }

        let mut file = options.open(&self.path)?;
        file.write_all(key.as_bytes())?;
        file.sync_all()?;

        tracing::debug!(path = %self.path.display(), "generated new vault key");
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn first_call_creates_key_file() {
        let dir = TempDir::new().unwrap();
        let store = KeyStore::new(dir.path().join("key.key"));
        assert!(!store.exists());

        store.ensure_key().unwrap();
        assert!(store.exists());
        assert_eq!(fs::read(store.path()).unwrap().len(), KEY_LEN);
    }

    #[test]
    fn ensure_key_is_stable() {
        let dir = TempDir::new().unwrap();
        let store = KeyStore::new(dir.path().join("key.key"));

        let first = store.ensure_key().unwrap();
        let second = store.ensure_key().unwrap();
        assert_eq!(first, second);

        // A fresh handle on the same file sees the same key.
        let third = KeyStore::new(store.path()).ensure_key().unwrap();
        assert_eq!(first, third);
    }

    #[test]
    fn existing_file_is_loaded_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("key.key");
        fs::write(&path, [0x42u8; KEY_LEN]).unwrap();

        let key = KeyStore::new(&path).ensure_key().unwrap();
        assert_eq!(key.as_bytes(), &[0x42u8; KEY_LEN]);
    }

    #[test]
    fn wrong_length_is_unavailable() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("key.key");
        fs::write(&path, [0u8; 16]).unwrap();

        let result = KeyStore::new(&path).ensure_key();
        assert!(matches!(result, Err(VaultError::KeyUnavailable(_))));
        // The bad file must not be replaced.
        assert_eq!(fs::read(&path).unwrap().len(), 16);
    }

    #[test]
    fn creates_missing_parent_directory() {
        let dir = TempDir::new().unwrap();
        let store = KeyStore::new(dir.path().join("nested").join("key.key"));
        store.ensure_key().unwrap();
        assert!(store.exists());
    }

    #[cfg(unix)]
    #[test]
    fn key_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let store = KeyStore::new(dir.path().join("key.key"));
        store.ensure_key().unwrap();

        let mode = fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }
}
