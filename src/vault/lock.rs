//! Exclusive advisory lock held by an open vault.
//!
//! The lock lives in a sibling `<data_file>.lock` file and is released
//! when the guard is dropped (or the process exits).  Acquisition never
//! blocks: a second process gets `VaultError::VaultLocked` straight away.

use std::fs::{self, File, TryLockError};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::errors::{Result, VaultError};

/// RAII guard for the vault lock.
#[derive(Debug)]
pub struct VaultLock {
    path: PathBuf,
    // Held for its file descriptor; closing it releases the lock.
    _file: File,
}

impl VaultLock {
    /// Lock file used for a given data file.
    pub fn lock_path(data_path: &Path) -> PathBuf {
        let mut name = data_path.file_name().unwrap_or_default().to_os_string();
        name.push(".lock");
        data_path.with_file_name(name)
    }

    /// Take the exclusive lock for `data_path`.
    pub fn acquire(data_path: &Path) -> Result<Self> {
        let path = Self::lock_path(data_path);

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        try_lock_exclusive(&file, data_path)?;
        tracing::debug!(path = %path.display(), "acquired vault lock");

        Ok(Self { path, _file: file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn try_lock_exclusive(file: &File, data_path: &Path) -> Result<()> {
    match file.try_lock() {
        Ok(()) => Ok(()),
        Err(TryLockError::WouldBlock) => Err(VaultError::VaultLocked(data_path.to_path_buf())),
        Err(TryLockError::Error(e)) if e.kind() == ErrorKind::Unsupported => {
            tracing::debug!(
                path = %data_path.display(),
                "advisory locking unsupported on this platform"
            );
            Ok(())
        }
        Err(TryLockError::Error(e)) => Err(e.into()),
    }
}
