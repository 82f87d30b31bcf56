//! On-disk handling of vault files.
//!
//! Every file PassVault rewrites (the sealed database and the master
//! record) goes through `write_atomic`:
//!
//! 1. Write the new bytes to `.<name>.tmp` in the same directory.
//! 2. `fsync` the temp file.
//! 3. Rename it over the target path.
//! 4. `fsync` the directory so the rename itself is durable (Unix).
//!
//! A crash at any point leaves either the old complete file or the new
//! complete file, never a mix of both.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::crypto::SealedBlob;
use crate::errors::Result;

/// Read a sealed blob, or `None` if the file has never been written.
pub fn read_blob(path: &Path) -> Result<Option<SealedBlob>> {
    match fs::read(path) {
        Ok(data) => Ok(Some(SealedBlob::from_bytes(data))),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Path of the temp file used while replacing `path`.
pub fn temp_path(path: &Path) -> PathBuf {
    let parent = path.parent().unwrap_or(Path::new("."));
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// A fully written temp file waiting to be renamed into place.
///
/// Dropping it without calling `commit` removes the temp file and leaves
/// the target untouched.
#[derive(Debug)]
pub struct StagedWrite {
    tmp_path: PathBuf,
    target: PathBuf,
    committed: bool,
}

impl StagedWrite {
    pub fn temp_path(&self) -> &Path {
        &self.tmp_path
    }

    /// Atomically replace the target with the staged bytes.
    ///
    /// Returns `Ok` as soon as the rename lands.  A failed directory sync
    /// after that point is only logged: the new file is already in place,
    /// so the caller must treat the write as done.
    pub fn commit(self) -> Result<()> {
        self.commit_with(sync_parent)
    }

    fn commit_with(mut self, sync: fn(&Path) -> Result<()>) -> Result<()> {
        fs::rename(&self.tmp_path, &self.target)?;
        self.committed = true;

        if let Err(e) = sync(&self.target) {
            tracing::warn!(
                path = %self.target.display(),
                "directory sync after rename failed: {e}"
            );
        }
        Ok(())
    }
}

impl Drop for StagedWrite {
    fn drop(&mut self) {
        if !self.committed {
            let _ = fs::remove_file(&self.tmp_path);
        }
    }
}

/// Write `bytes` to the temp path next to `target` and flush them to disk.
///
/// The temp file is created owner-only on Unix since it holds the same
/// material as the target.
pub fn stage_atomic(target: &Path, bytes: &[u8]) -> Result<StagedWrite> {
    let tmp_path = temp_path(target);

    if let Some(parent) = target.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    if tmp_path.exists() {
        tracing::warn!(
            path = %tmp_path.display(),
            "removing stale temp file from an interrupted write"
        );
        fs::remove_file(&tmp_path)?;
    }

    // From here on the guard cleans up the temp file on any error.
    let staged = StagedWrite {
        tmp_path,
        target: target.to_path_buf(),
        committed: false,
    };

    let mut options = fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(&staged.tmp_path)?;
    file.write_all(bytes)?;
    file.sync_all()?;

    Ok(staged)
}

/// Stage and commit in one step.
pub fn write_atomic(target: &Path, bytes: &[u8]) -> Result<()> {
    stage_atomic(target, bytes)?.commit()
}

#[cfg(unix)]
fn sync_parent(path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::File::open(parent)?.sync_all()?;
    Ok(())
}

#[cfg(not(unix))]
fn sync_parent(_path: &Path) -> Result<()> {
    Ok(())
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    let encoded = BASE64.encode(data);
    serializer.serialize_str(&encoded)
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
