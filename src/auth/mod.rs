//! Master password admission.
//!
//! The first run stores an Argon2id record of the chosen password in
//! `master_pw.key`; later runs re-derive the digest with the stored salt
//! and parameters and compare in constant time.  This is a gate in front
//! of the vault, not a key derivation: the encryption key lives in the
//! key file and does not depend on the master password.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;

use crate::crypto::kdf::{generate_salt, hash_secret, Argon2Params};
use crate::errors::{AuthError, Result, VaultError};
use crate::vault::format;

/// Current master record version.
const RECORD_VERSION: u8 = 1;

/// On-disk master password reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct MasterRecord {
    version: u8,

    #[serde(
        serialize_with = "format::base64_encode",
        deserialize_with = "format::base64_decode"
    )]
    salt: Vec<u8>,

    #[serde(
        serialize_with = "format::base64_encode",
        deserialize_with = "format::base64_decode"
    )]
    hash: Vec<u8>,

    argon2_params: Argon2Params,
}

/// Establishes and verifies the operator's master password.
#[derive(Debug, Clone)]
pub struct MasterAuthenticator {
    path: PathBuf,
    params: Argon2Params,
}

impl MasterAuthenticator {
    /// `params` only applies when a new record is written; existing
    /// records are verified with the parameters stored inside them.
    pub fn new(path: impl Into<PathBuf>, params: Argon2Params) -> Self {
        Self {
            path: path.into(),
            params,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` once a master password has been set.
    pub fn is_established(&self) -> bool {
        self.path.exists()
    }

    /// Check a two-entry confirmation before the first `establish_or_verify`.
    pub fn confirm(first: &[u8], second: &[u8]) -> std::result::Result<(), AuthError> {
        if first.ct_eq(second).into() {
            Ok(())
        } else {
            Err(AuthError::ConfirmationMismatch)
        }
    }

    /// Store `candidate` as the reference on first use, otherwise verify it.
    pub fn establish_or_verify(&self, candidate: &[u8]) -> Result<()> {
        if self.is_established() {
            self.verify(candidate)
        } else {
            self.establish(candidate)
        }
    }

    fn establish(&self, candidate: &[u8]) -> Result<()> {
        let salt = generate_salt()?;
        let digest = hash_secret(candidate, &salt, &self.params)?;

        let record = MasterRecord {
            version: RECORD_VERSION,
            salt: salt.to_vec(),
            hash: digest.to_vec(),
            argon2_params: self.params,
        };
        let bytes = serde_json::to_vec_pretty(&record)
            .map_err(|e| VaultError::Serialization(format!("master record: {e}")))?;

        format::write_atomic(&self.path, &bytes)?;
        tracing::debug!(path = %self.path.display(), "master password established");
        Ok(())
    }

    fn verify(&self, candidate: &[u8]) -> Result<()> {
        let data = fs::read(&self.path)?;

        let record: MasterRecord = match serde_json::from_slice(&data) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "unreadable master record: {e}");
                return Err(AuthError::Mismatch.into());
            }
        };
        if record.version != RECORD_VERSION {
            tracing::warn!(version = record.version, "unsupported master record version");
            return Err(AuthError::Mismatch.into());
        }

        let digest = hash_secret(candidate, &record.salt, &record.argon2_params)?;

        if digest.as_slice().ct_eq(&record.hash).into() {
            Ok(())
        } else {
            tracing::warn!("master password rejected");
            Err(AuthError::Mismatch.into())
        }
    }
}
