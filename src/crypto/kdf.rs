//! Argon2id hashing for the master password reference.
//!
//! The master password never touches disk.  What is stored is an
//! Argon2id digest of it under a random salt, using parameters from
//! `Argon2Params` (loaded from `.passvault.toml` or defaults).

use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::TryRngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Length of the salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Length of the digest in bytes (256 bits).
pub const DIGEST_LEN: usize = 32;

/// Minimum safe memory cost in KiB (8 MB).
const MIN_MEMORY_KIB: u32 = 8_192;

/// Argon2id cost parameters.
///
/// Serialized into the master record so verification always uses the
/// parameters the record was created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2Params {
    /// Memory cost in KiB (default: 65 536 = 64 MB).
    pub memory_kib: u32,
    /// Number of iterations (default: 3).
    pub iterations: u32,
    /// Parallelism lanes (default: 4).
    pub parallelism: u32,
}

impl Default for Argon2Params {
    fn default() -> Self {
        Self {
            memory_kib: 65_536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

impl Argon2Params {
    /// Reject settings too weak to be worth storing.
    pub fn validate(&self) -> Result<()> {
        if self.memory_kib < MIN_MEMORY_KIB {
            return Err(VaultError::KeyDerivationFailed(format!(
                "Argon2 memory_kib must be at least {MIN_MEMORY_KIB} (got {})",
                self.memory_kib
            )));
        }
        if self.iterations < 1 {
            return Err(VaultError::KeyDerivationFailed(
                "Argon2 iterations must be at least 1".into(),
            ));
        }
        if self.parallelism < 1 {
            return Err(VaultError::KeyDerivationFailed(
                "Argon2 parallelism must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Hash `secret` under `salt` with Argon2id.
///
/// The same secret + salt + params always produce the same digest.
pub fn hash_secret(
    secret: &[u8],
    salt: &[u8],
    argon2_params: &Argon2Params,
) -> Result<Zeroizing<[u8; DIGEST_LEN]>> {
    argon2_params.validate()?;

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(DIGEST_LEN),
    )
    .map_err(|e| VaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut digest = Zeroizing::new([0u8; DIGEST_LEN]);
    argon2
        .hash_password_into(secret, salt, &mut digest[..])
        .map_err(|e| VaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(digest)
}

/// Generate a cryptographically random 32-byte salt.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| VaultError::KeyDerivationFailed(format!("OS random source failed: {e}")))?;
    Ok(salt)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast() -> Argon2Params {
        Argon2Params {
            memory_kib: MIN_MEMORY_KIB,
            iterations: 1,
            parallelism: 1,
        }
    }

    #[test]
    fn same_inputs_same_digest() {
        let salt = [7u8; SALT_LEN];
        let a = hash_secret(b"hunter2", &salt, &fast()).unwrap();
        let b = hash_secret(b"hunter2", &salt, &fast()).unwrap();
        assert_eq!(*a, *b);
    }

    #[test]
    fn salt_changes_digest() {
        let a = hash_secret(b"hunter2", &[1u8; SALT_LEN], &fast()).unwrap();
        let b = hash_secret(b"hunter2", &[2u8; SALT_LEN], &fast()).unwrap();
        assert_ne!(*a, *b);
    }

    #[test]
    fn weak_params_rejected() {
        let weak = Argon2Params {
            memory_kib: 1024,
            ..fast()
        };
        assert!(hash_secret(b"pw", &[0u8; SALT_LEN], &weak).is_err());

        let zero_iter = Argon2Params {
            iterations: 0,
            ..fast()
        };
        assert!(zero_iter.validate().is_err());
    }

    #[test]
    fn salts_are_random() {
        assert_ne!(generate_salt().unwrap(), generate_salt().unwrap());
    }
}
