//! AES-256-GCM sealing of the credential database.
//!
//! Each call to `seal` generates a fresh random 12-byte nonce.  The blob
//! carries a short versioned prefix which is authenticated as associated
//! data, so editing the prefix fails exactly like editing the ciphertext.
//!
//! Layout of a sealed blob:
//!   [ "PVLT" | version: 1 byte | 12-byte nonce | ciphertext + 16-byte tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{Result, UnsealError, VaultError};

/// Magic bytes at the start of every sealed blob.
const MAGIC: &[u8; 4] = b"PVLT";

/// Current blob format version.
pub const BLOB_VERSION: u8 = 1;

/// Magic + version.
const PREFIX_LEN: usize = 5;

/// Size of the AES-256-GCM nonce in bytes.
const NONCE_LEN: usize = 12;

/// Size of the GCM authentication tag in bytes.
const TAG_LEN: usize = 16;

/// Required key length in bytes (AES-256).
pub const KEY_LEN: usize = 32;

/// Opaque authenticated ciphertext, exactly as stored on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SealedBlob(Vec<u8>);

impl SealedBlob {
    /// Wrap bytes read from disk.  No validation happens until `unseal`.
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn prefix() -> [u8; PREFIX_LEN] {
    let mut p = [0u8; PREFIX_LEN];
    p[..4].copy_from_slice(MAGIC);
    p[4] = BLOB_VERSION;
    p
}

/// Seal `plaintext` with a 32-byte `key`.
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<SealedBlob> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| UnsealError::InvalidKey)?;

    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let aad = prefix();

    let ciphertext = cipher
        .encrypt(
            &nonce,
            Payload {
                msg: plaintext,
                aad: &aad,
            },
        )
        .map_err(|e| VaultError::EncryptionFailed(format!("encryption error: {e}")))?;

    let mut output = Vec::with_capacity(PREFIX_LEN + NONCE_LEN + ciphertext.len());
    output.extend_from_slice(&aad);
    output.extend_from_slice(&nonce);
    output.extend_from_slice(&ciphertext);
    Ok(SealedBlob(output))
}

/// Open a blob produced by `seal`.
///
/// The plaintext is only returned when the tag verifies.  It comes back
/// in a `Zeroizing` buffer so it is wiped when the caller drops it.
pub fn unseal(
    key: &[u8],
    blob: &SealedBlob,
) -> std::result::Result<Zeroizing<Vec<u8>>, UnsealError> {
    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| UnsealError::InvalidKey)?;

    let data = blob.as_bytes();
    if data.len() < PREFIX_LEN + NONCE_LEN + TAG_LEN {
        return Err(UnsealError::MalformedBlob);
    }

    // The tag is always checked, and the stored prefix is compared in
    // constant time afterwards, so an edited header fails exactly like an
    // edited ciphertext.
    let aad = prefix();
    let (nonce_bytes, ciphertext) = data[PREFIX_LEN..].split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    let opened = cipher.decrypt(
        nonce,
        Payload {
            msg: ciphertext,
            aad: &aad,
        },
    );
    let header_ok = data[..PREFIX_LEN].ct_eq(&aad[..]);
    let plaintext = match opened {
        Ok(pt) if bool::from(header_ok) => pt,
        Ok(mut pt) => {
            pt.zeroize();
            return Err(UnsealError::AuthenticationFailed);
        }
        Err(_) => return Err(UnsealError::AuthenticationFailed),
    };

    Ok(Zeroizing::new(plaintext))
}
