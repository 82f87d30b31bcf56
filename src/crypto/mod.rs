//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - AES-256-GCM sealing and unsealing of the database (`encryption`)
//! - Argon2id hashing for the master password record (`kdf`)
//! - The zeroizing key type (`keys`) and its on-disk home (`keystore`)

pub mod encryption;
pub mod kdf;
pub mod keys;
pub mod keystore;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{seal, unseal, KeyStore, ...};
pub use encryption::{seal, unseal, SealedBlob, KEY_LEN};
pub use kdf::{generate_salt, hash_secret, Argon2Params};
pub use keys::VaultKey;
pub use keystore::KeyStore;
