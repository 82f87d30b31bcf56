use std::path::PathBuf;
use thiserror::Error;

/// Master password admission failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("Incorrect master password")]
    Mismatch,

    #[error("Passwords don't match")]
    ConfirmationMismatch,
}

/// Failures while opening a sealed blob.
///
/// `AuthenticationFailed` and `MalformedBlob` deliberately share one
/// message so the output never reveals which check rejected the data.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UnsealError {
    #[error("Invalid encryption key length")]
    InvalidKey,

    #[error("Unable to decrypt vault — wrong key or corrupted data")]
    AuthenticationFailed,

    #[error("Unable to decrypt vault — wrong key or corrupted data")]
    MalformedBlob,
}

/// A lookup that found nothing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NotFound {
    #[error("No entries found for {0}")]
    Service(String),

    #[error("No entry found for username '{username}' in {service}")]
    Username { service: String, username: String },
}

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum VaultError {
    // --- Admission ---
    #[error(transparent)]
    Auth(#[from] AuthError),

    // --- Crypto errors ---
    #[error("Encryption key unavailable: {0}")]
    KeyUnavailable(String),

    #[error(transparent)]
    Unseal(#[from] UnsealError),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    // --- Vault errors ---
    #[error(transparent)]
    NotFound(#[from] NotFound),

    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),

    #[error("Vault at {0} is in use by another process")]
    VaultLocked(PathBuf),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    Config(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization errors ---
    #[error("Serialization error: {0}")]
    Serialization(String),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, VaultError>;
