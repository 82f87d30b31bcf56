//! Vault module: encrypted credential storage.
//!
//! This module provides:
//! - `CredentialEntry` and `VaultDatabase` types (`model`)
//! - Atomic on-disk writes and blob reading (`format`)
//! - The exclusive advisory lock (`lock`)
//! - High-level `VaultStore` for managing credentials (`store`)

pub mod format;
pub mod lock;
pub mod model;
pub mod store;

// Re-export the most commonly used items.
pub use lock::VaultLock;
pub use model::{CredentialEntry, Lookup, ServiceSummary, Upsert, VaultDatabase};
pub use store::VaultStore;
