use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::Argon2Params;
use crate::errors::{Result, VaultError};

/// Vault-level configuration, loaded from `.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// File holding the raw encryption key.
    #[serde(default = "default_key_file")]
    pub key_file: String,

    /// File holding the sealed credential database.
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// File holding the master password record.
    #[serde(default = "default_master_file")]
    pub master_file: String,

    /// Argon2 memory cost in KiB (default: 64 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,

    /// Argon2 parallelism degree (default: 4).
    #[serde(default = "default_argon2_parallelism")]
    pub argon2_parallelism: u32,
}

/// Resolved locations of every vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultPaths {
    pub key_file: PathBuf,
    pub data_file: PathBuf,
    pub master_file: PathBuf,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_key_file() -> String {
    "key.key".to_string()
}

fn default_data_file() -> String {
    "passwords.json".to_string()
}

fn default_master_file() -> String {
    "master_pw.key".to_string()
}

fn default_argon2_memory_kib() -> u32 {
    65_536 // 64 MB
}

fn default_argon2_iterations() -> u32 {
    3
}

fn default_argon2_parallelism() -> u32 {
    4
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            key_file: default_key_file(),
            data_file: default_data_file(),
            master_file: default_master_file(),
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
            argon2_parallelism: default_argon2_parallelism(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the vault directory.
    pub const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<vault_dir>/.passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(vault_dir: &Path) -> Result<Self> {
        let config_path = vault_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::Config(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        tracing::debug!(path = %config_path.display(), "loaded settings");
        Ok(settings)
    }

    /// Resolve the configured file names against `vault_dir`.
    pub fn paths(&self, vault_dir: &Path) -> VaultPaths {
        VaultPaths {
            key_file: vault_dir.join(&self.key_file),
            data_file: vault_dir.join(&self.data_file),
            master_file: vault_dir.join(&self.master_file),
        }
    }

    /// Convert the Argon2 settings into crypto-layer params.
    pub fn argon2_params(&self) -> Argon2Params {
        Argon2Params {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
            parallelism: self.argon2_parallelism,
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────
