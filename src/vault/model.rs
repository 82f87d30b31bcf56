//! The credential data model.
//!
//! A `VaultDatabase` maps service names to an ordered list of
//! `CredentialEntry` values.  It is the single plaintext payload that
//! gets sealed: services serialize in name order (it is a `BTreeMap`)
//! and entries keep their insertion order, so the same logical content
//! always produces the same bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use crate::errors::{NotFound, Result, VaultError};

/// One username/password pair under a service.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct CredentialEntry {
    pub username: String,
    pub password: String,
}

impl CredentialEntry {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Result of `get`: one entry when a username was given, otherwise all.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    One(CredentialEntry),
    All(Vec<CredentialEntry>),
}

/// Whether `add_or_update` created an entry or replaced a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    Added,
    Updated,
}

/// A service name with its number of stored accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSummary {
    pub name: String,
    pub entry_count: usize,
}

/// Service name -> entries.  Never contains a service with no entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VaultDatabase {
    services: BTreeMap<String, Vec<CredentialEntry>>,
}

impl VaultDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the decrypted payload and check its invariants.
    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let db: Self = serde_json::from_slice(bytes)
            .map_err(|e| VaultError::Serialization(format!("vault database: {e}")))?;
        db.check_invariants()?;
        Ok(db)
    }

    /// Canonical plaintext for sealing.  Wiped when dropped.
    pub fn to_json(&self) -> Result<Zeroizing<Vec<u8>>> {
        serde_json::to_vec(self)
            .map(Zeroizing::new)
            .map_err(|e| VaultError::Serialization(format!("vault database: {e}")))
    }

    fn check_invariants(&self) -> Result<()> {
        for (service, entries) in &self.services {
            if entries.is_empty() {
                return Err(VaultError::Serialization(format!(
                    "vault database: service '{service}' has no entries"
                )));
            }
            for (i, entry) in entries.iter().enumerate() {
                if entries[..i].iter().any(|e| e.username == entry.username) {
                    return Err(VaultError::Serialization(format!(
                        "vault database: duplicate username '{}' in '{service}'",
                        entry.username
                    )));
                }
            }
        }
        Ok(())
    }

    /// Insert an entry, or replace the password of an existing username.
    pub fn upsert(&mut self, service: &str, username: &str, password: &str) -> Result<Upsert> {
        validate_identifier("service", service)?;
        validate_identifier("username", username)?;

        let entries = self.services.entry(service.to_string()).or_default();
        match entries.iter_mut().find(|e| e.username == username) {
            Some(existing) => {
                existing.password.zeroize();
                existing.password = password.to_string();
                Ok(Upsert::Updated)
            }
            None => {
                entries.push(CredentialEntry::new(username, password));
                Ok(Upsert::Added)
            }
        }
    }

    /// Look up one entry or every entry of a service.
    pub fn lookup(
        &self,
        service: &str,
        username: Option<&str>,
    ) -> std::result::Result<Lookup, NotFound> {
        let entries = self
            .services
            .get(service)
            .ok_or_else(|| NotFound::Service(service.to_string()))?;

        match username {
            Some(username) => entries
                .iter()
                .find(|e| e.username == username)
                .cloned()
                .map(Lookup::One)
                .ok_or_else(|| NotFound::Username {
                    service: service.to_string(),
                    username: username.to_string(),
                }),
            None => Ok(Lookup::All(entries.clone())),
        }
    }

    /// Remove one entry, dropping the service when it becomes empty.
    pub fn remove(&mut self, service: &str, username: &str) -> std::result::Result<(), NotFound> {
        let entries = self
            .services
            .get_mut(service)
            .ok_or_else(|| NotFound::Service(service.to_string()))?;

        let index = entries
            .iter()
            .position(|e| e.username == username)
            .ok_or_else(|| NotFound::Username {
                service: service.to_string(),
                username: username.to_string(),
            })?;

        entries.remove(index);
        if entries.is_empty() {
            self.services.remove(service);
        }
        Ok(())
    }

    /// Services in name order with their account counts.
    pub fn summaries(&self) -> Vec<ServiceSummary> {
        self.services
            .iter()
            .map(|(name, entries)| ServiceSummary {
                name: name.clone(),
                entry_count: entries.len(),
            })
            .collect()
    }

    pub fn service_count(&self) -> usize {
        self.services.len()
    }

    pub fn entry_count(&self) -> usize {
        self.services.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

/// Reject blank identifiers.  The stored value is kept exactly as given.
fn validate_identifier(kind: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(VaultError::InvalidIdentifier(format!(
            "{kind} cannot be empty"
        )));
    }
    Ok(())
}
