//! Integration tests for the PassVault vault module.

use std::fs;

use passvault::crypto::{seal, unseal, KeyStore, SealedBlob, VaultKey};
use passvault::errors::{NotFound, UnsealError, VaultError};
use passvault::vault::{CredentialEntry, Lookup, ServiceSummary, Upsert, VaultStore};
use tempfile::TempDir;

/// Helper: a fresh temp dir with a data path and a generated key.
fn setup() -> (TempDir, std::path::PathBuf, VaultKey) {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("passwords.json");
    let key = KeyStore::new(dir.path().join("key.key"))
        .ensure_key()
        .expect("generate key");
    (dir, path, key)
}

/// Helper: decrypt the data file as it is on disk right now.
fn plaintext_on_disk(path: &std::path::Path, key: &VaultKey) -> Vec<u8> {
    let blob = SealedBlob::from_bytes(fs::read(path).expect("read data file"));
    unseal(key.as_bytes(), &blob).expect("unseal").to_vec()
}

// ---------------------------------------------------------------------------
// End-to-end scenario
// ---------------------------------------------------------------------------

#[test]
fn add_update_get_delete_scenario() {
    let (_dir, path, key) = setup();
    let mut store = VaultStore::open(&path, key).unwrap();
    assert!(store.list_services().is_empty());

    store.add_or_update("Gmail", "alice", "p1").unwrap();
    assert_eq!(
        store.get("Gmail", Some("alice")).unwrap(),
        Lookup::One(CredentialEntry::new("alice", "p1"))
    );

    assert_eq!(
        store.add_or_update("Gmail", "alice", "p2").unwrap(),
        Upsert::Updated
    );
    let Lookup::One(entry) = store.get("Gmail", Some("alice")).unwrap() else {
        panic!("expected one entry");
    };
    assert_eq!(entry.password, "p2");

    store.delete("Gmail", "alice").unwrap();
    assert_eq!(store.list_services(), Vec::<ServiceSummary>::new());
}

// ---------------------------------------------------------------------------
// Persistence across reopen
// ---------------------------------------------------------------------------

#[test]
fn data_survives_reopen() {
    let (dir, path, key) = setup();

    {
        let mut store = VaultStore::open(&path, key.clone()).unwrap();
        store.add_or_update("Gmail", "alice", "p1").unwrap();
        store.add_or_update("Gmail", "bob", "p2").unwrap();
        store.add_or_update("GitHub", "alice", "gh").unwrap();
    }

    // Reload the key from disk, as a new process would.
    let reloaded = KeyStore::new(dir.path().join("key.key")).ensure_key().unwrap();
    assert_eq!(reloaded, key);

    let store = VaultStore::open(&path, reloaded).unwrap();
    assert_eq!(
        store.list_services(),
        vec![
            ServiceSummary {
                name: "GitHub".into(),
                entry_count: 1
            },
            ServiceSummary {
                name: "Gmail".into(),
                entry_count: 2
            },
        ]
    );

    let Lookup::All(entries) = store.get("Gmail", None).unwrap() else {
        panic!("expected all entries");
    };
    assert_eq!(
        entries,
        vec![
            CredentialEntry::new("alice", "p1"),
            CredentialEntry::new("bob", "p2")
        ]
    );
}

#[test]
fn data_file_is_not_plaintext() {
    let (_dir, path, key) = setup();
    let mut store = VaultStore::open(&path, key).unwrap();
    store
        .add_or_update("Bank", "carol", "very-secret-pw")
        .unwrap();

    let raw = fs::read(&path).unwrap();
    let haystack = String::from_utf8_lossy(&raw);
    assert!(!haystack.contains("very-secret-pw"));
    assert!(!haystack.contains("carol"));
}

// ---------------------------------------------------------------------------
// Upsert idempotence
// ---------------------------------------------------------------------------

#[test]
fn repeated_upsert_leaves_identical_payload() {
    let (_dir, path, key) = setup();
    let mut store = VaultStore::open(&path, key.clone()).unwrap();

    assert_eq!(store.add_or_update("s", "u", "p").unwrap(), Upsert::Added);
    let first = plaintext_on_disk(&path, &key);
    let first_blob = fs::read(&path).unwrap();

    assert_eq!(store.add_or_update("s", "u", "p").unwrap(), Upsert::Updated);
    let second = plaintext_on_disk(&path, &key);

    assert_eq!(first, second);
    assert_eq!(store.entry_count(), 1);
    // Fresh nonce on every seal, so the ciphertext itself changes.
    assert_ne!(first_blob, fs::read(&path).unwrap());
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[test]
fn deleting_last_entry_prunes_service() {
    let (_dir, path, key) = setup();
    let mut store = VaultStore::open(&path, key.clone()).unwrap();
    store.add_or_update("Gmail", "alice", "p1").unwrap();
    store.add_or_update("Yahoo", "bob", "p2").unwrap();

    store.delete("Gmail", "alice").unwrap();

    let names: Vec<_> = store.list_services().into_iter().map(|s| s.name).collect();
    assert_eq!(names, ["Yahoo"]);
    assert_eq!(
        plaintext_on_disk(&path, &key),
        br#"{"Yahoo":[{"username":"bob","password":"p2"}]}"#
    );
}

#[test]
fn delete_missing_does_not_write() {
    let (_dir, path, key) = setup();
    let mut store = VaultStore::open(&path, key).unwrap();
    store.add_or_update("Gmail", "alice", "p1").unwrap();
    let before = fs::read(&path).unwrap();

    let err = store.delete("Gmail", "mallory").unwrap_err();
    assert!(matches!(
        err,
        VaultError::NotFound(NotFound::Username { .. })
    ));
    let err = store.delete("Nope", "alice").unwrap_err();
    assert!(matches!(err, VaultError::NotFound(NotFound::Service(_))));

    assert_eq!(fs::read(&path).unwrap(), before);
}

// ---------------------------------------------------------------------------
// Lookups
// ---------------------------------------------------------------------------

#[test]
fn get_reports_which_part_is_missing() {
    let (_dir, path, key) = setup();
    let mut store = VaultStore::open(&path, key).unwrap();
    store.add_or_update("Gmail", "alice", "p1").unwrap();

    assert!(matches!(
        store.get("Outlook", None),
        Err(VaultError::NotFound(NotFound::Service(s))) if s == "Outlook"
    ));
    assert!(matches!(
        store.get("Gmail", Some("bob")),
        Err(VaultError::NotFound(NotFound::Username { .. }))
    ));
}

#[test]
fn blank_service_is_rejected_and_not_persisted() {
    let (_dir, path, key) = setup();
    let mut store = VaultStore::open(&path, key).unwrap();

    let err = store.add_or_update("  ", "alice", "pw").unwrap_err();
    assert!(matches!(err, VaultError::InvalidIdentifier(_)));
    assert!(!path.exists());
}

// ---------------------------------------------------------------------------
// Crash consistency
// ---------------------------------------------------------------------------

#[test]
fn crash_before_rename_keeps_previous_file() {
    let (_dir, path, key) = setup();

    {
        let mut store = VaultStore::open(&path, key.clone()).unwrap();
        store.add_or_update("Gmail", "alice", "p1").unwrap();

        // Stage a newer snapshot, then "crash" before the rename.
        let mut next = store.database().clone();
        next.upsert("Gmail", "alice", "p2").unwrap();
        let staged = store.stage(&next).unwrap();
        assert!(staged.temp_path().exists());
        std::mem::forget(staged);
    }

    let mut store = VaultStore::open(&path, key).unwrap();
    assert_eq!(
        store.get("Gmail", Some("alice")).unwrap(),
        Lookup::One(CredentialEntry::new("alice", "p1"))
    );

    // The leftover temp file does not block the next write.
    store.add_or_update("Gmail", "alice", "p3").unwrap();
    assert_eq!(
        store.get("Gmail", Some("alice")).unwrap(),
        Lookup::One(CredentialEntry::new("alice", "p3"))
    );
}

// ---------------------------------------------------------------------------
// Fail closed
// ---------------------------------------------------------------------------

#[test]
fn wrong_key_fails_to_open() {
    let (_dir, path, key) = setup();
    {
        let mut store = VaultStore::open(&path, key).unwrap();
        store.add_or_update("Gmail", "alice", "p1").unwrap();
    }

    let other = VaultKey::new([0x11u8; 32]);
    let result = VaultStore::open(&path, other);
    assert!(matches!(
        result,
        Err(VaultError::Unseal(UnsealError::AuthenticationFailed))
    ));
}

#[test]
fn tampered_file_is_rejected_not_emptied() {
    let (_dir, path, key) = setup();
    {
        let mut store = VaultStore::open(&path, key.clone()).unwrap();
        store.add_or_update("Gmail", "alice", "p1").unwrap();
    }

    let mut data = fs::read(&path).unwrap();
    let mid = data.len() / 2;
    data[mid] ^= 0x01;
    fs::write(&path, &data).unwrap();

    assert!(
        VaultStore::open(&path, key).is_err(),
        "tampered vault must be rejected"
    );
}

#[test]
fn truncated_file_is_malformed() {
    let (_dir, path, key) = setup();
    fs::write(&path, b"PVLT").unwrap();

    let result = VaultStore::open(&path, key);
    assert!(matches!(
        result,
        Err(VaultError::Unseal(UnsealError::MalformedBlob))
    ));
}

#[test]
fn sealed_garbage_json_is_an_error() {
    let (_dir, path, key) = setup();
    let blob = seal(key.as_bytes(), b"not json").unwrap();
    fs::write(&path, blob.as_bytes()).unwrap();

    assert!(matches!(
        VaultStore::open(&path, key),
        Err(VaultError::Serialization(_))
    ));
}

// ---------------------------------------------------------------------------
// Exclusive access
// ---------------------------------------------------------------------------

#[cfg(unix)]
#[test]
fn second_open_is_locked_out() {
    let (_dir, path, key) = setup();
    let first = VaultStore::open(&path, key.clone()).unwrap();

    let second = VaultStore::open(&path, key.clone());
    assert!(matches!(second, Err(VaultError::VaultLocked(_))));

    drop(first);
    assert!(VaultStore::open(&path, key).is_ok());
}
