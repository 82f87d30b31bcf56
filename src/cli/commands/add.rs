//! `passvault add`: add a password or update an existing one.

use crate::cli::output;
use crate::cli::{open_vault, read_secret, Cli};
use crate::errors::Result;
use crate::session::VaultHandle;
use crate::vault::Upsert;

/// Execute the `add` command.
pub fn execute(cli: &Cli, service: &str, username: &str) -> Result<()> {
    let mut handle = open_vault(cli)?;
    let password = read_secret(&format!("Enter password for {username}@{service}"))?;
    run(&mut handle, service, username, &password)
}

/// Store the credential and report whether it was new.
pub fn run(handle: &mut VaultHandle, service: &str, username: &str, password: &str) -> Result<()> {
    let outcome = handle.add(service, username, password)?;

    let verb = match outcome {
        Upsert::Added => "added",
        Upsert::Updated => "updated",
    };
    output::success(&format!(
        "Password for {username}@{service} {verb} ({} services, {} accounts)",
        handle.store().service_count(),
        handle.store().entry_count()
    ));
    Ok(())
}
