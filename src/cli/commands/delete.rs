//! `passvault delete`: remove a password entry.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};
use crate::session::VaultHandle;

/// Execute the `delete` command.
pub fn execute(cli: &Cli, service: &str, username: &str, force: bool) -> Result<()> {
    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete {username}@{service}?"))
            .default(false)
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    let mut handle = open_vault(cli)?;
    run(&mut handle, service, username)
}

pub fn run(handle: &mut VaultHandle, service: &str, username: &str) -> Result<()> {
    handle.delete(service, username)?;
    output::success(&format!("Entry for {username}@{service} deleted successfully."));
    Ok(())
}
