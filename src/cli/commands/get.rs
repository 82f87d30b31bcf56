//! `passvault get`: print one password or every account of a service.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;
use crate::session::VaultHandle;
use crate::vault::Lookup;

/// Execute the `get` command.
pub fn execute(cli: &Cli, service: &str, username: Option<&str>) -> Result<()> {
    let handle = open_vault(cli)?;
    run(&handle, service, username)
}

pub fn run(handle: &VaultHandle, service: &str, username: Option<&str>) -> Result<()> {
    match handle.get(service, username)? {
        Lookup::One(entry) => output::print_entry(service, &entry),
        Lookup::All(entries) => output::print_entries_table(service, &entries),
    }
    Ok(())
}
