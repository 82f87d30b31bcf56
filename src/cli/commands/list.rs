//! `passvault list`: display all services in a table.

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::Result;
use crate::session::VaultHandle;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let handle = open_vault(cli)?;
    run(&handle);
    Ok(())
}

pub fn run(handle: &VaultHandle) {
    let services = handle.list();
    if !services.is_empty() {
        output::info(&format!("{} service(s) stored", services.len()));
    }
    output::print_services_table(&services);
}
