//! `passvault shell`: the interactive menu.
//!
//! Authenticates once, then loops over the same five choices as the
//! classic password manager menu until the operator picks Exit.  Errors
//! from a single action (unknown service, blank name) are shown and the
//! loop continues; the vault stays locked by this process meanwhile.

use dialoguer::{Input, Select};

use crate::cli::output;
use crate::cli::{open_vault, Cli};
use crate::errors::{Result, VaultError};
use crate::session::VaultHandle;

/// Menu entries, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Add,
    Retrieve,
    List,
    Delete,
    Exit,
}

impl MenuChoice {
    const ALL: [MenuChoice; 5] = [
        MenuChoice::Add,
        MenuChoice::Retrieve,
        MenuChoice::List,
        MenuChoice::Delete,
        MenuChoice::Exit,
    ];

    fn label(self) -> &'static str {
        match self {
            MenuChoice::Add => "Add new password",
            MenuChoice::Retrieve => "Retrieve password",
            MenuChoice::List => "List all services",
            MenuChoice::Delete => "Delete password entry",
            MenuChoice::Exit => "Exit",
        }
    }
}

/// Execute the `shell` command.
pub fn execute(cli: &Cli) -> Result<()> {
    println!("=== Password Manager ===");
    let mut handle = open_vault(cli)?;

    let labels: Vec<&str> = MenuChoice::ALL.iter().map(|c| c.label()).collect();

    loop {
        println!();
        let index = Select::new()
            .with_prompt("Options")
            .items(&labels)
            .default(0)
            .interact()
            .map_err(prompt_error)?;

        let choice = MenuChoice::ALL[index];
        if choice == MenuChoice::Exit {
            output::info("Exiting Password Manager. Goodbye!");
            return Ok(());
        }

        if let Err(e) = dispatch(&mut handle, choice) {
            match e {
                // Per-action problems: report and keep the session open.
                VaultError::NotFound(_) | VaultError::InvalidIdentifier(_) => {
                    output::warning(&e.to_string());
                }
                other => return Err(other),
            }
        }
    }
}

fn dispatch(handle: &mut VaultHandle, choice: MenuChoice) -> Result<()> {
    match choice {
        MenuChoice::Add => {
            let service = ask("Enter service name (e.g., 'Gmail')", false)?;
            let username = ask("Enter username/email", false)?;
            let password = crate::cli::read_secret("Enter password")?;
            super::add::run(handle, &service, &username, &password)
        }
        MenuChoice::Retrieve => {
            let service = ask("Enter service name", false)?;
            let username = ask("Enter username (leave blank to see all)", true)?;
            let username = Some(username.trim()).filter(|u| !u.is_empty());
            super::get::run(handle, &service, username)
        }
        MenuChoice::List => {
            super::list::run(handle);
            Ok(())
        }
        MenuChoice::Delete => {
            let service = ask("Enter service name", false)?;
            let username = ask("Enter username to delete", false)?;
            super::delete::run(handle, &service, &username)
        }
        MenuChoice::Exit => Ok(()),
    }
}

fn ask(prompt: &str, allow_empty: bool) -> Result<String> {
    Input::<String>::new()
        .with_prompt(prompt)
        .allow_empty(allow_empty)
        .interact_text()
        .map_err(prompt_error)
}

fn prompt_error(e: dialoguer::Error) -> VaultError {
    VaultError::CommandFailed(format!("prompt failed: {e}"))
}
