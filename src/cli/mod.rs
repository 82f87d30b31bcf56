//! CLI module: Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::Parser;
use zeroize::Zeroizing;

use crate::auth::MasterAuthenticator;
use crate::config::{Settings, VaultPaths};
use crate::errors::{Result, VaultError};
use crate::session::{self, VaultHandle};

/// Environment variable consulted before prompting for the master password.
pub const PASSWORD_ENV: &str = "PASSVAULT_PASSWORD";

/// PassVault CLI: local encrypted password manager.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local encrypted password manager",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding the vault files (default: current directory)
    #[arg(short, long, default_value = ".", env = "PASSVAULT_DIR", global = true)]
    pub dir: PathBuf,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Interactive menu (default when no command is given)
    Shell,

    /// Add a password, or update it if the username already exists
    Add {
        /// Service name (e.g. Gmail)
        service: String,
        /// Username or email
        username: String,
    },

    /// Retrieve a password, or every account of a service
    Get {
        /// Service name
        service: String,
        /// Username (omit to show all accounts)
        username: Option<String>,
    },

    /// List all services with stored passwords
    List,

    /// Delete a password entry
    Delete {
        /// Service name
        service: String,
        /// Username to delete
        username: String,
        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the vault directory and resolve the file paths.
pub fn load_settings(cli: &Cli) -> Result<(Settings, VaultPaths)> {
    let settings = Settings::load(&cli.dir)?;
    let paths = settings.paths(&cli.dir);
    Ok((settings, paths))
}

/// Get the master password for an existing vault.
///
/// `PASSVAULT_PASSWORD` wins over the interactive prompt (scripts, CI).
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_master_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter master password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new master password twice (first run).
///
/// The two entries are compared with `MasterAuthenticator::confirm`; a
/// mismatch aborts instead of retrying.
pub fn prompt_new_master_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let first = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Set master password")
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
    );
    let second = Zeroizing::new(
        dialoguer::Password::new()
            .with_prompt("Confirm master password")
            .interact()
            .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
    );

    MasterAuthenticator::confirm(first.as_bytes(), second.as_bytes())?;
    Ok(first)
}

fn password_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}

/// Authenticate and open the vault in `cli.dir`.
pub fn open_vault(cli: &Cli) -> Result<VaultHandle> {
    let (settings, paths) = load_settings(cli)?;

    let first_run = session::is_first_run(&paths);
    let password = if first_run {
        prompt_new_master_password()?
    } else {
        prompt_master_password()?
    };

    let handle = session::authenticate(&paths, &settings.argon2_params(), password.as_bytes())?;
    if first_run {
        output::success("Master password set successfully.");
    }
    Ok(handle)
}

/// Read a credential password from piped stdin, or prompt for it.
pub fn read_secret(prompt: &str) -> Result<Zeroizing<String>> {
    if !io::stdin().is_terminal() {
        let mut buf = Zeroizing::new(String::new());
        io::stdin().read_to_string(&mut buf)?;
        let trimmed = Zeroizing::new(buf.trim_end_matches(['\r', '\n']).to_string());
        return Ok(trimmed);
    }

    let pw = dialoguer::Password::new()
        .with_prompt(prompt)
        .allow_empty_password(true)
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("input prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}
