//! Colored terminal output helpers.
//!
//! All user-facing output goes through these functions so we get
//! consistent styling across every command.

use comfy_table::{ContentArrangement, Table};
use console::style;

use crate::vault::{CredentialEntry, ServiceSummary};

/// Print a green success message: "check_mark {msg}"
pub fn success(msg: &str) {
    println!("{} {}", style("\u{2713}").green().bold(), msg);
}

/// Print a red error message: "x_mark {msg}"
pub fn error(msg: &str) {
    eprintln!("{} {}", style("\u{2717}").red().bold(), msg);
}

/// Print a yellow warning: "warning_sign {msg}"
pub fn warning(msg: &str) {
    eprintln!("{} {}", style("\u{26a0}").yellow().bold(), msg);
}

/// Print a blue info message: "info_sign {msg}"
pub fn info(msg: &str) {
    println!("{} {}", style("\u{2139}").blue().bold(), msg);
}

/// Print a dim tip/hint: "arrow {msg}"
pub fn tip(msg: &str) {
    println!("{} {}", style("\u{2192}").dim(), style(msg).dim());
}

/// Print a table of services (Service, Accounts).
pub fn print_services_table(services: &[ServiceSummary]) {
    if services.is_empty() {
        info("No passwords stored yet.");
        tip("Run `passvault add <SERVICE> <USERNAME>` to add your first password.");
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "Accounts"]);

    for s in services {
        table.add_row(vec![s.name.clone(), s.entry_count.to_string()]);
    }

    println!("{table}");
}

/// Print every account of a service (Username, Password).
pub fn print_entries_table(service: &str, entries: &[CredentialEntry]) {
    info(&format!("Accounts for {service}:"));

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Username", "Password"]);

    for e in entries {
        table.add_row(vec![e.username.as_str(), e.password.as_str()]);
    }

    println!("{table}");
}

/// Print a single password.
pub fn print_entry(service: &str, entry: &CredentialEntry) {
    println!(
        "Password for {}@{}: {}",
        style(&entry.username).bold(),
        style(service).bold(),
        entry.password
    );
}
