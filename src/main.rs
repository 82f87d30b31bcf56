use clap::Parser;
use passvault::cli::{commands, Cli, Commands};
use tracing_subscriber::EnvFilter;

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so they never mix with printed passwords.
    let default_level = if cli.verbose { "passvault=debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        None | Some(Commands::Shell) => commands::shell::execute(&cli),
        Some(Commands::Add {
            ref service,
            ref username,
        }) => commands::add::execute(&cli, service, username),
        Some(Commands::Get {
            ref service,
            ref username,
        }) => commands::get::execute(&cli, service, username.as_deref()),
        Some(Commands::List) => commands::list::execute(&cli),
        Some(Commands::Delete {
            ref service,
            ref username,
            force,
        }) => commands::delete::execute(&cli, service, username, force),
        Some(Commands::Completions { shell }) => commands::completions::execute(shell),
    };

    if let Err(e) = result {
        passvault::cli::output::error(&e.to_string());
        std::process::exit(1);
    }
}
