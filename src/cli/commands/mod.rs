//! One module per subcommand.
//!
//! Each credential command has an `execute` that authenticates from the
//! CLI arguments and a `run` that works on an already-open handle, which
//! the interactive shell reuses.

pub mod add;
pub mod completions;
pub mod delete;
pub mod get;
pub mod list;
pub mod shell;
