pub mod commands;
pub mod core;
pub mod format;
pub mod help;
pub mod io;
pub mod output;
pub mod registry;
mod shell;

pub use self::core::{CliError, CliMode, CommandError, ShellContext};
pub use shell::run_cli;
