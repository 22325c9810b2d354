//! Shell context, dispatch and the error types shared by every command.

use std::{io, path::PathBuf};

use chrono::{Datelike, Local, NaiveDate};
use rustyline::error::ReadlineError;
use strsim::levenshtein;

use crate::{
    config::{Config, ConfigManager},
    core::{
        services::{RosterService, ServiceError, ServiceResult},
        utils::PathResolver,
        ClubManager, LoadMetadata,
    },
    domain::MemberId,
    errors::LedgerError,
    ledger::ClubBook,
    storage::JsonStorage,
};

use super::commands;
use super::io as cli_io;
use super::output::{self, OutputPreferences};
use super::registry::{CommandEntry, CommandRegistry};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    pub manager: ClubManager,
    pub config_manager: ConfigManager,
    pub config: Config,
    /// Year that dues commands operate on.
    pub year: i32,
    pub last_command: Option<String>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        Self::with_base_dir(mode, PathResolver::base_dir())
    }

    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config_manager = ConfigManager::with_base_dir(base.clone())?;
        let config = config_manager.load()?;
        let storage = JsonStorage::new(Some(base), Some(config.backup_retention))?;
        output::set_preferences(OutputPreferences {
            plain: mode == CliMode::Script,
        });

        let mut app = ShellContext {
            mode,
            registry,
            manager: ClubManager::new(Box::new(storage)),
            config_manager,
            config,
            year: Local::now().year(),
            last_command: None,
            running: true,
        };
        app.auto_load_last()?;
        Ok(app)
    }

    fn auto_load_last(&mut self) -> Result<(), CliError> {
        if self.mode != CliMode::Interactive {
            return Ok(());
        }
        let Some(name) = self.config.last_opened_club.clone() else {
            return Ok(());
        };
        if let Ok(meta) = self.manager.load(&name) {
            self.report_load(&meta);
            cli_io::print_success(format!("Automatically opened last club `{}`.", name));
        }
        Ok(())
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        match self.manager.current_name() {
            Some(name) => format!("club[{} {}]> ", name, self.year),
            None => "club> ".to_string(),
        }
    }

    pub(crate) fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    pub(crate) fn club(&self) -> Result<&ClubBook, CommandError> {
        Ok(self.manager.current()?)
    }

    /// Applies a change to the open club; the manager persists it on success.
    pub(crate) fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut ClubBook) -> ServiceResult<T>,
    ) -> Result<T, CommandError> {
        Ok(self.manager.mutate(f)?)
    }

    /// Resolves a member by id, exact name or unique name prefix.
    pub(crate) fn member_id(&self, key: &str) -> Result<MemberId, CommandError> {
        let book = self.club()?;
        Ok(RosterService::resolve(book, key)?.id.clone())
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        Ok(self.config_manager.save(&self.config)?)
    }

    pub(crate) fn remember_club(&mut self, name: Option<&str>) -> CommandResult {
        self.config.last_opened_club = name.map(str::to_string);
        self.persist_config()
    }

    pub(crate) fn report_load(&self, meta: &LoadMetadata) {
        for warning in &meta.warnings {
            cli_io::print_warning(warning);
        }
    }

    /// Asks before a destructive action. Script mode always proceeds.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(prompt, false)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = crate::cli::shell::parse_command_line(line)
            .map_err(|err| CommandError::InvalidArguments(err.to_string()))?;
        let Some((raw, rest)) = tokens.split_first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = rest.iter().map(String::as_str).collect();
        self.dispatch(&raw.to_lowercase(), raw, &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let best = self
            .registry
            .names()
            .map(|key| (levenshtein(key, &input.to_lowercase()), key))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, best)) = best {
            if distance <= 3 {
                cli_io::print_info(format!("Suggestion: `{}`?", best));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Ok(cli_io::confirm_action("Exit shell?", true)?)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                cli_io::print_error(message);
                cli_io::print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::ClubNotLoaded => {
                cli_io::print_error(CommandError::ClubNotLoaded);
                cli_io::print_hint("Try `demo` to explore with generated data.");
                Ok(())
            }
            other => {
                cli_io::print_error(other);
                Ok(())
            }
        }
    }
}

/// Returns `args[index]` or a usage error.
pub(crate) fn required<'a>(args: &[&'a str], index: usize, usage: &str) -> Result<&'a str, CommandError> {
    args.get(index)
        .copied()
        .ok_or_else(|| CommandError::InvalidArguments(format!("usage: {}", usage)))
}

pub(crate) fn parse_date(input: &str) -> Result<NaiveDate, CommandError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|_| {
        CommandError::InvalidArguments(format!("invalid date `{}` (use YYYY-MM-DD)", input))
    })
}

pub(crate) fn parse_year(input: &str) -> Result<i32, CommandError> {
    input
        .parse::<i32>()
        .ok()
        .filter(|year| (1900..=9999).contains(year))
        .ok_or_else(|| CommandError::InvalidArguments(format!("invalid year `{}`", input)))
}

/// Month numbers are range-checked by the ledger; this only rejects non-numbers.
pub(crate) fn parse_month(input: &str) -> Result<u32, CommandError> {
    input
        .parse::<u32>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid month `{}`", input)))
}

pub(crate) fn parse_amount(input: &str) -> Result<i64, CommandError> {
    input
        .replace(',', "")
        .parse::<i64>()
        .map_err(|_| CommandError::InvalidArguments(format!("invalid amount `{}`", input)))
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("No club loaded. Use `new <name>` or `open <name>` first.")]
    ClubNotLoaded,
    #[error("{0}")]
    InvalidArguments(String),
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Ledger(LedgerError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<LedgerError> for CommandError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::ClubNotLoaded => CommandError::ClubNotLoaded,
            other => CommandError::Ledger(other),
        }
    }
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Ledger(err) => CommandError::from(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
        }
    }
}

/// Failures that stop the shell itself.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Invalid input: {0}")]
    Input(String),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

impl From<ReadlineError> for CliError {
    fn from(err: ReadlineError) -> Self {
        CliError::Input(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(base: PathBuf, lines: &[&str]) -> Result<ShellContext, CliError> {
    let mut app = ShellContext::with_base_dir(CliMode::Script, base)?;
    for line in lines {
        match app.process_line(line)? {
            LoopControl::Continue => {}
            LoopControl::Exit => break,
        }
    }
    Ok(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::MonthStatus;
    use tempfile::tempdir;

    #[test]
    fn script_creates_club_and_records_dues() {
        let temp = tempdir().unwrap();
        let app = process_script(
            temp.path().to_path_buf(),
            &[
                "new riverside \"Riverside Tennis\"",
                "year 2025",
                "add-member \"Member 001\" regular 2025-06-10",
                "pay \"member 001\" 6",
                "exempt \"member 001\" 7",
            ],
        )
        .unwrap();
        let book = app.club().unwrap();
        assert_eq!(book.name, "Riverside Tennis");
        let id = app.member_id("Member 001").unwrap();
        assert_eq!(book.month_status(&id, 2025, 6).unwrap(), MonthStatus::Paid(30_000));
        assert_eq!(book.month_status(&id, 2025, 7).unwrap(), MonthStatus::Exempt);
        assert_eq!(app.config.last_opened_club.as_deref(), Some("riverside"));
    }

    #[test]
    fn commands_without_club_report_not_loaded() {
        let temp = tempdir().unwrap();
        let mut app = ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf()).unwrap();
        let err = app.process_line("members").unwrap_err();
        assert!(matches!(err, CommandError::ClubNotLoaded));
    }

    #[test]
    fn exit_stops_the_loop() {
        let temp = tempdir().unwrap();
        let mut app = ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf()).unwrap();
        assert_eq!(app.process_line("exit").unwrap(), LoopControl::Exit);
        assert_eq!(app.process_line("statuss").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn invalid_month_surfaces_ledger_error() {
        let temp = tempdir().unwrap();
        let mut app = process_script(
            temp.path().to_path_buf(),
            &["new club", "add-member \"Member 001\" regular 2024-01-01"],
        )
        .unwrap();
        let err = app.process_line("pay \"member 001\" 13").unwrap_err();
        assert!(matches!(err, CommandError::Ledger(LedgerError::InvalidMonth(13))));
    }

    #[test]
    fn oversized_fee_is_refused_and_totals_still_render() {
        let temp = tempdir().unwrap();
        let mut app = process_script(
            temp.path().to_path_buf(),
            &["new club", "year 2025", "add-member \"Member 001\" regular 2024-01-01"],
        )
        .unwrap();
        let err = app.process_line("fees 9223372036854775807 0").unwrap_err();
        assert!(matches!(err, CommandError::Ledger(LedgerError::InvalidInput(_))));
        assert_eq!(app.process_line("totals").unwrap(), LoopControl::Continue);
        assert_eq!(app.process_line("status \"member 001\"").unwrap(), LoopControl::Continue);
    }

    #[test]
    fn parses_amounts_with_grouping() {
        assert_eq!(parse_amount("30,000").unwrap(), 30_000);
        assert!(parse_amount("thirty").is_err());
        assert!(parse_year("20x5").is_err());
    }
}
