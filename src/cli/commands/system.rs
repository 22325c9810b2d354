use crate::cli::core::{parse_amount, required, CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::ledger::CURRENT_SCHEMA_VERSION;
use crate::utils::build_info;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "config",
            "Show or change preferences",
            "config [locale|currency|retention|regular-fee|associate-fee <value> | backup [note] | backups | restore <file>]",
            cmd_config,
        ),
        CommandEntry::new("version", "Show build metadata", "version", cmd_version),
        CommandEntry::new(
            "help",
            "Show available commands",
            "help [command]",
            cmd_help,
        ),
        CommandEntry::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_config(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        let config = &context.config;
        output_section("Configuration");
        io::print_info(format!("  locale        : {}", config.locale));
        io::print_info(format!("  currency      : {}", config.currency));
        io::print_info(format!("  retention     : {}", config.backup_retention));
        io::print_info(format!("  regular-fee   : {}", config.default_fees.regular_fee));
        io::print_info(format!("  associate-fee : {}", config.default_fees.associate_fee));
        io::print_info(format!(
            "  last club     : {}",
            config.last_opened_club.as_deref().unwrap_or("-")
        ));
        io::print_info(format!("  file          : {}", context.config_manager.path().display()));
        return Ok(());
    }
    match args[0].to_ascii_lowercase().as_str() {
        "backup" => {
            let note = (args.len() > 1).then(|| args[1..].join(" "));
            let name = context
                .config_manager
                .backup(&context.config, note.as_deref())?;
            io::print_success(format!("Configuration backed up as {}.", name));
            return Ok(());
        }
        "backups" => {
            output_section("Configuration backups");
            let backups = context.config_manager.list_backups()?;
            if backups.is_empty() {
                io::print_info("No configuration backups yet.");
            }
            for (index, name) in backups.iter().enumerate() {
                io::print_info(format!("  {:>2}. {}", index + 1, name));
            }
            return Ok(());
        }
        "restore" => {
            let name = required(args, 1, "config restore <backup file>")?;
            context.config = context.config_manager.restore(name)?;
            io::print_success(format!("Configuration restored from {}.", name));
            return Ok(());
        }
        _ => {}
    }

    let usage = "config <key> <value>";
    let key = required(args, 0, usage)?.to_ascii_lowercase();
    let value = required(args, 1, usage)?;
    let mut updated = context.config.clone();
    match key.as_str() {
        "locale" => updated.locale = value.to_string(),
        "currency" => updated.currency = value.to_ascii_uppercase(),
        "retention" => {
            updated.backup_retention = value
                .parse::<usize>()
                .ok()
                .filter(|count| *count > 0)
                .ok_or_else(|| {
                    CommandError::InvalidArguments("retention must be a positive number".into())
                })?
        }
        "regular-fee" => updated.default_fees.regular_fee = parse_amount(value)?,
        "associate-fee" => updated.default_fees.associate_fee = parse_amount(value)?,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown setting `{}`",
                other
            )))
        }
    }
    context.config_manager.save(&updated)?;
    context.config = updated;
    io::print_success(format!("Updated {}. Retention changes apply after restart.", key));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output_section(format!("Club Ledger {}", meta.version));
    io::print_info(format!("  CLI version  : {}", build_info::CLI_VERSION));
    io::print_info(format!("  Schema ver   : v{}", CURRENT_SCHEMA_VERSION));
    io::print_info(format!(
        "  Build hash   : {} ({})",
        meta.git_hash, meta.git_status
    ));
    io::print_info(format!("  Built at     : {}", meta.timestamp));
    io::print_info(format!("  Target       : {}", meta.target));
    io::print_info(format!("  Profile      : {}", meta.profile));
    io::print_info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(command) => help::print_command(command),
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
