//! Opening, saving and backing up clubs.

use crate::cli::core::{required, CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::fixtures::DemoRoster;

const DEMO_CLUB: &str = "demo";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "new",
            "Create a club with the configured default fees",
            "new <name> [display name]",
            cmd_new,
        ),
        CommandEntry::new("open", "Open a saved club", "open <name>", cmd_open),
        CommandEntry::new("clubs", "List saved clubs", "clubs", cmd_clubs),
        CommandEntry::new(
            "save",
            "Save the open club, optionally under a new name",
            "save [name]",
            cmd_save,
        ),
        CommandEntry::new(
            "backup",
            "Write a timestamped backup of the open club",
            "backup [note]",
            cmd_backup,
        ),
        CommandEntry::new(
            "backups",
            "List backups of the open club, newest first",
            "backups",
            cmd_backups,
        ),
        CommandEntry::new(
            "restore",
            "Replace the open club with one of its backups",
            "restore <backup file | index>",
            cmd_restore,
        ),
        CommandEntry::new(
            "demo",
            "Create the `demo` club from generated data",
            "demo [members] [year]",
            cmd_demo,
        ),
    ]
}

fn cmd_new(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "new <name> [display name]";
    let name = required(args, 0, usage)?;
    let display = if args.len() > 1 {
        args[1..].join(" ")
    } else {
        name.to_string()
    };
    let fees = context.config.default_fees;
    let path = context.manager.create(name, &display, fees)?;
    context.remember_club(Some(name))?;
    io::print_success(format!("Club `{}` created at {}.", display, path.display()));
    Ok(())
}

fn cmd_open(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let name = required(args, 0, "open <name>")?;
    let meta = context.manager.load(name)?;
    context.report_load(&meta);
    context.remember_club(Some(name))?;
    let book = context.club()?;
    io::print_success(format!(
        "Opened `{}` ({} members).",
        book.name,
        book.members.len()
    ));
    Ok(())
}

fn cmd_clubs(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let clubs = context.manager.list_clubs()?;
    output_section("Clubs");
    if clubs.is_empty() {
        io::print_info("No saved clubs. Use `new <name>` to create one.");
    }
    let current = context.manager.current_name().map(str::to_string);
    for name in clubs {
        let marker = if current.as_deref() == Some(name.as_str()) { "*" } else { " " };
        io::print_info(format!(" {} {}", marker, name));
    }
    Ok(())
}

fn cmd_save(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = match args.first() {
        Some(name) => {
            let path = context.manager.save_as(name)?;
            context.remember_club(Some(name))?;
            path
        }
        None => context.manager.save()?,
    };
    io::print_success(format!("Saved to {}.", path.display()));
    Ok(())
}

fn cmd_backup(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let note = (!args.is_empty()).then(|| args.join(" "));
    let path = context.manager.backup(note.as_deref())?;
    io::print_success(format!("Backup written to {}.", path.display()));
    Ok(())
}

fn cmd_backups(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let backups = context.manager.list_backups()?;
    output_section("Backups");
    if backups.is_empty() {
        io::print_info("No backups yet. Use `backup [note]` to create one.");
    }
    for (index, name) in backups.iter().enumerate() {
        io::print_info(format!("  {:>2}. {}", index + 1, name));
    }
    Ok(())
}

fn cmd_restore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let target = required(args, 0, "restore <backup file | index>")?;
    let backup = match target.parse::<usize>() {
        Ok(index) => context
            .manager
            .list_backups()?
            .into_iter()
            .nth(index.wrapping_sub(1))
            .ok_or_else(|| {
                CommandError::InvalidArguments(format!("no backup numbered {}", index))
            })?,
        Err(_) => target.to_string(),
    };
    if !context.confirm(&format!("Replace the open club with `{}`?", backup))? {
        io::print_info("Restore cancelled.");
        return Ok(());
    }
    let meta = context.manager.restore(&backup)?;
    context.report_load(&meta);
    io::print_success(format!("Restored `{}`.", backup));
    Ok(())
}

fn cmd_demo(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut roster = DemoRoster::default();
    if let Some(raw) = args.first() {
        roster.members = raw
            .parse()
            .map_err(|_| CommandError::InvalidArguments(format!("invalid member count `{}`", raw)))?;
    }
    if let Some(raw) = args.get(1) {
        roster.year = crate::cli::core::parse_year(raw)?;
    }
    if context.manager.storage().exists(DEMO_CLUB)
        && !context.confirm("Overwrite the existing `demo` club?")?
    {
        return Ok(());
    }
    roster.settings = context.config.default_fees;
    let book = roster.build("Demo Club")?;
    let members = book.members.len();
    context.manager.set_current(book, Some(DEMO_CLUB.to_string()));
    context.manager.save()?;
    context.remember_club(Some(DEMO_CLUB))?;
    context.year = roster.year;
    io::print_success(format!(
        "Demo club ready with {} members for {}.",
        members, roster.year
    ));
    Ok(())
}
