//! Roster commands.

use std::path::Path;

use crate::cli::core::{parse_date, required, CommandError, CommandResult, ShellContext};
use crate::cli::format::{Alignment, Table};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::{MemberChanges, RosterService};
use crate::domain::{Displayable, Member, MemberCategory};
use crate::export;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("members", "List the roster", "members", cmd_members),
        CommandEntry::new(
            "add-member",
            "Add a member to the roster",
            "add-member <name> <regular|associate> <join YYYY-MM-DD> [phone] [notes]",
            cmd_add_member,
        ),
        CommandEntry::new(
            "edit-member",
            "Change one field of a member",
            "edit-member <member> <name|category|joined|phone|notes> <value>",
            cmd_edit_member,
        ),
        CommandEntry::new(
            "remove-member",
            "Remove a member with their dues and attendance",
            "remove-member <member>",
            cmd_remove_member,
        ),
        CommandEntry::new(
            "import-members",
            "Add members from a CSV file (name,category,join_date[,phone,notes])",
            "import-members <file.csv>",
            cmd_import_members,
        ),
    ]
}

fn cmd_members(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let book = context.club()?;
    output_section(format!("Members of {}", book.name));
    let mut table = Table::new([
        ("id", Alignment::Left),
        ("name", Alignment::Left),
        ("category", Alignment::Left),
        ("joined", Alignment::Left),
        ("phone", Alignment::Left),
    ]);
    for member in RosterService::list(book) {
        table.push(vec![
            member.id.to_string(),
            member.name.clone(),
            member.category.label().to_string(),
            member.join_date.to_string(),
            member.phone.clone().unwrap_or_default(),
        ]);
    }
    if table.is_empty() {
        io::print_info("The roster is empty. Use `add-member` or `import-members`.");
    } else {
        io::print_info(table.render());
    }
    Ok(())
}

fn cmd_add_member(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "add-member <name> <regular|associate> <join YYYY-MM-DD> [phone] [notes]";
    let name = required(args, 0, usage)?;
    let category: MemberCategory = required(args, 1, usage)?.parse()?;
    let join_date = parse_date(required(args, 2, usage)?)?;
    let mut member = Member::new(name.trim(), category, join_date);
    if let Some(phone) = args.get(3) {
        member = member.with_phone(*phone);
    }
    if args.len() > 4 {
        member = member.with_notes(args[4..].join(" "));
    }
    let id = context.mutate(|book| RosterService::add(book, member))?;
    io::print_success(format!("Added `{}` as {}.", name.trim(), id));
    Ok(())
}

fn cmd_edit_member(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "edit-member <member> <name|category|joined|phone|notes> <value>";
    let id = context.member_id(required(args, 0, usage)?)?;
    let field = required(args, 1, usage)?.to_ascii_lowercase();
    let value = args.get(2..).map(|rest| rest.join(" ")).unwrap_or_default();
    let mut changes = MemberChanges::default();
    match field.as_str() {
        "name" => changes.name = Some(value),
        "category" => changes.category = Some(value.parse()?),
        "joined" | "join_date" => changes.join_date = Some(parse_date(&value)?),
        "phone" => changes.phone = Some(value),
        "notes" => changes.notes = Some(value),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown field `{}`; usage: {}",
                other, usage
            )))
        }
    }
    context.mutate(|book| RosterService::edit(book, &id, changes))?;
    io::print_success(format!("Updated {} of {}.", field, id));
    Ok(())
}

fn cmd_remove_member(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.member_id(required(args, 0, "remove-member <member>")?)?;
    let label = context.club()?.require_member(&id)?.display_label();
    if !context.confirm(&format!("Remove {} and all of their records?", label))? {
        io::print_info("Nothing removed.");
        return Ok(());
    }
    let removed = context.mutate(|book| RosterService::remove(book, &id))?;
    io::print_success(format!("Removed `{}`.", removed.name));
    Ok(())
}

fn cmd_import_members(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let path = required(args, 0, "import-members <file.csv>")?;
    let members = export::import_roster(Path::new(path))?;
    let count = members.len();
    context.mutate(|book| {
        for member in members {
            RosterService::add(book, member)?;
        }
        Ok(())
    })?;
    io::print_success(format!("Imported {} members.", count));
    Ok(())
}
