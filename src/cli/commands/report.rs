//! Club-wide reports and CSV export.

use std::path::Path;

use crate::cli::core::{required, CommandError, CommandResult, ShellContext};
use crate::cli::format::{format_amount, format_money, status_symbol, Alignment, Table};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::SummaryService;
use crate::domain::Month;
use crate::export;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "grid",
            "Dues grid for the working year (O paid, E exempt, . unpaid, - before join)",
            "grid",
            cmd_grid,
        ),
        CommandEntry::new(
            "totals",
            "Monthly income, unpaid total and operating budget",
            "totals",
            cmd_totals,
        ),
        CommandEntry::new(
            "unpaid",
            "Members with unpaid months, largest balance first",
            "unpaid",
            cmd_unpaid,
        ),
        CommandEntry::new(
            "export",
            "Write the dues grid or income report as CSV",
            "export <grid|income> <file.csv>",
            cmd_export,
        ),
    ]
}

fn cmd_grid(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let book = context.club()?;
    let year = context.year;
    output_section(format!("Dues {} ({})", year, book.name));
    let mut headers = vec![("name".to_string(), Alignment::Left)];
    headers.extend(Month::all().map(|month| (month.to_string(), Alignment::Right)));
    headers.push(("paid".to_string(), Alignment::Right));
    headers.push(("unpaid".to_string(), Alignment::Right));
    let mut table = Table::new(headers);
    for summary in SummaryService::roster_totals(book, year) {
        let mut row = vec![summary.member.name.clone()];
        row.extend(
            summary
                .totals
                .statuses
                .iter()
                .map(|status| status_symbol(*status).to_string()),
        );
        row.push(format_amount(summary.totals.paid));
        row.push(format_amount(summary.totals.unpaid));
        table.push(row);
    }
    if table.is_empty() {
        io::print_info("The roster is empty.");
    } else {
        io::print_info(table.render());
    }
    Ok(())
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let book = context.club()?;
    let currency = context.config.currency.as_str();
    let totals = SummaryService::club_totals(book, context.year);
    output_section(format!("Totals {} ({})", totals.year, book.name));
    let mut table = Table::new([("month", Alignment::Right), ("income", Alignment::Right)]);
    for month in Month::all() {
        table.push(vec![month.to_string(), format_amount(totals.income(month))]);
    }
    io::print_info(table.render());
    io::print_info(format!("Total income     : {}", format_money(totals.total_income, currency)));
    io::print_info(format!("Total unpaid     : {}", format_money(totals.total_unpaid, currency)));
    io::print_info(format!("Carry-over       : {}", format_money(totals.carry_over, currency)));
    io::print_info(format!(
        "Operating budget : {}",
        format_money(totals.operating_budget(), currency)
    ));
    Ok(())
}

fn cmd_unpaid(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let book = context.club()?;
    let owing = SummaryService::unpaid_members(book, context.year);
    output_section(format!("Unpaid {}", context.year));
    if owing.is_empty() {
        io::print_info("Everyone is settled.");
        return Ok(());
    }
    let mut table = Table::new([
        ("name", Alignment::Left),
        ("months", Alignment::Right),
        ("unpaid", Alignment::Right),
    ]);
    for summary in owing {
        table.push(vec![
            summary.member.name.clone(),
            summary.totals.unpaid_months().to_string(),
            format_amount(summary.totals.unpaid),
        ]);
    }
    io::print_info(table.render());
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "export <grid|income> <file.csv>";
    let kind = required(args, 0, usage)?;
    let path = Path::new(required(args, 1, usage)?);
    let book = context.club()?;
    match kind.to_ascii_lowercase().as_str() {
        "grid" => export::export_dues_grid(book, context.year, path)?,
        "income" => export::export_income_report(book, context.year, path)?,
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown report `{}`; usage: {}",
                other, usage
            )))
        }
    }
    io::print_success(format!("Exported {} to {}.", kind, path.display()));
    Ok(())
}
