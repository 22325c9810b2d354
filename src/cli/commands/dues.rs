//! Monthly dues: status, payments, exemptions and fee settings.

use crate::cli::core::{
    parse_amount, parse_month, parse_year, required, CommandResult, ShellContext,
};
use crate::cli::format::{format_money, status_symbol};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::{DuesService, SummaryService};
use crate::domain::Month;
use crate::ledger::{FeeSettings, MonthStatus};

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "year",
            "Show or set the working year",
            "year [YYYY]",
            cmd_year,
        ),
        CommandEntry::new(
            "status",
            "Show a member's months and totals for the working year",
            "status <member> [month]",
            cmd_status,
        ),
        CommandEntry::new(
            "pay",
            "Toggle a month's payment at the current fee",
            "pay <member> <month>",
            cmd_pay,
        ),
        CommandEntry::new(
            "exempt",
            "Toggle a month's exemption (drops any payment)",
            "exempt <member> <month>",
            cmd_exempt,
        ),
        CommandEntry::new(
            "pay-all",
            "Pay every owed, non-exempt month of the working year",
            "pay-all <member>",
            cmd_pay_all,
        ),
        CommandEntry::new(
            "fees",
            "Show or change fee settings",
            "fees [<regular> <associate> [carry-over]]",
            cmd_fees,
        ),
    ]
}

fn cmd_year(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(raw) = args.first() {
        context.year = parse_year(raw)?;
    }
    io::print_info(format!("Working year: {}", context.year));
    Ok(())
}

fn describe(status: MonthStatus, currency: &str) -> String {
    match status {
        MonthStatus::Paid(amount) => format!("paid {}", format_money(amount, currency)),
        other => other.label().to_string(),
    }
}

fn cmd_status(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "status <member> [month]";
    let id = context.member_id(required(args, 0, usage)?)?;
    let book = context.club()?;
    let year = context.year;
    let currency = context.config.currency.as_str();
    if let Some(raw) = args.get(1) {
        let month = parse_month(raw)?;
        let status = DuesService::month_status(book, &id, year, month)?;
        io::print_info(format!("{}-{:02}: {}", year, month, describe(status, currency)));
        return Ok(());
    }

    let member = book.require_member(&id)?;
    let totals = SummaryService::member_totals(book, &id, year)?;
    output_section(format!("{} ({}) {}", member.name, member.category, year));
    let cells: Vec<String> = Month::all()
        .map(|month| format!("{:>2}:{}", month.number(), status_symbol(totals.status(month))))
        .collect();
    io::print_info(cells.join(" "));
    io::print_info(format!(
        "Paid {} months, exempt {}, unpaid {}",
        totals.paid_months(),
        totals.exempt_months(),
        totals.unpaid_months()
    ));
    io::print_info(format!("Paid total : {}", format_money(totals.paid, currency)));
    io::print_info(format!("Unpaid     : {}", format_money(totals.unpaid, currency)));
    Ok(())
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "pay <member> <month>";
    let id = context.member_id(required(args, 0, usage)?)?;
    let month = parse_month(required(args, 1, usage)?)?;
    let year = context.year;
    let status = context.mutate(|book| DuesService::toggle_payment(book, &id, year, month))?;
    io::print_success(format!(
        "{} {}-{:02}: {}",
        id,
        year,
        month,
        describe(status, &context.config.currency)
    ));
    Ok(())
}

fn cmd_exempt(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "exempt <member> <month>";
    let id = context.member_id(required(args, 0, usage)?)?;
    let month = parse_month(required(args, 1, usage)?)?;
    let year = context.year;
    let status = context.mutate(|book| DuesService::toggle_exempt(book, &id, year, month))?;
    io::print_success(format!(
        "{} {}-{:02}: {}",
        id,
        year,
        month,
        describe(status, &context.config.currency)
    ));
    Ok(())
}

fn cmd_pay_all(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let id = context.member_id(required(args, 0, "pay-all <member>")?)?;
    let year = context.year;
    let paid = context.mutate(|book| DuesService::pay_all(book, &id, year))?;
    if paid.is_empty() {
        io::print_info(format!("{} owes nothing for {}.", id, year));
    } else {
        let months: Vec<String> = paid.iter().map(Month::to_string).collect();
        io::print_success(format!("{} paid months {} of {}.", id, months.join(","), year));
    }
    Ok(())
}

fn cmd_fees(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        let settings = context.club()?.settings;
        let currency = context.config.currency.as_str();
        output_section("Fees");
        io::print_info(format!("Regular    : {}", format_money(settings.regular_fee, currency)));
        io::print_info(format!("Associate  : {}", format_money(settings.associate_fee, currency)));
        io::print_info(format!("Carry-over : {}", format_money(settings.carry_over, currency)));
        return Ok(());
    }
    let usage = "fees [<regular> <associate> [carry-over]]";
    let regular = parse_amount(required(args, 0, usage)?)?;
    let associate = parse_amount(required(args, 1, usage)?)?;
    let carry_over = match args.get(2) {
        Some(raw) => parse_amount(raw)?,
        None => context.club()?.settings.carry_over,
    };
    let settings = FeeSettings::new(regular, associate, carry_over);
    context.mutate(|book| DuesService::update_fees(book, settings))?;
    io::print_success("Fee settings updated. Recorded payments keep their amounts.");
    Ok(())
}
