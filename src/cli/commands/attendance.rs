//! Attendance marks and streak statistics.

use chrono::Datelike;

use crate::attendance::{AttendanceFilter, Intensity};
use crate::cli::core::{parse_date, parse_year, required, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::output::section as output_section;
use crate::cli::registry::CommandEntry;
use crate::core::services::AttendanceService;

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "attend",
            "Toggle a member's attendance for a day (default today)",
            "attend <member> [YYYY-MM-DD]",
            cmd_attend,
        ),
        CommandEntry::new(
            "attendance",
            "Attendance statistics for the club or one member",
            "attendance [member|all] [YYYY]",
            cmd_attendance,
        ),
    ]
}

fn cmd_attend(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let usage = "attend <member> [YYYY-MM-DD]";
    let id = context.member_id(required(args, 0, usage)?)?;
    let date = match args.get(1) {
        Some(raw) => parse_date(raw)?,
        None => context.today(),
    };
    let present = context.mutate(|book| AttendanceService::toggle(book, &id, date))?;
    let verb = if present { "present" } else { "not present" };
    io::print_success(format!("{} marked {} on {}.", id, verb, date));
    Ok(())
}

fn cmd_attendance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = match args.first() {
        None => AttendanceFilter::All,
        Some(key) if key.eq_ignore_ascii_case("all") => AttendanceFilter::All,
        Some(key) => AttendanceFilter::Member(context.member_id(key)?),
    };
    let year = match args.get(1) {
        Some(raw) => parse_year(raw)?,
        None => context.year,
    };
    let today = context.today();
    let book = context.club()?;
    let stats = AttendanceService::stats(book, year, &filter, today)?;
    let scope = match &filter {
        AttendanceFilter::All => "club".to_string(),
        AttendanceFilter::Member(id) => id.to_string(),
    };
    output_section(format!("Attendance {} ({})", year, scope));
    io::print_info(format!("Days attended  : {}", stats.total_days));
    io::print_info(format!("Longest streak : {}", stats.longest_streak));
    io::print_info(format!("Current streak : {}", stats.current_streak));

    let mut per_month = [0usize; 12];
    for (day, count) in book.attendance.daily_counts(year, &filter) {
        if count > 0 {
            per_month[day.month0() as usize] += 1;
        }
    }
    let line: Vec<String> = per_month
        .iter()
        .enumerate()
        .map(|(idx, days)| format!("{}:{}", idx + 1, days))
        .collect();
    io::print_info(format!("Days per month : {}", line.join(" ")));

    let week: Vec<&str> = (0..7)
        .rev()
        .filter_map(|offset| today.checked_sub_days(chrono::Days::new(offset)))
        .map(|day| intensity_symbol(AttendanceService::intensity(book, day, &filter)))
        .collect();
    io::print_info(format!("Last 7 days    : {}", week.join(" ")));
    Ok(())
}

fn intensity_symbol(intensity: Intensity) -> &'static str {
    match intensity {
        Intensity::None => ".",
        Intensity::Low => "-",
        Intensity::Medium => "o",
        Intensity::High => "O",
        Intensity::Full => "#",
    }
}
