//! CSV dues grid, monthly income report and roster import.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};

use crate::{
    domain::{Member, MemberCategory, Month},
    errors::LedgerError,
    ledger::{ClubBook, MonthStatus},
};

const ROSTER_DATE_FORMAT: &str = "%Y-%m-%d";

fn status_cell(status: MonthStatus) -> String {
    match status {
        MonthStatus::Paid(amount) => format!("paid:{}", amount),
        MonthStatus::Exempt => "exempt".into(),
        MonthStatus::Unpaid => "unpaid".into(),
        MonthStatus::BeforeJoin => "-".into(),
    }
}

/// One row per member with the twelve month cells and the year's totals,
/// then a row of monthly income.
pub fn write_dues_grid<W: Write>(book: &ClubBook, year: i32, out: W) -> Result<(), LedgerError> {
    let mut writer = WriterBuilder::new().from_writer(out);
    let mut header = vec!["name".to_string(), "category".to_string()];
    header.extend(Month::all().map(|month| month.number().to_string()));
    header.extend(["paid".to_string(), "unpaid".to_string()]);
    writer.write_record(&header)?;

    for member in &book.members {
        let totals = crate::ledger::member_totals(
            member,
            book.records.record(&member.id, year),
            &book.settings,
            year,
        );
        let mut row = vec![member.name.clone(), member.category.label().to_string()];
        row.extend(totals.statuses.iter().copied().map(status_cell));
        row.extend([totals.paid.to_string(), totals.unpaid.to_string()]);
        writer.write_record(&row)?;
    }

    let club = book.club_totals(year);
    let mut footer = vec!["total".to_string(), String::new()];
    footer.extend(club.monthly_income.iter().map(i64::to_string));
    footer.extend([club.total_income.to_string(), club.total_unpaid.to_string()]);
    writer.write_record(&footer)?;
    writer.flush()?;
    Ok(())
}

/// `month,income` rows followed by total, carry-over and operating budget.
pub fn write_income_report<W: Write>(
    book: &ClubBook,
    year: i32,
    out: W,
) -> Result<(), LedgerError> {
    let totals = book.club_totals(year);
    let mut writer = WriterBuilder::new().from_writer(out);
    writer.write_record(["month", "income"])?;
    for month in Month::all() {
        writer.write_record([month.number().to_string(), totals.income(month).to_string()])?;
    }
    writer.write_record(["total".to_string(), totals.total_income.to_string()])?;
    writer.write_record(["carry_over".to_string(), totals.carry_over.to_string()])?;
    writer.write_record([
        "operating_budget".to_string(),
        totals.operating_budget().to_string(),
    ])?;
    writer.flush()?;
    Ok(())
}

pub fn export_dues_grid(book: &ClubBook, year: i32, path: &Path) -> Result<(), LedgerError> {
    write_dues_grid(book, year, File::create(path)?)?;
    tracing::info!(path = %path.display(), year, "dues grid exported");
    Ok(())
}

pub fn export_income_report(book: &ClubBook, year: i32, path: &Path) -> Result<(), LedgerError> {
    write_income_report(book, year, File::create(path)?)?;
    tracing::info!(path = %path.display(), year, "income report exported");
    Ok(())
}

/// Parses `name,category,join_date[,phone,notes]` rows into new members.
/// Errors name the offending line (the header is line 1).
pub fn read_roster<R: Read>(input: R) -> Result<Vec<Member>, LedgerError> {
    let mut reader = ReaderBuilder::new()
        .trim(Trim::All)
        .flexible(true)
        .from_reader(input);
    let headers = reader.headers()?.clone();
    let column = |name: &str| headers.iter().position(|header| header.eq_ignore_ascii_case(name));
    let (Some(name_col), Some(category_col), Some(date_col)) =
        (column("name"), column("category"), column("join_date"))
    else {
        return Err(LedgerError::InvalidInput(
            "roster header must contain name, category and join_date".into(),
        ));
    };
    let phone_col = column("phone");
    let notes_col = column("notes");

    let mut members = Vec::new();
    for (index, row) in reader.records().enumerate() {
        let row = row?;
        let line = row.position().map_or(index as u64 + 2, |pos| pos.line());
        if row.iter().all(str::is_empty) {
            continue;
        }
        let field = |col: usize| row.get(col).unwrap_or("");
        let name = field(name_col);
        if name.is_empty() {
            return Err(LedgerError::InvalidInput(format!("line {}: missing name", line)));
        }
        let category: MemberCategory = field(category_col)
            .parse()
            .map_err(|err| LedgerError::InvalidInput(format!("line {}: {}", line, err)))?;
        let join_date = NaiveDate::parse_from_str(field(date_col), ROSTER_DATE_FORMAT)
            .map_err(|_| {
                LedgerError::InvalidInput(format!(
                    "line {}: join date `{}` is not YYYY-MM-DD",
                    line,
                    field(date_col)
                ))
            })?;
        let mut member = Member::new(name, category, join_date);
        if let Some(phone) = optional(&row, phone_col) {
            member = member.with_phone(phone);
        }
        if let Some(notes) = optional(&row, notes_col) {
            member = member.with_notes(notes);
        }
        members.push(member);
    }
    Ok(members)
}

pub fn import_roster(path: &Path) -> Result<Vec<Member>, LedgerError> {
    let members = read_roster(File::open(path)?)?;
    tracing::info!(path = %path.display(), count = members.len(), "roster parsed");
    Ok(members)
}

fn optional(row: &StringRecord, col: Option<usize>) -> Option<&str> {
    col.and_then(|col| row.get(col)).filter(|value| !value.is_empty())
}
