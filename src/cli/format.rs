//! Number formatting and plain-text tables for shell output.

use crate::ledger::MonthStatus;

/// Formats an integer amount with `,` thousands grouping.
pub fn format_amount(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (count, ch) in digits.chars().enumerate() {
        if count != 0 && (digits.len() - count) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    if amount < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

pub fn format_money(amount: i64, currency: &str) -> String {
    format!("{} {}", format_amount(amount), currency)
}

/// Single-character grid cell for a month.
pub fn status_symbol(status: MonthStatus) -> &'static str {
    match status {
        MonthStatus::Paid(_) => "O",
        MonthStatus::Exempt => "E",
        MonthStatus::Unpaid => ".",
        MonthStatus::BeforeJoin => "-",
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Right,
}

/// Column-aligned text table.
pub struct Table {
    headers: Vec<(String, Alignment)>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new<I, S>(headers: I) -> Self
    where
        I: IntoIterator<Item = (S, Alignment)>,
        S: Into<String>,
    {
        Self {
            headers: headers
                .into_iter()
                .map(|(header, align)| (header.into(), align))
                .collect(),
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: Vec<String>) {
        self.rows.push(row);
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    fn widths(&self) -> Vec<usize> {
        self.headers
            .iter()
            .enumerate()
            .map(|(idx, (header, _))| {
                self.rows
                    .iter()
                    .filter_map(|row| row.get(idx))
                    .map(|cell| cell.chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect()
    }

    fn render_row(&self, cells: &[String], widths: &[usize]) -> String {
        self.headers
            .iter()
            .zip(widths)
            .enumerate()
            .map(|(idx, ((_, align), width))| {
                let cell = cells.get(idx).map(String::as_str).unwrap_or("");
                match align {
                    Alignment::Left => format!("{:<width$}", cell, width = *width),
                    Alignment::Right => format!("{:>width$}", cell, width = *width),
                }
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    }

    pub fn render(&self) -> String {
        let widths = self.widths();
        let header: Vec<String> = self.headers.iter().map(|(h, _)| h.clone()).collect();
        let mut lines = vec![self.render_row(&header, &widths)];
        let rule_width = widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1);
        lines.push("-".repeat(rule_width));
        lines.extend(self.rows.iter().map(|row| self.render_row(row, &widths)));
        lines.join("\n")
    }
}
