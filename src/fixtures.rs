//! Deterministic demo data: synthetic members, dues and attendance.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::domain::{Member, MemberCategory, Month};
use crate::errors::LedgerError;
use crate::ledger::{ClubBook, FeeSettings};

/// Builds a synthetic club. The same parameters always produce the same book.
#[derive(Debug, Clone)]
pub struct DemoRoster {
    pub members: usize,
    pub year: i32,
    /// Last month that regular payers have settled.
    pub paid_through: u32,
    /// Every n-th member joins during `year` instead of before it. Zero disables.
    pub new_joiner_every: usize,
    pub settings: FeeSettings,
    pub with_attendance: bool,
}

impl Default for DemoRoster {
    fn default() -> Self {
        Self {
            members: 24,
            year: 2025,
            paid_through: 9,
            new_joiner_every: 5,
            settings: FeeSettings::default(),
            with_attendance: true,
        }
    }
}

impl DemoRoster {
    pub fn new(members: usize, year: i32) -> Self {
        Self {
            members,
            year,
            ..Self::default()
        }
    }

    pub fn build(&self, name: &str) -> Result<ClubBook, LedgerError> {
        self.settings.validate()?;
        let paid_through = Month::new(self.paid_through)?;
        let mut book = ClubBook::with_settings(name, self.settings);
        for ordinal in 1..=self.members {
            let member = self.member(ordinal)?;
            let id = book.add_member(member.clone());
            let fee = self.settings.fee_for(member.category);
            let record = book.records.record_mut(&id, self.year);

            if self.joins_mid_year(ordinal) {
                // Joining month plus the two following are free.
                let join = member.join_date.month();
                for month in Month::all().filter(|m| (join..join + 3).contains(&m.number())) {
                    record.toggle_exempt(month);
                }
                for month in Month::all()
                    .filter(|m| m.number() >= join + 3 && *m <= paid_through)
                {
                    record.record_payment(month, fee);
                }
            } else if ordinal % 7 == 0 {
                // Annual payer.
                for month in Month::all() {
                    record.record_payment(month, fee);
                }
            } else {
                let settled = paid_through.number().saturating_sub((ordinal % 4) as u32);
                for month in Month::all().filter(|m| m.number() <= settled) {
                    record.record_payment(month, fee);
                }
            }
        }
        if self.with_attendance {
            self.seed_attendance(&mut book, paid_through)?;
        }
        tracing::debug!(members = self.members, year = self.year, "demo club generated");
        Ok(book)
    }

    fn joins_mid_year(&self, ordinal: usize) -> bool {
        self.new_joiner_every > 0 && ordinal % self.new_joiner_every == 0
    }

    fn member(&self, ordinal: usize) -> Result<Member, LedgerError> {
        let category = if ordinal % 6 == 0 {
            MemberCategory::Associate
        } else {
            MemberCategory::Regular
        };
        let join_date = if self.joins_mid_year(ordinal) {
            let month = 2 + (ordinal % 9) as u32;
            let day = 1 + (ordinal % 28) as u32;
            NaiveDate::from_ymd_opt(self.year, month, day)
        } else {
            NaiveDate::from_ymd_opt(self.year - 5, 1, 1)
        }
        .ok_or_else(|| LedgerError::InvalidInput(format!("year {} out of range", self.year)))?;
        Ok(Member::new(format!("Member {:03}", ordinal), category, join_date)
            .with_id(format!("M{:03}", ordinal)))
    }

    /// Weekday sessions up to the end of the settled period; each member shows
    /// up on a fixed rotation.
    fn seed_attendance(&self, book: &mut ClubBook, until: Month) -> Result<(), LedgerError> {
        let start = NaiveDate::from_ymd_opt(self.year, 1, 1)
            .ok_or_else(|| LedgerError::InvalidInput(format!("year {} out of range", self.year)))?;
        let ids: Vec<_> = book
            .members
            .iter()
            .map(|member| (member.id.clone(), member.join_date))
            .collect();
        for day in start
            .iter_days()
            .take_while(|day| day.year() == self.year && day.month() <= until.number())
            .filter(|day| !matches!(day.weekday(), Weekday::Sat | Weekday::Sun))
        {
            for (offset, (id, joined)) in ids.iter().enumerate() {
                if day >= *joined && (day.ordinal() as usize + offset) % 3 == 0 {
                    book.attendance.mark(id.clone(), day);
                }
            }
        }
        Ok(())
    }
}
