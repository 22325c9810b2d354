//! Aggregations used by reports and the shell.

use crate::domain::{Member, MemberId};
use crate::ledger::{ClubBook, ClubTotals, MemberTotals};

use super::ServiceResult;

/// A roster entry paired with its totals for one year.
#[derive(Debug, Clone)]
pub struct MemberSummary<'a> {
    pub member: &'a Member,
    pub totals: MemberTotals,
}

pub struct SummaryService;

impl SummaryService {
    pub fn member_totals(
        book: &ClubBook,
        member: &MemberId,
        year: i32,
    ) -> ServiceResult<MemberTotals> {
        Ok(book.member_totals(member, year)?)
    }

    pub fn club_totals(book: &ClubBook, year: i32) -> ClubTotals {
        book.club_totals(year)
    }

    /// Totals for every member in roster order.
    pub fn roster_totals(book: &ClubBook, year: i32) -> Vec<MemberSummary<'_>> {
        book.members
            .iter()
            .map(|member| MemberSummary {
                member,
                totals: crate::ledger::member_totals(
                    member,
                    book.records.record(&member.id, year),
                    &book.settings,
                    year,
                ),
            })
            .collect()
    }

    /// Members with at least one unpaid month, largest balance first.
    pub fn unpaid_members(book: &ClubBook, year: i32) -> Vec<MemberSummary<'_>> {
        let mut owing: Vec<MemberSummary<'_>> = Self::roster_totals(book, year)
            .into_iter()
            .filter(|summary| summary.totals.unpaid > 0)
            .collect();
        owing.sort_by(|a, b| {
            b.totals
                .unpaid
                .cmp(&a.totals.unpaid)
                .then_with(|| a.member.name.cmp(&b.member.name))
        });
        owing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberCategory;
    use chrono::NaiveDate;

    #[test]
    fn unpaid_members_are_sorted_by_balance() {
        let mut book = ClubBook::new("Summary");
        let early = book.add_member(Member::new(
            "Early",
            MemberCategory::Regular,
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
        ));
        book.add_member(Member::new(
            "Late",
            MemberCategory::Regular,
            NaiveDate::from_ymd_opt(2025, 10, 1).unwrap(),
        ));
        let settled = book.add_member(Member::new(
            "Settled",
            MemberCategory::Regular,
            NaiveDate::from_ymd_opt(2025, 12, 1).unwrap(),
        ));
        book.pay_all(&settled, 2025).unwrap();

        let owing = SummaryService::unpaid_members(&book, 2025);
        let names: Vec<&str> = owing.iter().map(|s| s.member.name.as_str()).collect();
        assert_eq!(names, vec!["Early", "Late"]);
        assert_eq!(owing[0].member.id, early);
        assert_eq!(owing[0].totals.unpaid, 12 * 30_000);
        assert_eq!(SummaryService::club_totals(&book, 2025).total_income, 30_000);
    }
}
