use crate::domain::{Member, MemberId, Month};

use super::{
    eligibility::is_eligible, fees::FeeSettings, record::LedgerRecord, status::MonthStatus,
    store::RecordStore,
};

/// Classifies one month for a member.
///
/// A recorded payment always reports as `Paid`, even ahead of the join date,
/// so the captured amount stays visible wherever it is counted as income.
pub fn month_status(
    member: &Member,
    record: Option<&LedgerRecord>,
    year: i32,
    month: Month,
) -> MonthStatus {
    if let Some(amount) = record.and_then(|record| record.payment(month)) {
        return MonthStatus::Paid(amount);
    }
    if !is_eligible(member.join_date, year, month) {
        return MonthStatus::BeforeJoin;
    }
    if record.is_some_and(|record| record.is_exempt(month)) {
        MonthStatus::Exempt
    } else {
        MonthStatus::Unpaid
    }
}

/// Records the current fee for every owed month that is neither paid nor
/// exempt. Returns the months that were paid by this call.
pub fn pay_all(record: &mut LedgerRecord, member: &Member, settings: &FeeSettings) -> Vec<Month> {
    let fee = settings.fee_for(member.category);
    let year = record.year();
    let owed: Vec<Month> = Month::all()
        .filter(|month| {
            matches!(
                month_status(member, Some(record), year, *month),
                MonthStatus::Unpaid
            )
        })
        .collect();
    for month in &owed {
        record.record_payment(*month, fee);
    }
    owed
}

/// Per-member view of one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberTotals {
    pub member_id: MemberId,
    pub year: i32,
    pub fee: i64,
    pub statuses: [MonthStatus; Month::COUNT],
    pub paid: i64,
    pub unpaid: i64,
}

impl MemberTotals {
    pub fn status(&self, month: Month) -> MonthStatus {
        self.statuses[month.index()]
    }

    fn count(&self, predicate: impl Fn(&MonthStatus) -> bool) -> usize {
        self.statuses.iter().filter(|status| predicate(*status)).count()
    }

    pub fn paid_months(&self) -> usize {
        self.count(MonthStatus::is_paid)
    }

    pub fn unpaid_months(&self) -> usize {
        self.count(|status| matches!(status, MonthStatus::Unpaid))
    }

    pub fn exempt_months(&self) -> usize {
        self.count(|status| matches!(status, MonthStatus::Exempt))
    }

    pub fn before_join_months(&self) -> usize {
        self.count(|status| matches!(status, MonthStatus::BeforeJoin))
    }
}

pub fn member_totals(
    member: &Member,
    record: Option<&LedgerRecord>,
    settings: &FeeSettings,
    year: i32,
) -> MemberTotals {
    let fee = settings.fee_for(member.category);
    let mut statuses = [MonthStatus::Unpaid; Month::COUNT];
    for month in Month::all() {
        statuses[month.index()] = month_status(member, record, year, month);
    }
    let unpaid_count = statuses
        .iter()
        .filter(|status| matches!(status, MonthStatus::Unpaid))
        .count() as i64;
    MemberTotals {
        member_id: member.id.clone(),
        year,
        fee,
        statuses,
        paid: record.map(LedgerRecord::paid_total).unwrap_or(0),
        unpaid: unpaid_count.saturating_mul(fee),
    }
}

/// Club-wide aggregates for one year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClubTotals {
    pub year: i32,
    pub monthly_income: [i64; Month::COUNT],
    pub total_income: i64,
    pub total_unpaid: i64,
    pub carry_over: i64,
}

impl ClubTotals {
    pub fn income(&self, month: Month) -> i64 {
        self.monthly_income[month.index()]
    }

    /// Carry-over plus this year's dues income.
    pub fn operating_budget(&self) -> i64 {
        self.carry_over.saturating_add(self.total_income)
    }
}

pub fn club_totals(
    members: &[Member],
    records: &RecordStore,
    settings: &FeeSettings,
    year: i32,
) -> ClubTotals {
    let mut totals = ClubTotals {
        year,
        monthly_income: [0; Month::COUNT],
        total_income: 0,
        total_unpaid: 0,
        carry_over: settings.carry_over,
    };
    for member in members {
        let record = records.record(&member.id, year);
        if let Some(record) = record {
            for (month, amount) in record.payments() {
                let slot = &mut totals.monthly_income[month.index()];
                *slot = slot.saturating_add(amount);
                totals.total_income = totals.total_income.saturating_add(amount);
            }
        }
        let unpaid = member_totals(member, record, settings, year).unpaid;
        totals.total_unpaid = totals.total_unpaid.saturating_add(unpaid);
    }
    totals
}
