use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::attendance::AttendanceLog;
use crate::domain::{Identifiable, Member, MemberId, Month, NamedEntity};
use crate::errors::LedgerError;

use super::{
    fees::FeeSettings,
    status::MonthStatus,
    store::RecordStore,
    totals::{self, ClubTotals, MemberTotals},
};

pub const CURRENT_SCHEMA_VERSION: u8 = 1;

/// In-memory state of one club: roster, fee settings, dues records and
/// attendance. Persistence is handled outside, by a storage backend.
#[derive(Debug, Clone)]
pub struct ClubBook {
    pub id: Uuid,
    pub name: String,
    pub members: Vec<Member>,
    pub settings: FeeSettings,
    pub records: RecordStore,
    pub attendance: AttendanceLog,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub schema_version: u8,
}

impl ClubBook {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_settings(name, FeeSettings::default())
    }

    pub fn with_settings(name: impl Into<String>, settings: FeeSettings) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            members: Vec::new(),
            settings,
            records: RecordStore::new(),
            attendance: AttendanceLog::new(),
            created_at: now,
            updated_at: now,
            schema_version: CURRENT_SCHEMA_VERSION,
        }
    }

    pub fn add_member(&mut self, member: Member) -> MemberId {
        let id = member.id.clone();
        self.members.push(member);
        self.touch();
        id
    }

    pub fn member(&self, id: &MemberId) -> Option<&Member> {
        self.members.iter().find(|member| &member.id == id)
    }

    pub fn member_mut(&mut self, id: &MemberId) -> Option<&mut Member> {
        self.members.iter_mut().find(|member| &member.id == id)
    }

    pub fn require_member(&self, id: &MemberId) -> Result<&Member, LedgerError> {
        self.member(id)
            .ok_or_else(|| LedgerError::MemberNotFound(id.to_string()))
    }

    /// Removes a member together with their ledger records and attendance marks.
    pub fn remove_member(&mut self, id: &MemberId) -> Option<Member> {
        let index = self.members.iter().position(|member| &member.id == id)?;
        let member = self.members.remove(index);
        self.records.remove_member(id);
        self.attendance.remove_member(id);
        self.touch();
        Some(member)
    }

    pub fn month_status(
        &self,
        id: &MemberId,
        year: i32,
        month: u32,
    ) -> Result<MonthStatus, LedgerError> {
        let month = Month::new(month)?;
        let member = self.require_member(id)?;
        Ok(totals::month_status(
            member,
            self.records.record(id, year),
            year,
            month,
        ))
    }

    /// Flips the payment for a month, recording the current fee when paying.
    pub fn toggle_payment(
        &mut self,
        id: &MemberId,
        year: i32,
        month: u32,
    ) -> Result<MonthStatus, LedgerError> {
        let month = Month::new(month)?;
        let fee = self.settings.fee_for(self.require_member(id)?.category);
        self.records.record_mut(id, year).toggle_payment(month, fee);
        self.touch();
        self.month_status(id, year, month.number())
    }

    /// Flips the exemption for a month, dropping any payment recorded for it.
    pub fn toggle_exempt(
        &mut self,
        id: &MemberId,
        year: i32,
        month: u32,
    ) -> Result<MonthStatus, LedgerError> {
        let month = Month::new(month)?;
        self.require_member(id)?;
        self.records.record_mut(id, year).toggle_exempt(month);
        self.touch();
        self.month_status(id, year, month.number())
    }

    /// Pays every owed, non-exempt, unpaid month at the current fee.
    pub fn pay_all(&mut self, id: &MemberId, year: i32) -> Result<Vec<Month>, LedgerError> {
        let member = self
            .members
            .iter()
            .find(|member| &member.id == id)
            .ok_or_else(|| LedgerError::MemberNotFound(id.to_string()))?;
        let record = self.records.record(id, year);
        let owes_any = Month::all().any(|month| {
            totals::month_status(member, record, year, month) == MonthStatus::Unpaid
        });
        if !owes_any {
            return Ok(Vec::new());
        }
        let paid = totals::pay_all(self.records.record_mut(id, year), member, &self.settings);
        self.touch();
        Ok(paid)
    }

    pub fn member_totals(&self, id: &MemberId, year: i32) -> Result<MemberTotals, LedgerError> {
        let member = self.require_member(id)?;
        Ok(totals::member_totals(
            member,
            self.records.record(id, year),
            &self.settings,
            year,
        ))
    }

    pub fn club_totals(&self, year: i32) -> ClubTotals {
        totals::club_totals(&self.members, &self.records, &self.settings, year)
    }

    pub fn toggle_attendance(
        &mut self,
        id: &MemberId,
        date: NaiveDate,
    ) -> Result<bool, LedgerError> {
        self.require_member(id)?;
        let present = self.attendance.toggle(id, date);
        self.touch();
        Ok(present)
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

impl Identifiable for ClubBook {
    type Id = Uuid;

    fn id(&self) -> &Uuid {
        &self.id
    }
}

impl NamedEntity for ClubBook {
    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberCategory;

    fn book_with_member() -> (ClubBook, MemberId) {
        let mut book = ClubBook::new("Test Club");
        let join = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        let id = book.add_member(Member::new("Member 001", MemberCategory::Regular, join));
        (book, id)
    }

    #[test]
    fn invalid_month_is_rejected_without_side_effects() {
        let (mut book, id) = book_with_member();
        let err = book.toggle_payment(&id, 2025, 13).unwrap_err();
        assert!(matches!(err, LedgerError::InvalidMonth(13)));
        assert!(book.records.is_empty());
    }

    #[test]
    fn pay_all_with_nothing_owed_creates_no_record() {
        let mut book = ClubBook::new("Test Club");
        let join = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let id = book.add_member(Member::new("Member 002", MemberCategory::Regular, join));
        let before = book.updated_at;

        assert!(book.pay_all(&id, 2025).unwrap().is_empty());
        assert!(book.records.is_empty());
        assert_eq!(book.updated_at, before);

        assert_eq!(book.pay_all(&id, 2026).unwrap().len(), 10);
        assert_eq!(book.records.len(), 1);
    }

    #[test]
    fn unknown_member_is_reported() {
        let (mut book, _) = book_with_member();
        let err = book
            .toggle_exempt(&MemberId::new("ghost"), 2025, 1)
            .unwrap_err();
        assert!(matches!(err, LedgerError::MemberNotFound(_)));
    }

    #[test]
    fn removing_member_drops_records_and_attendance() {
        let (mut book, id) = book_with_member();
        book.toggle_payment(&id, 2025, 1).unwrap();
        book.toggle_attendance(&id, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap())
            .unwrap();
        assert!(book.remove_member(&id).is_some());
        assert!(book.records.is_empty());
        assert!(book.attendance.is_empty());
    }
}
