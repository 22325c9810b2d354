use chrono::NaiveDate;

use crate::attendance::{intensity, AttendanceFilter, AttendanceStats, Intensity};
use crate::domain::MemberId;
use crate::ledger::ClubBook;

use super::ServiceResult;

pub struct AttendanceService;

impl AttendanceService {
    /// Flips a member's presence for a day. Returns `true` when now present.
    pub fn toggle(book: &mut ClubBook, member: &MemberId, date: NaiveDate) -> ServiceResult<bool> {
        let present = book.toggle_attendance(member, date)?;
        tracing::debug!(member = %member, %date, present, "attendance toggled");
        Ok(present)
    }

    pub fn count(book: &ClubBook, date: NaiveDate, filter: &AttendanceFilter) -> usize {
        book.attendance.count(date, filter)
    }

    pub fn intensity(book: &ClubBook, date: NaiveDate, filter: &AttendanceFilter) -> Intensity {
        intensity(Self::count(book, date, filter), filter)
    }

    pub fn stats(
        book: &ClubBook,
        year: i32,
        filter: &AttendanceFilter,
        today: NaiveDate,
    ) -> ServiceResult<AttendanceStats> {
        if let AttendanceFilter::Member(id) = filter {
            book.require_member(id)?;
        }
        Ok(book.attendance.year_stats(year, filter, today))
    }
}
