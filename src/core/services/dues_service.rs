use crate::domain::{MemberId, Month};
use crate::ledger::{ClubBook, FeeSettings, MonthStatus};

use super::ServiceResult;

/// Dues mutations and lookups for a single member and year.
pub struct DuesService;

impl DuesService {
    pub fn month_status(
        book: &ClubBook,
        member: &MemberId,
        year: i32,
        month: u32,
    ) -> ServiceResult<MonthStatus> {
        Ok(book.month_status(member, year, month)?)
    }

    pub fn toggle_payment(
        book: &mut ClubBook,
        member: &MemberId,
        year: i32,
        month: u32,
    ) -> ServiceResult<MonthStatus> {
        let status = book.toggle_payment(member, year, month)?;
        tracing::debug!(member = %member, year, month, status = %status, "payment toggled");
        Ok(status)
    }

    pub fn toggle_exempt(
        book: &mut ClubBook,
        member: &MemberId,
        year: i32,
        month: u32,
    ) -> ServiceResult<MonthStatus> {
        let status = book.toggle_exempt(member, year, month)?;
        tracing::debug!(member = %member, year, month, status = %status, "exemption toggled");
        Ok(status)
    }

    pub fn pay_all(book: &mut ClubBook, member: &MemberId, year: i32) -> ServiceResult<Vec<Month>> {
        let paid = book.pay_all(member, year)?;
        tracing::debug!(member = %member, year, months = paid.len(), "pay-all applied");
        Ok(paid)
    }

    /// Replaces the fee settings. Payments already recorded keep their amounts.
    pub fn update_fees(book: &mut ClubBook, settings: FeeSettings) -> ServiceResult<()> {
        settings.validate()?;
        book.settings = settings;
        book.touch();
        tracing::debug!(
            regular = settings.regular_fee,
            associate = settings.associate_fee,
            carry_over = settings.carry_over,
            "fee settings updated"
        );
        Ok(())
    }
}
