use std::collections::{BTreeMap, BTreeSet};

use crate::domain::Month;
use crate::errors::LedgerError;

use super::fees::MAX_AMOUNT;

/// Payments and exemptions of one member for one year.
///
/// A month is never both paid and exempt: recording a payment clears the
/// exemption and exempting a month clears its payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LedgerRecord {
    year: i32,
    payments: BTreeMap<Month, i64>,
    exempt_months: BTreeSet<Month>,
}

impl LedgerRecord {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            payments: BTreeMap::new(),
            exempt_months: BTreeSet::new(),
        }
    }

    /// Rebuilds a record from stored parts, rejecting overlapping months.
    pub fn from_parts(
        year: i32,
        payments: BTreeMap<Month, i64>,
        exempt_months: BTreeSet<Month>,
    ) -> Result<Self, LedgerError> {
        if let Some(month) = payments.keys().find(|month| exempt_months.contains(month)) {
            return Err(LedgerError::CorruptedRecord(format!(
                "month {} of {} is both paid and exempt",
                month, year
            )));
        }
        if let Some((month, amount)) = payments.iter().find(|(_, amount)| **amount < 0) {
            return Err(LedgerError::CorruptedRecord(format!(
                "negative payment {} for month {} of {}",
                amount, month, year
            )));
        }
        if let Some((month, amount)) = payments.iter().find(|(_, amount)| **amount > MAX_AMOUNT) {
            return Err(LedgerError::CorruptedRecord(format!(
                "payment {} for month {} of {} exceeds {}",
                amount, month, year, MAX_AMOUNT
            )));
        }
        Ok(Self {
            year,
            payments,
            exempt_months,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn payment(&self, month: Month) -> Option<i64> {
        self.payments.get(&month).copied()
    }

    pub fn is_exempt(&self, month: Month) -> bool {
        self.exempt_months.contains(&month)
    }

    pub fn payments(&self) -> impl Iterator<Item = (Month, i64)> + '_ {
        self.payments.iter().map(|(month, amount)| (*month, *amount))
    }

    pub fn exempt_months(&self) -> impl Iterator<Item = Month> + '_ {
        self.exempt_months.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.payments.is_empty() && self.exempt_months.is_empty()
    }

    pub fn paid_total(&self) -> i64 {
        self.payments
            .values()
            .fold(0i64, |total, amount| total.saturating_add(*amount))
    }

    /// Records a payment of `amount`, clearing any exemption for the month.
    pub fn record_payment(&mut self, month: Month, amount: i64) {
        self.exempt_months.remove(&month);
        self.payments.insert(month, amount);
    }

    pub fn clear_payment(&mut self, month: Month) -> Option<i64> {
        self.payments.remove(&month)
    }

    /// Flips the payment for `month`. Returns `true` when the month is now paid.
    pub fn toggle_payment(&mut self, month: Month, amount: i64) -> bool {
        if self.clear_payment(month).is_some() {
            false
        } else {
            self.record_payment(month, amount);
            true
        }
    }

    /// Flips the exemption for `month`, always dropping its payment.
    /// Returns `true` when the month is now exempt.
    pub fn toggle_exempt(&mut self, month: Month) -> bool {
        self.payments.remove(&month);
        if self.exempt_months.remove(&month) {
            false
        } else {
            self.exempt_months.insert(month);
            true
        }
    }
}
