use std::fmt;

use crate::errors::LedgerError;

/// Calendar month number, always within `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Month(u8);

impl Month {
    pub const COUNT: usize = 12;

    /// Validates a raw month number.
    pub fn new(value: u32) -> Result<Self, LedgerError> {
        if (1..=12).contains(&value) {
            Ok(Self(value as u8))
        } else {
            Err(LedgerError::InvalidMonth(value))
        }
    }

    /// All twelve months in calendar order.
    pub fn all() -> impl Iterator<Item = Month> {
        (1..=12u8).map(Month)
    }

    pub fn number(self) -> u32 {
        u32::from(self.0)
    }

    /// Zero-based position, handy for `[T; 12]` series.
    pub fn index(self) -> usize {
        usize::from(self.0 - 1)
    }
}

impl TryFrom<u32> for Month {
    type Error = LedgerError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Month::new(value)
    }
}

impl From<Month> for u32 {
    fn from(month: Month) -> Self {
        month.number()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
