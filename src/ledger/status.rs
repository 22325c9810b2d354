use std::fmt;

/// Dues state of one member for one month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MonthStatus {
    /// The month precedes the member's join date.
    BeforeJoin,
    /// Paid, with the amount captured when the payment was recorded.
    Paid(i64),
    /// Dues waived for this month.
    Exempt,
    /// Owed and not yet paid.
    Unpaid,
}

impl MonthStatus {
    pub fn is_paid(&self) -> bool {
        matches!(self, MonthStatus::Paid(_))
    }

    pub fn paid_amount(&self) -> Option<i64> {
        match self {
            MonthStatus::Paid(amount) => Some(*amount),
            _ => None,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MonthStatus::BeforeJoin => "before-join",
            MonthStatus::Paid(_) => "paid",
            MonthStatus::Exempt => "exempt",
            MonthStatus::Unpaid => "unpaid",
        }
    }
}

impl fmt::Display for MonthStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MonthStatus::Paid(amount) => write!(f, "paid({})", amount),
            other => f.write_str(other.label()),
        }
    }
}
