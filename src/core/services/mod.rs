pub mod attendance_service;
pub mod dues_service;
pub mod roster_service;
pub mod summary_service;

pub use attendance_service::AttendanceService;
pub use dues_service::DuesService;
pub use roster_service::{MemberChanges, RosterService};
pub use summary_service::{MemberSummary, SummaryService};

use crate::errors::LedgerError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("{0}")]
    Invalid(String),
}
