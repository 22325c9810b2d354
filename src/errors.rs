use thiserror::Error;

/// Error type that captures ledger, roster and persistence failures.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("invalid month {0} (expected 1-12)")]
    InvalidMonth(u32),
    #[error("corrupted record: {0}")]
    CorruptedRecord(String),
    #[error("member not found: {0}")]
    MemberNotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("no club loaded")]
    ClubNotLoaded,
    #[error("persistence error: {0}")]
    Persistence(String),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        LedgerError::Persistence(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Persistence(err.to_string())
    }
}

impl From<csv::Error> for LedgerError {
    fn from(err: csv::Error) -> Self {
        LedgerError::Persistence(err.to_string())
    }
}
