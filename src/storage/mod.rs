pub mod json_backend;
pub mod snapshot;

use std::path::PathBuf;

use crate::{errors::LedgerError, ledger::ClubBook};

pub type Result<T> = std::result::Result<T, LedgerError>;

/// Outcome of loading a club from storage.
#[derive(Debug, Clone)]
pub struct LoadReport {
    pub book: ClubBook,
    pub warnings: Vec<String>,
    pub path: PathBuf,
    pub name: String,
}

/// Abstraction over persistence backends capable of storing clubs and backups.
pub trait StorageBackend: Send + Sync {
    fn save(&self, book: &ClubBook, name: &str) -> Result<PathBuf>;
    fn load(&self, name: &str) -> Result<LoadReport>;
    fn exists(&self, name: &str) -> bool;
    fn list_clubs(&self) -> Result<Vec<String>>;
    fn club_path(&self, name: &str) -> PathBuf;
    fn backup(&self, book: &ClubBook, name: &str, note: Option<&str>) -> Result<PathBuf>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<LoadReport>;
    fn last_club(&self) -> Result<Option<String>>;
    fn record_last_club(&self, name: Option<&str>) -> Result<()>;
}

pub use json_backend::{load_book_from_path, save_book_to_path, JsonStorage};
pub use snapshot::{ClubSnapshot, StoredAttendance, StoredRecord};
