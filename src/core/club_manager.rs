use std::path::PathBuf;

use crate::core::services::{ServiceError, ServiceResult};
use crate::errors::LedgerError;
use crate::ledger::{ClubBook, FeeSettings};
use crate::storage::{LoadReport, StorageBackend};

/// Metadata describing the outcome of a load operation.
#[derive(Debug, Clone)]
pub struct LoadMetadata {
    pub warnings: Vec<String>,
    pub path: PathBuf,
    pub name: String,
    pub schema_version: u8,
}

/// Owns the open club and writes it back to storage after every mutation.
pub struct ClubManager {
    current: Option<ClubBook>,
    current_name: Option<String>,
    storage: Box<dyn StorageBackend>,
    autosave: bool,
}

impl ClubManager {
    pub fn new(storage: Box<dyn StorageBackend>) -> Self {
        Self {
            current: None,
            current_name: None,
            storage,
            autosave: true,
        }
    }

    pub fn with_autosave(mut self, autosave: bool) -> Self {
        self.autosave = autosave;
        self
    }

    pub fn storage(&self) -> &dyn StorageBackend {
        self.storage.as_ref()
    }

    /// Starts a new club under `name` and writes it immediately.
    pub fn create(
        &mut self,
        name: &str,
        display_name: &str,
        settings: FeeSettings,
    ) -> Result<PathBuf, LedgerError> {
        if self.storage.exists(name) {
            return Err(LedgerError::InvalidInput(format!(
                "club `{}` already exists",
                name
            )));
        }
        settings.validate()?;
        let book = ClubBook::with_settings(display_name, settings);
        self.current = Some(book);
        self.current_name = Some(name.to_string());
        let path = self.save()?;
        tracing::info!(club = name, "club created");
        Ok(path)
    }

    pub fn load(&mut self, name: &str) -> Result<LoadMetadata, LedgerError> {
        let report = self.storage.load(name)?;
        let metadata = self.apply_load(report);
        self.storage.record_last_club(Some(name))?;
        tracing::info!(
            club = name,
            warnings = metadata.warnings.len(),
            "club loaded"
        );
        Ok(metadata)
    }

    /// Reopens the club recorded as last used, if any.
    pub fn open_last(&mut self) -> Result<Option<LoadMetadata>, LedgerError> {
        match self.storage.last_club()? {
            Some(name) if self.storage.exists(&name) => self.load(&name).map(Some),
            _ => Ok(None),
        }
    }

    pub fn save(&mut self) -> Result<PathBuf, LedgerError> {
        let name = self
            .current_name
            .clone()
            .ok_or(LedgerError::ClubNotLoaded)?;
        self.save_as(&name)
    }

    pub fn save_as(&mut self, name: &str) -> Result<PathBuf, LedgerError> {
        let book = self.current.as_ref().ok_or(LedgerError::ClubNotLoaded)?;
        let path = self.storage.save(book, name)?;
        self.current_name = Some(name.to_string());
        self.storage.record_last_club(Some(name))?;
        Ok(path)
    }

    pub fn current(&self) -> Result<&ClubBook, LedgerError> {
        self.current.as_ref().ok_or(LedgerError::ClubNotLoaded)
    }

    pub fn current_name(&self) -> Option<&str> {
        self.current_name.as_deref()
    }

    pub fn is_loaded(&self) -> bool {
        self.current.is_some()
    }

    /// Runs a read-only query against the open club.
    pub fn with_current<T>(
        &self,
        f: impl FnOnce(&ClubBook) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        f(self.current()?)
    }

    /// Applies a mutation to a copy of the open club, persists the copy and
    /// only then adopts it. A failed mutation or a failed write leaves both
    /// memory and disk untouched.
    pub fn mutate<T>(
        &mut self,
        f: impl FnOnce(&mut ClubBook) -> ServiceResult<T>,
    ) -> ServiceResult<T> {
        let mut draft = self.current()?.clone();
        let value = f(&mut draft)?;
        if self.autosave {
            let name = self
                .current_name
                .as_deref()
                .ok_or(LedgerError::ClubNotLoaded)?;
            self.storage.save(&draft, name)?;
            self.storage.record_last_club(Some(name))?;
        }
        self.current = Some(draft);
        Ok(value)
    }

    pub fn backup(&self, note: Option<&str>) -> Result<PathBuf, LedgerError> {
        let name = self.current_name.as_deref().ok_or(LedgerError::ClubNotLoaded)?;
        self.storage.backup(self.current()?, name, note)
    }

    pub fn list_backups(&self) -> Result<Vec<String>, LedgerError> {
        let name = self.current_name.as_deref().ok_or(LedgerError::ClubNotLoaded)?;
        self.storage.list_backups(name)
    }

    pub fn restore(&mut self, backup_name: &str) -> Result<LoadMetadata, LedgerError> {
        let name = self
            .current_name
            .clone()
            .ok_or(LedgerError::ClubNotLoaded)?;
        let report = self.storage.restore(&name, backup_name)?;
        Ok(self.apply_load(report))
    }

    pub fn list_clubs(&self) -> Result<Vec<String>, LedgerError> {
        self.storage.list_clubs()
    }

    /// Installs a book that did not come from storage, e.g. demo data.
    pub fn set_current(&mut self, book: ClubBook, name: Option<String>) {
        self.current = Some(book);
        self.current_name = name;
    }

    pub fn clear(&mut self) {
        self.current = None;
        self.current_name = None;
    }

    fn apply_load(&mut self, report: LoadReport) -> LoadMetadata {
        let LoadReport {
            book,
            warnings,
            path,
            name,
        } = report;
        let schema_version = book.schema_version;
        self.current = Some(book);
        self.current_name = Some(name.clone());
        LoadMetadata {
            warnings,
            path,
            name,
            schema_version,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{DuesService, RosterService};
    use crate::domain::{Member, MemberCategory};
    use crate::ledger::MonthStatus;
    use crate::storage::JsonStorage;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::tempdir;

    fn manager(root: &std::path::Path) -> ClubManager {
        let store = JsonStorage::new(Some(root.to_path_buf()), Some(3)).unwrap();
        ClubManager::new(Box::new(store))
    }

    #[test]
    fn mutations_are_written_through() {
        let temp = tempdir().unwrap();
        let mut clubs = manager(temp.path());
        clubs
            .create("hillside", "Hillside Runners", FeeSettings::default())
            .unwrap();
        let id = clubs
            .mutate(|book| {
                RosterService::add(
                    book,
                    Member::new(
                        "Member 001",
                        MemberCategory::Regular,
                        NaiveDate::from_ymd_opt(2024, 2, 1).unwrap(),
                    ),
                )
            })
            .unwrap();
        clubs
            .mutate(|book| DuesService::toggle_payment(book, &id, 2025, 1))
            .unwrap();

        let mut reopened = manager(temp.path());
        let meta = reopened.open_last().unwrap().expect("last club recorded");
        assert_eq!(meta.name, "hillside");
        let status = reopened.current().unwrap().month_status(&id, 2025, 1).unwrap();
        assert_eq!(status, MonthStatus::Paid(30_000));
    }

    #[test]
    fn failed_mutation_leaves_book_untouched() {
        let temp = tempdir().unwrap();
        let mut clubs = manager(temp.path());
        clubs.create("quiet", "Quiet", FeeSettings::default()).unwrap();
        let before = clubs.current().unwrap().updated_at;
        let result: ServiceResult<()> = clubs.mutate(|book| {
            book.touch();
            Err(ServiceError::Invalid("nope".into()))
        });
        assert!(result.is_err());
        assert_eq!(clubs.current().unwrap().updated_at, before);
    }

    struct FailingStorage;

    impl StorageBackend for FailingStorage {
        fn save(&self, _book: &ClubBook, _name: &str) -> crate::storage::Result<PathBuf> {
            Err(LedgerError::Persistence("disk full".into()))
        }

        fn load(&self, name: &str) -> crate::storage::Result<LoadReport> {
            Err(LedgerError::Persistence(format!("no club '{name}'")))
        }

        fn exists(&self, _name: &str) -> bool {
            false
        }

        fn list_clubs(&self) -> crate::storage::Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn club_path(&self, name: &str) -> PathBuf {
            PathBuf::from(format!("{name}.json"))
        }

        fn backup(
            &self,
            _book: &ClubBook,
            _name: &str,
            _note: Option<&str>,
        ) -> crate::storage::Result<PathBuf> {
            Err(LedgerError::Persistence("disk full".into()))
        }

        fn list_backups(&self, _name: &str) -> crate::storage::Result<Vec<String>> {
            Ok(Vec::new())
        }

        fn restore(&self, name: &str, _backup_name: &str) -> crate::storage::Result<LoadReport> {
            self.load(name)
        }

        fn last_club(&self) -> crate::storage::Result<Option<String>> {
            Ok(None)
        }

        fn record_last_club(&self, _name: Option<&str>) -> crate::storage::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_save_keeps_previous_state_in_memory() {
        let mut book = ClubBook::new("Club");
        let id = book.add_member(Member::new(
            "Member 001",
            MemberCategory::Regular,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        ));
        let mut clubs = ClubManager::new(Box::new(FailingStorage));
        clubs.set_current(book, Some("club".into()));

        for _ in 0..2 {
            let err = clubs
                .mutate(|book| DuesService::toggle_payment(book, &id, 2025, 1))
                .unwrap_err();
            assert!(matches!(
                err,
                ServiceError::Ledger(LedgerError::Persistence(ref message)) if message == "disk full"
            ));
            let status = clubs.current().unwrap().month_status(&id, 2025, 1).unwrap();
            assert_eq!(status, MonthStatus::Unpaid);
        }
    }

    #[test]
    fn operations_without_club_report_not_loaded() {
        let temp = tempdir().unwrap();
        let mut clubs = manager(temp.path());
        assert!(matches!(clubs.save(), Err(LedgerError::ClubNotLoaded)));
        let err = clubs.mutate(|_| Ok(())).unwrap_err();
        assert!(matches!(err, ServiceError::Ledger(LedgerError::ClubNotLoaded)));
    }

    #[test]
    fn rejects_future_schema_versions() {
        let temp = tempdir().unwrap();
        let mut clubs = manager(temp.path());
        clubs.create("future", "Future", FeeSettings::default()).unwrap();
        let path = clubs.storage().club_path("future");
        let raw = fs::read_to_string(&path).unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        value["schema_version"] = serde_json::json!(99);
        fs::write(&path, value.to_string()).unwrap();

        clubs.clear();
        match clubs.load("future") {
            Err(LedgerError::Persistence(message)) => assert!(message.contains("newer")),
            other => panic!("expected persistence error, got {other:?}"),
        }
    }

    #[test]
    fn backup_names_carry_the_note() {
        let temp = tempdir().unwrap();
        let mut clubs = manager(temp.path());
        clubs.create("Spring Club", "Spring", FeeSettings::default()).unwrap();
        let path = clubs.backup(Some("Quarter Close")).unwrap();
        let file_name = path.file_name().and_then(|name| name.to_str()).unwrap();
        assert!(file_name.starts_with("spring_club_"));
        assert!(file_name.contains("quarter-close"));
        assert_eq!(clubs.list_backups().unwrap().len(), 1);
    }
}
