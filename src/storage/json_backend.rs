use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::LedgerError,
    ledger::ClubBook,
};

use super::{snapshot::ClubSnapshot, LoadReport, Result, StorageBackend};

const CLUB_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_RETENTION: usize = 5;

/// Stores each club as a pretty-printed JSON file, keeping timestamped
/// backups of previous versions.
#[derive(Clone)]
pub struct JsonStorage {
    root: PathBuf,
    clubs_dir: PathBuf,
    backups_dir: PathBuf,
    state_file: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let app_root = PathResolver::resolve_base(root);
        ensure_dir(&app_root)?;
        let clubs_dir = PathResolver::clubs_dir_in(&app_root);
        let backups_dir = PathResolver::backup_dir_in(&app_root);
        ensure_dir(&clubs_dir)?;
        ensure_dir(&backups_dir)?;
        let state_file = PathResolver::state_file_in(&app_root);
        Ok(Self {
            root: app_root,
            clubs_dir,
            backups_dir,
            state_file,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None, None)
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn retention(&self) -> usize {
        self.retention
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    fn read_state(&self) -> Result<StoreState> {
        if self.state_file.exists() {
            let data = fs::read_to_string(&self.state_file)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(StoreState::default())
        }
    }

    fn backup_file_name(name: &str, note: Option<&str>) -> String {
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut file_stem = format!("{}_{}", canonical_name(name), timestamp);
        if let Some(label) = sanitize_backup_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        format!("{}.{}", file_stem, CLUB_EXTENSION)
    }

    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let backup_path = dir.join(Self::backup_file_name(name, None));
        fs::copy(path, &backup_path)?;
        self.prune_backups(name)
    }

    fn prune_backups(&self, name: &str) -> Result<()> {
        let backups = self.list_backups(name)?;
        for entry in backups.iter().skip(self.retention) {
            let path = self.backup_path(name, entry);
            if let Err(err) = fs::remove_file(&path) {
                tracing::warn!(path = %path.display(), %err, "failed to prune backup");
            }
        }
        Ok(())
    }

    fn load_report(&self, name: &str, path: PathBuf) -> Result<LoadReport> {
        let (book, warnings) = load_book_from_path(&path)?;
        for warning in &warnings {
            tracing::warn!(club = name, "{}", warning);
        }
        Ok(LoadReport {
            book,
            warnings,
            path,
            name: name.to_string(),
        })
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, book: &ClubBook, name: &str) -> Result<PathBuf> {
        let path = self.club_path(name);
        self.backup_existing_file(name, &path)?;
        save_book_to_path(book, &path)?;
        tracing::debug!(club = name, path = %path.display(), "club saved");
        Ok(path)
    }

    fn load(&self, name: &str) -> Result<LoadReport> {
        let path = self.club_path(name);
        if !path.exists() {
            return Err(LedgerError::Persistence(format!("club `{}` not found", name)));
        }
        self.load_report(name, path)
    }

    fn exists(&self, name: &str) -> bool {
        self.club_path(name).exists()
    }

    fn list_clubs(&self) -> Result<Vec<String>> {
        let mut clubs = Vec::new();
        for entry in fs::read_dir(&self.clubs_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CLUB_EXTENSION) {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                clubs.push(stem.to_string());
            }
        }
        clubs.sort();
        Ok(clubs)
    }

    fn club_path(&self, name: &str) -> PathBuf {
        self.clubs_dir
            .join(format!("{}.{}", canonical_name(name), CLUB_EXTENSION))
    }

    fn backup(&self, book: &ClubBook, name: &str, note: Option<&str>) -> Result<PathBuf> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let path = dir.join(Self::backup_file_name(name, note));
        let json = serde_json::to_string_pretty(&ClubSnapshot::from_book(book))?;
        write_atomic(&path, &json)?;
        self.prune_backups(name)?;
        tracing::info!(club = name, path = %path.display(), "backup written");
        Ok(path)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(CLUB_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_timestamp(b)
                .cmp(&parse_backup_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<LoadReport> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(LedgerError::Persistence(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        // Validate and read before pruning can remove the source.
        load_book_from_path(&backup_path)?;
        let data = fs::read_to_string(&backup_path)?;
        let target = self.club_path(name);
        self.backup_existing_file(name, &target)?;
        write_atomic(&target, &data)?;
        tracing::info!(club = name, backup = backup_name, "backup restored");
        self.load_report(name, target)
    }

    fn last_club(&self) -> Result<Option<String>> {
        Ok(self.read_state()?.last_club)
    }

    fn record_last_club(&self, name: Option<&str>) -> Result<()> {
        let mut state = self.read_state()?;
        state.last_club = name.map(canonical_name);
        let data = serde_json::to_string_pretty(&state)?;
        write_atomic(&self.state_file, &data)?;
        Ok(())
    }
}

/// Writes a club snapshot through a temporary file and renames it into place.
pub fn save_book_to_path(book: &ClubBook, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let json = serde_json::to_string_pretty(&ClubSnapshot::from_book(book))?;
    write_atomic(path, &json)
}

/// Reads and validates a club snapshot. Unparseable content is reported as
/// `CorruptedRecord`, never handed to the ledger.
pub fn load_book_from_path(path: &Path) -> Result<(ClubBook, Vec<String>)> {
    let data = fs::read_to_string(path)?;
    let snapshot: ClubSnapshot = serde_json::from_str(&data).map_err(|err| {
        LedgerError::CorruptedRecord(format!("{}: {}", path.display(), err))
    })?;
    snapshot.into_book()
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    last_club: Option<String>,
}

pub(crate) fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "club".into()
    } else {
        sanitized
    }
}

pub(crate) fn sanitize_backup_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-').to_string();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

/// Extracts the `YYYYMMDD_HHMMSS` stamp that follows the club name.
fn parse_backup_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let stem = name.strip_suffix(&format!(".{}", CLUB_EXTENSION))?;
    let parts: Vec<&str> = stem.split('_').collect();
    parts.windows(2).rev().find_map(|pair| {
        let (date_part, time_part) = (pair[0], pair[1]);
        if !is_digits(date_part, 8) || !is_digits(time_part, 6) {
            return None;
        }
        NaiveDateTime::parse_from_str(&format!("{}{}", date_part, time_part), "%Y%m%d%H%M%S")
            .ok()
            .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
    })
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut file = File::create(&tmp)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    fs::rename(&tmp, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Member, MemberCategory};
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage =
            JsonStorage::new(Some(temp.path().to_path_buf()), Some(3)).expect("json storage");
        (storage, temp)
    }

    fn sample_book() -> ClubBook {
        let mut book = ClubBook::new("Sunrise Club");
        let join = NaiveDate::from_ymd_opt(2021, 4, 1).unwrap();
        let id = book.add_member(Member::new("Member 001", MemberCategory::Regular, join));
        book.toggle_payment(&id, 2025, 2).unwrap();
        book
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let book = sample_book();
        storage.save(&book, "sunrise").expect("save club");
        let loaded = storage.load("sunrise").expect("load club");
        assert_eq!(loaded.book.name, "Sunrise Club");
        assert_eq!(loaded.book.records, book.records);
        assert!(loaded.warnings.is_empty());
    }

    #[test]
    fn garbage_file_is_reported_as_corrupted() {
        let (storage, _guard) = storage_with_temp_dir();
        let path = storage.club_path("broken");
        fs::write(&path, "{ not json").unwrap();
        let err = storage.load("broken").unwrap_err();
        assert!(matches!(err, LedgerError::CorruptedRecord(_)), "{err}");
    }

    #[test]
    fn backups_are_pruned_to_retention() {
        let (storage, _guard) = storage_with_temp_dir();
        let book = sample_book();
        for note in ["first", "second", "third", "fourth"] {
            storage.backup(&book, "sunrise", Some(note)).unwrap();
        }
        assert_eq!(storage.list_backups("sunrise").unwrap().len(), 3);
    }

    #[test]
    fn canonical_names_are_filesystem_safe() {
        assert_eq!(canonical_name("Sunrise Club!"), "sunrise_club_");
        assert_eq!(canonical_name("   "), "club");
    }

    #[test]
    fn backup_timestamp_parses_with_note() {
        let parsed = parse_backup_timestamp("sunrise_20250102_030405_month-end.json");
        assert!(parsed.is_some());
        assert!(parse_backup_timestamp("sunrise.json").is_none());
    }
}
