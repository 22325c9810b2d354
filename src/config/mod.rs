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
    ledger::FeeSettings,
};

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M";
const TMP_SUFFIX: &str = "tmp";
const DEFAULT_BACKUP_RETENTION: usize = 5;

/// User preferences shared by every club.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub locale: String,
    pub currency: String,
    /// Fee settings applied to newly created clubs.
    #[serde(default)]
    pub default_fees: FeeSettings,
    #[serde(default = "default_backup_retention")]
    pub backup_retention: usize,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub last_opened_club: Option<String>,
}

fn default_backup_retention() -> usize {
    DEFAULT_BACKUP_RETENTION
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: "ko-KR".into(),
            currency: "KRW".into(),
            default_fees: FeeSettings::default(),
            backup_retention: DEFAULT_BACKUP_RETENTION,
            last_opened_club: None,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
    backups_dir: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, LedgerError> {
        Self::with_base_dir(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, LedgerError> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        let backups_dir = PathResolver::config_backup_dir_in(&base);
        ensure_dir(&backups_dir)?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
            backups_dir,
        })
    }

    /// Reads the stored configuration, falling back to defaults when absent.
    pub fn load(&self) -> Result<Config, LedgerError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            let config: Config = serde_json::from_str(&data)?;
            config.default_fees.validate()?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), LedgerError> {
        config.default_fees.validate()?;
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "configuration saved");
        Ok(())
    }

    pub fn backup(&self, config: &Config, note: Option<&str>) -> Result<String, LedgerError> {
        ensure_dir(&self.backups_dir)?;
        let timestamp = Utc::now().format(BACKUP_TIMESTAMP_FORMAT).to_string();
        let mut name = format!("config_{}", timestamp);
        if let Some(label) = crate::storage::json_backend::sanitize_backup_note(note) {
            name.push('_');
            name.push_str(&label);
        }
        name.push_str(&format!(".{}", BACKUP_EXTENSION));
        let json = serde_json::to_string_pretty(config)?;
        write_file(&self.backups_dir.join(&name), &json)?;
        Ok(name)
    }

    pub fn restore(&self, backup_name: &str) -> Result<Config, LedgerError> {
        let path = self.backups_dir.join(backup_name);
        if !path.exists() {
            return Err(LedgerError::Persistence(format!(
                "configuration backup `{}` not found",
                backup_name
            )));
        }
        let data = fs::read_to_string(&path)?;
        let config: Config = serde_json::from_str(&data)?;
        self.save(&config)?;
        Ok(config)
    }

    pub fn list_backups(&self) -> Result<Vec<String>, LedgerError> {
        if !self.backups_dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(&self.backups_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(name) = path.file_name().and_then(|name| name.to_str()) {
                entries.push(name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_timestamp(b)
                .cmp(&parse_timestamp(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// `config_YYYYMMDD_HHMM[_note].json`
fn parse_timestamp(name: &str) -> Option<DateTime<Utc>> {
    let trimmed = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let mut segments = trimmed.split('_').skip(1);
    let date_part = segments.next()?;
    let time_part = segments.next()?;
    if date_part.len() != 8 || time_part.len() != 4 {
        return None;
    }
    NaiveDateTime::parse_from_str(&format!("{}{}", date_part, time_part), "%Y%m%d%H%M")
        .ok()
        .map(|naive| DateTime::from_naive_utc_and_offset(naive, Utc))
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

fn write_file(path: &Path, data: &str) -> Result<(), LedgerError> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
