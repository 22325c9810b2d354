use std::{
    env, fs,
    path::{Path, PathBuf},
};

use dirs::home_dir;

use crate::errors::LedgerError;

const DEFAULT_DIR_NAME: &str = ".club_ledger";
const HOME_ENV: &str = "CLUB_LEDGER_HOME";
const CLUBS_DIR: &str = "clubs";
const BACKUP_DIR: &str = "backups";
const CONFIG_DIR: &str = "config";
const CONFIG_FILE: &str = "config.json";
const CONFIG_BACKUP_DIR: &str = "config_backups";
const STATE_FILE: &str = "state.json";

/// Resolves the on-disk layout under the application data directory.
pub struct PathResolver;

impl PathResolver {
    /// `$CLUB_LEDGER_HOME` when set, otherwise `~/.club_ledger`.
    pub fn base_dir() -> PathBuf {
        if let Some(custom) = env::var_os(HOME_ENV) {
            return PathBuf::from(custom);
        }
        home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(DEFAULT_DIR_NAME)
    }

    pub fn resolve_base(root: Option<PathBuf>) -> PathBuf {
        root.unwrap_or_else(Self::base_dir)
    }

    pub fn clubs_dir_in(base: &Path) -> PathBuf {
        base.join(CLUBS_DIR)
    }

    pub fn backup_dir_in(base: &Path) -> PathBuf {
        base.join(BACKUP_DIR)
    }

    pub fn config_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_DIR)
    }

    pub fn config_file_in(base: &Path) -> PathBuf {
        Self::config_dir_in(base).join(CONFIG_FILE)
    }

    pub fn config_backup_dir_in(base: &Path) -> PathBuf {
        base.join(CONFIG_BACKUP_DIR)
    }

    pub fn state_file_in(base: &Path) -> PathBuf {
        base.join(STATE_FILE)
    }
}

pub fn ensure_dir(path: &Path) -> Result<(), LedgerError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
