#![allow(dead_code)]

use std::{path::PathBuf, sync::Mutex};

use chrono::NaiveDate;
use club_ledger::{
    config::ConfigManager,
    core::ClubManager,
    domain::{Member, MemberCategory, MemberId},
    ledger::ClubBook,
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn temp_base() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// Creates isolated managers backed by a unique directory for each test.
pub fn setup_test_env() -> (ClubManager, ConfigManager, PathBuf) {
    let base = temp_base();
    let storage = JsonStorage::new(Some(base.clone()), Some(3)).expect("create json storage");
    let manager = ClubManager::new(Box::new(storage));
    let config_manager =
        ConfigManager::with_base_dir(base.clone()).expect("create config manager for temp dir");
    (manager, config_manager, base)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn add(book: &mut ClubBook, name: &str, category: MemberCategory, joined: NaiveDate) -> MemberId {
    book.add_member(Member::new(name, category, joined))
}
