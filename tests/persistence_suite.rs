mod common;

use std::fs;

use club_ledger::{
    core::services::{DuesService, RosterService},
    domain::{Member, MemberCategory},
    errors::LedgerError,
    fixtures::DemoRoster,
    ledger::{FeeSettings, MonthStatus},
    storage::{load_book_from_path, save_book_to_path},
};
use common::{date, setup_test_env};
use serde_json::{json, Value};

fn rewrite_club(base: &std::path::Path, name: &str, edit: impl FnOnce(&mut Value)) {
    let path = base.join("clubs").join(format!("{name}.json"));
    let mut value: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    edit(&mut value);
    fs::write(&path, serde_json::to_string_pretty(&value).unwrap()).unwrap();
}

#[test]
fn mutations_survive_a_restart() {
    let (mut manager, _, base) = setup_test_env();
    manager
        .create("tuesday", "Tuesday Club", FeeSettings::default())
        .unwrap();
    let id = manager
        .mutate(|book| {
            RosterService::add(book, Member::new("Member 001", MemberCategory::Regular, date(2024, 2, 1)))
        })
        .unwrap();
    manager
        .mutate(|book| DuesService::toggle_payment(book, &id, 2025, 3))
        .unwrap();
    manager
        .mutate(|book| DuesService::toggle_exempt(book, &id, 2025, 4))
        .unwrap();

    let storage = club_ledger::storage::JsonStorage::new(Some(base), Some(3)).unwrap();
    let mut reopened = club_ledger::core::ClubManager::new(Box::new(storage));
    let metadata = reopened.open_last().unwrap().expect("last club recorded");
    assert_eq!(metadata.name, "tuesday");
    assert!(metadata.warnings.is_empty());

    let book = reopened.current().unwrap();
    assert_eq!(book.name, "Tuesday Club");
    assert_eq!(book.month_status(&id, 2025, 3).unwrap(), MonthStatus::Paid(30_000));
    assert_eq!(book.month_status(&id, 2025, 4).unwrap(), MonthStatus::Exempt);
    assert_eq!(book.records, manager.current().unwrap().records);
}

#[test]
fn unparseable_file_is_reported_as_corrupted() {
    let (mut manager, _, base) = setup_test_env();
    fs::write(base.join("clubs").join("broken.json"), "{ not json").unwrap();
    let err = manager.load("broken").unwrap_err();
    assert!(matches!(err, LedgerError::CorruptedRecord(_)), "{err}");
    assert!(!manager.is_loaded());
}

#[test]
fn non_numeric_month_key_is_corrupted() {
    let (mut manager, _, base) = setup_test_env();
    manager.create("club", "Club", FeeSettings::default()).unwrap();
    let id = manager
        .mutate(|book| {
            RosterService::add(book, Member::new("Member 002", MemberCategory::Regular, date(2020, 1, 1)))
        })
        .unwrap();
    rewrite_club(&base, "club", |value| {
        value["records"][id.as_str()] = json!([
            { "year": 2025, "payments": { "march": 30000 }, "exemptMonths": [] }
        ]);
    });
    let err = manager.load("club").unwrap_err();
    assert!(matches!(err, LedgerError::CorruptedRecord(_)), "{err}");
}

#[test]
fn month_both_paid_and_exempt_is_corrupted() {
    let (mut manager, _, base) = setup_test_env();
    manager.create("club", "Club", FeeSettings::default()).unwrap();
    let id = manager
        .mutate(|book| {
            RosterService::add(book, Member::new("Member 002", MemberCategory::Regular, date(2020, 1, 1)))
        })
        .unwrap();
    rewrite_club(&base, "club", |value| {
        value["records"][id.as_str()] = json!([
            { "year": 2025, "payments": { "5": 30000 }, "exemptMonths": [5] }
        ]);
    });
    assert!(matches!(
        manager.load("club"),
        Err(LedgerError::CorruptedRecord(_))
    ));
}

#[test]
fn newer_schema_is_rejected() {
    let (mut manager, _, base) = setup_test_env();
    manager.create("club", "Club", FeeSettings::default()).unwrap();
    rewrite_club(&base, "club", |value| {
        value["schema_version"] = json!(99);
    });
    match manager.load("club") {
        Err(LedgerError::Persistence(message)) => assert!(message.contains("newer")),
        other => panic!("expected persistence error, got {other:?}"),
    }
}

#[test]
fn records_for_unknown_members_load_with_warnings() {
    let (mut manager, _, base) = setup_test_env();
    manager.create("club", "Club", FeeSettings::default()).unwrap();
    rewrite_club(&base, "club", |value| {
        value["records"]["ghost"] = json!([
            { "year": 2025, "payments": { "1": 30000 }, "exemptMonths": [] }
        ]);
    });
    let metadata = manager.load("club").unwrap();
    assert_eq!(metadata.warnings.len(), 1);
    assert!(metadata.warnings[0].contains("ghost"));
    let totals = manager.current().unwrap().club_totals(2025);
    assert_eq!(totals.total_income, 0);
}

#[test]
fn backups_are_pruned_to_retention() {
    let (mut manager, _, _) = setup_test_env();
    manager.create("club", "Club", FeeSettings::default()).unwrap();
    for note in ["one", "two", "three", "four", "five"] {
        manager.backup(Some(note)).unwrap();
    }
    let backups = manager.list_backups().unwrap();
    assert_eq!(backups.len(), 3);
    assert!(backups.iter().all(|name| name.starts_with("club_")));
}

#[test]
fn restore_brings_back_the_backed_up_book() {
    let (mut manager, _, _) = setup_test_env();
    manager.create("club", "Club", FeeSettings::default()).unwrap();
    let id = manager
        .mutate(|book| {
            RosterService::add(book, Member::new("Member 003", MemberCategory::Regular, date(2020, 1, 1)))
        })
        .unwrap();
    let backup = manager.backup(Some("before pay")).unwrap();
    manager
        .mutate(|book| DuesService::pay_all(book, &id, 2025))
        .unwrap();
    assert_eq!(manager.current().unwrap().club_totals(2025).total_income, 360_000);

    let file_name = backup.file_name().unwrap().to_str().unwrap().to_string();
    manager.restore(&file_name).unwrap();
    let book = manager.current().unwrap();
    assert_eq!(book.club_totals(2025).total_income, 0);
    assert_eq!(book.members.len(), 1);
}

#[test]
fn book_round_trips_through_a_plain_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("demo.json");
    let book = DemoRoster::new(40, 2025).build("Demo").unwrap();

    save_book_to_path(&book, &path).unwrap();
    let (loaded, warnings) = load_book_from_path(&path).unwrap();

    assert!(warnings.is_empty());
    assert_eq!(loaded.members, book.members);
    assert_eq!(loaded.records, book.records);
    assert_eq!(loaded.attendance, book.attendance);
    assert_eq!(loaded.settings, book.settings);
    assert_eq!(loaded.club_totals(2025), book.club_totals(2025));
}
