mod common;

use club_ledger::{
    attendance::{AttendanceFilter, Intensity},
    core::services::AttendanceService,
    domain::{MemberCategory, MemberId},
    ledger::ClubBook,
};
use common::{add, date};

fn club_with(count: usize) -> (ClubBook, Vec<MemberId>) {
    let mut book = ClubBook::new("Attendance");
    let ids = (0..count)
        .map(|idx| add(&mut book, &format!("Member {idx:03}"), MemberCategory::Regular, date(2024, 1, 1)))
        .collect();
    (book, ids)
}

#[test]
fn aggregate_intensity_follows_headcount() {
    let (mut book, ids) = club_with(20);
    let day = date(2025, 4, 2);
    let mut seen = Vec::new();
    for (idx, id) in ids.iter().enumerate() {
        AttendanceService::toggle(&mut book, id, day).unwrap();
        if matches!(idx + 1, 4 | 5 | 9 | 10 | 19 | 20) {
            seen.push(AttendanceService::intensity(&book, day, &AttendanceFilter::All));
        }
    }
    assert_eq!(
        seen,
        vec![
            Intensity::Low,
            Intensity::Medium,
            Intensity::Medium,
            Intensity::High,
            Intensity::High,
            Intensity::Full,
        ]
    );
    let solo = AttendanceFilter::Member(ids[0].clone());
    assert_eq!(AttendanceService::count(&book, day, &solo), 1);
    assert_eq!(AttendanceService::intensity(&book, day, &solo), Intensity::Full);
    assert_eq!(
        AttendanceService::intensity(&book, date(2025, 4, 3), &solo),
        Intensity::None
    );
}

#[test]
fn current_streak_ignores_unmarked_today_only() {
    let (mut book, ids) = club_with(1);
    let filter = AttendanceFilter::Member(ids[0].clone());
    for day in [3, 4, 5, 6] {
        AttendanceService::toggle(&mut book, &ids[0], date(2025, 6, day)).unwrap();
    }
    let stats = AttendanceService::stats(&book, 2025, &filter, date(2025, 6, 7)).unwrap();
    assert_eq!(stats.current_streak, 4);

    let stats = AttendanceService::stats(&book, 2025, &filter, date(2025, 6, 8)).unwrap();
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.longest_streak, 4);
    assert_eq!(stats.total_days, 4);
}

#[test]
fn stats_ignore_marks_after_today() {
    let (mut book, ids) = club_with(1);
    let filter = AttendanceFilter::Member(ids[0].clone());
    for day in [1, 2, 10, 11, 12] {
        AttendanceService::toggle(&mut book, &ids[0], date(2025, 3, day)).unwrap();
    }
    let stats = AttendanceService::stats(&book, 2025, &filter, date(2025, 3, 10)).unwrap();
    assert_eq!(stats.total_days, 3);
    assert_eq!(stats.longest_streak, 2);
    assert_eq!(stats.current_streak, 1);
}

#[test]
fn streak_stops_at_new_year() {
    let (mut book, ids) = club_with(1);
    for day in [date(2024, 12, 30), date(2024, 12, 31), date(2025, 1, 1), date(2025, 1, 2)] {
        AttendanceService::toggle(&mut book, &ids[0], day).unwrap();
    }
    let stats = AttendanceService::stats(&book, 2025, &AttendanceFilter::All, date(2025, 1, 2)).unwrap();
    assert_eq!(stats.current_streak, 2);
    assert_eq!(stats.longest_streak, 2);
}

#[test]
fn finished_year_is_measured_to_december_31st() {
    let (mut book, ids) = club_with(2);
    AttendanceService::toggle(&mut book, &ids[0], date(2024, 12, 29)).unwrap();
    AttendanceService::toggle(&mut book, &ids[1], date(2024, 12, 30)).unwrap();
    AttendanceService::toggle(&mut book, &ids[0], date(2024, 12, 31)).unwrap();

    let all = AttendanceService::stats(&book, 2024, &AttendanceFilter::All, date(2025, 8, 1)).unwrap();
    assert_eq!(all.current_streak, 3);
    assert_eq!(all.total_days, 3);

    let first = AttendanceFilter::Member(ids[0].clone());
    let solo = AttendanceService::stats(&book, 2024, &first, date(2025, 8, 1)).unwrap();
    assert_eq!(solo.current_streak, 1);
    assert_eq!(solo.longest_streak, 1);
    assert_eq!(solo.total_days, 2);

    let second = AttendanceFilter::Member(ids[1].clone());
    let skipped = AttendanceService::stats(&book, 2024, &second, date(2025, 8, 1)).unwrap();
    assert_eq!(skipped.current_streak, 1);
}

#[test]
fn future_year_has_no_stats() {
    let (mut book, ids) = club_with(1);
    AttendanceService::toggle(&mut book, &ids[0], date(2026, 1, 5)).unwrap();
    let stats = AttendanceService::stats(&book, 2026, &AttendanceFilter::All, date(2025, 12, 31)).unwrap();
    assert_eq!(stats.total_days, 0);
    assert_eq!(stats.current_streak, 0);
}

#[test]
fn removing_a_member_clears_their_marks() {
    let (mut book, ids) = club_with(2);
    let day = date(2025, 5, 5);
    AttendanceService::toggle(&mut book, &ids[0], day).unwrap();
    AttendanceService::toggle(&mut book, &ids[1], day).unwrap();
    book.remove_member(&ids[0]);
    assert_eq!(AttendanceService::count(&book, day, &AttendanceFilter::All), 1);
    assert!(AttendanceService::toggle(&mut book, &ids[0], day).is_err());
}
