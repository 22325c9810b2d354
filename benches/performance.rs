use chrono::NaiveDate;
use club_ledger::attendance::AttendanceFilter;
use club_ledger::fixtures::DemoRoster;
use club_ledger::ledger::ClubBook;
use club_ledger::storage::json_backend::{
    load_book_from_path as load_book_from_file, save_book_to_path as save_book_to_file,
};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use tempfile::tempdir;

fn build_sample_club(members: usize) -> ClubBook {
    DemoRoster::new(members, 2025)
        .build("Benchmark")
        .expect("demo club")
}

fn bench_club_io(c: &mut Criterion) {
    let book = build_sample_club(black_box(500));
    let dir = tempdir().expect("tempdir");
    let file_path = dir.path().join("club.json");

    c.bench_function("club_save_500", |b| {
        b.iter(|| {
            save_book_to_file(&book, &file_path).expect("save club");
        })
    });

    save_book_to_file(&book, &file_path).expect("seed");

    c.bench_function("club_load_500", |b| {
        b.iter(|| {
            let loaded = load_book_from_file(&file_path).expect("load club");
            black_box(loaded);
        })
    });
}

fn bench_club_summaries(c: &mut Criterion) {
    let book = build_sample_club(black_box(500));
    let today = NaiveDate::from_ymd_opt(2025, 9, 30).unwrap();

    c.bench_function("club_totals_500", |b| {
        b.iter(|| {
            let totals = book.club_totals(black_box(2025));
            black_box(totals);
        })
    });

    c.bench_function("attendance_stats_all", |b| {
        b.iter(|| {
            let stats = book
                .attendance
                .year_stats(2025, &AttendanceFilter::All, today);
            black_box(stats);
        })
    });

    c.bench_function("pay_all_roster", |b| {
        b.iter_batched(
            || book.clone(),
            |mut club| {
                let ids: Vec<_> = club.members.iter().map(|member| member.id.clone()).collect();
                for id in &ids {
                    club.pay_all(id, 2025).expect("pay all");
                }
                black_box(club);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_club_io, bench_club_summaries);
criterion_main!(benches);
