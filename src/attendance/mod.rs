//! Attendance log with heatmap intensities and streak statistics.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::domain::MemberId;

/// Which attendance marks a query looks at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttendanceFilter {
    All,
    Member(MemberId),
}

/// Heatmap colour bucket for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Intensity {
    None,
    Low,
    Medium,
    High,
    Full,
}

/// Buckets a day's count. A single member's view is binary; the club-wide
/// view steps at 5, 10 and 20 attendees.
pub fn intensity(count: usize, filter: &AttendanceFilter) -> Intensity {
    match (count, filter) {
        (0, _) => Intensity::None,
        (_, AttendanceFilter::Member(_)) => Intensity::Full,
        (c, AttendanceFilter::All) if c < 5 => Intensity::Low,
        (c, AttendanceFilter::All) if c < 10 => Intensity::Medium,
        (c, AttendanceFilter::All) if c < 20 => Intensity::High,
        _ => Intensity::Full,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceStats {
    pub total_days: usize,
    pub longest_streak: usize,
    pub current_streak: usize,
}

/// Members present per calendar day. Days with nobody present are not stored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttendanceLog {
    days: BTreeMap<NaiveDate, BTreeSet<MemberId>>,
}

impl AttendanceLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flips `member`'s presence on `date`. Returns `true` when now present.
    pub fn toggle(&mut self, member: &MemberId, date: NaiveDate) -> bool {
        let present = self.days.entry(date).or_default();
        let now_present = if present.remove(member) {
            false
        } else {
            present.insert(member.clone());
            true
        };
        if present.is_empty() {
            self.days.remove(&date);
        }
        now_present
    }

    pub fn mark(&mut self, member: MemberId, date: NaiveDate) {
        self.days.entry(date).or_default().insert(member);
    }

    pub fn is_present(&self, member: &MemberId, date: NaiveDate) -> bool {
        self.days
            .get(&date)
            .is_some_and(|present| present.contains(member))
    }

    pub fn count(&self, date: NaiveDate, filter: &AttendanceFilter) -> usize {
        match filter {
            AttendanceFilter::All => self.days.get(&date).map_or(0, BTreeSet::len),
            AttendanceFilter::Member(member) => usize::from(self.is_present(member, date)),
        }
    }

    pub fn days(&self) -> impl Iterator<Item = (NaiveDate, &BTreeSet<MemberId>)> {
        self.days.iter().map(|(date, present)| (*date, present))
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Removes `member` from every day, returning how many days changed.
    pub fn remove_member(&mut self, member: &MemberId) -> usize {
        let mut changed = 0;
        self.days.retain(|_, present| {
            if present.remove(member) {
                changed += 1;
            }
            !present.is_empty()
        });
        changed
    }

    /// Per-day counts for every day of `year`.
    pub fn daily_counts(&self, year: i32, filter: &AttendanceFilter) -> Vec<(NaiveDate, usize)> {
        let Some((start, end)) = year_bounds(year) else {
            return Vec::new();
        };
        start
            .iter_days()
            .take_while(|day| *day <= end)
            .map(|day| (day, self.count(day, filter)))
            .collect()
    }

    /// Statistics over `year` up to `today` (or the whole year once it has passed).
    ///
    /// The current streak walks backwards from the reference day (`today`, or
    /// December 31st of a finished year). An unmarked reference day does not
    /// end the streak; an unmarked earlier day does. The walk stops at January
    /// 1st of `year`.
    pub fn year_stats(
        &self,
        year: i32,
        filter: &AttendanceFilter,
        today: NaiveDate,
    ) -> AttendanceStats {
        let Some((start, year_end)) = year_bounds(year) else {
            return AttendanceStats::default();
        };
        if today < start {
            return AttendanceStats::default();
        }
        let end = today.min(year_end);
        let attended = |day: NaiveDate| self.count(day, filter) > 0;

        let mut stats = AttendanceStats::default();
        let mut run = 0;
        for day in start.iter_days().take_while(|day| *day <= end) {
            if attended(day) {
                stats.total_days += 1;
                run += 1;
                stats.longest_streak = stats.longest_streak.max(run);
            } else {
                run = 0;
            }
        }

        let mut cursor = Some(end);
        if !attended(end) {
            cursor = end.pred_opt();
        }
        while let Some(day) = cursor.filter(|day| *day >= start && attended(*day)) {
            stats.current_streak += 1;
            cursor = day.pred_opt();
        }
        stats
    }
}

fn year_bounds(year: i32) -> Option<(NaiveDate, NaiveDate)> {
    Some((
        NaiveDate::from_ymd_opt(year, 1, 1)?,
        NaiveDate::from_ymd_opt(year, 12, 31)?,
    ))
}
