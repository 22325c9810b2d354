use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

use crate::domain::Month;

/// Whether a member who joined on `join_date` owes dues for `month` of `year`.
///
/// Members joining in a later year owe nothing; members who joined in an
/// earlier year owe every month. Within the join year the join month itself
/// is owed, with no pro-ration.
pub fn is_eligible(join_date: NaiveDate, year: i32, month: Month) -> bool {
    match join_date.year().cmp(&year) {
        Ordering::Less => true,
        Ordering::Greater => false,
        Ordering::Equal => month.number() >= join_date.month(),
    }
}

pub fn eligible_months(join_date: NaiveDate, year: i32) -> impl Iterator<Item = Month> {
    Month::all().filter(move |month| is_eligible(join_date, year, *month))
}
