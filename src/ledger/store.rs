use std::collections::{BTreeMap, BTreeSet};

use crate::domain::{MemberId, Month};

use super::record::LedgerRecord;

/// Ledger records keyed by member and year. Records are created on the first
/// mutation; reads of a missing record behave as "no payments, no exemptions".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: BTreeMap<MemberId, BTreeMap<i32, LedgerRecord>>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, member: &MemberId, year: i32) -> Option<&LedgerRecord> {
        self.records.get(member).and_then(|years| years.get(&year))
    }

    /// Returns the record for `member`/`year`, creating an empty one if needed.
    pub fn record_mut(&mut self, member: &MemberId, year: i32) -> &mut LedgerRecord {
        self.records
            .entry(member.clone())
            .or_default()
            .entry(year)
            .or_insert_with(|| LedgerRecord::new(year))
    }

    /// Stores a record, returning the one it replaced.
    pub fn insert(&mut self, member: MemberId, record: LedgerRecord) -> Option<LedgerRecord> {
        self.records
            .entry(member)
            .or_default()
            .insert(record.year(), record)
    }

    pub fn payment(&self, member: &MemberId, year: i32, month: Month) -> Option<i64> {
        self.record(member, year)
            .and_then(|record| record.payment(month))
    }

    /// Drops every record owned by `member`, returning how many were removed.
    pub fn remove_member(&mut self, member: &MemberId) -> usize {
        self.records
            .remove(member)
            .map(|years| years.len())
            .unwrap_or(0)
    }

    pub fn member_ids(&self) -> impl Iterator<Item = &MemberId> {
        self.records.keys()
    }

    pub fn records_for(&self, member: &MemberId) -> impl Iterator<Item = &LedgerRecord> {
        self.records
            .get(member)
            .into_iter()
            .flat_map(|years| years.values())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&MemberId, &LedgerRecord)> {
        self.records
            .iter()
            .flat_map(|(member, years)| years.values().map(move |record| (member, record)))
    }

    /// Every year that has at least one record.
    pub fn years(&self) -> BTreeSet<i32> {
        self.records
            .values()
            .flat_map(|years| years.keys().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.values().map(BTreeMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_are_created_lazily_per_year() {
        let mut store = RecordStore::new();
        let id = MemberId::new("m1");
        assert!(store.record(&id, 2025).is_none());

        store
            .record_mut(&id, 2025)
            .record_payment(Month::new(3).unwrap(), 15_000);
        store.record_mut(&id, 2024);

        assert_eq!(store.len(), 2);
        assert_eq!(store.payment(&id, 2025, Month::new(3).unwrap()), Some(15_000));
        assert_eq!(store.payment(&id, 2024, Month::new(3).unwrap()), None);
        assert_eq!(store.years().into_iter().collect::<Vec<_>>(), vec![2024, 2025]);
    }

    #[test]
    fn remove_member_drops_all_years() {
        let mut store = RecordStore::new();
        let id = MemberId::new("m1");
        store.record_mut(&id, 2024);
        store.record_mut(&id, 2025);
        assert_eq!(store.remove_member(&id), 2);
        assert!(store.is_empty());
    }
}
