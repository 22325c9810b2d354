//! Serialized form of a [`ClubBook`] and the validation applied when reading it.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    attendance::AttendanceLog,
    domain::{Member, MemberId, Month},
    errors::LedgerError,
    ledger::{ClubBook, FeeSettings, LedgerRecord, RecordStore, CURRENT_SCHEMA_VERSION},
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClubSnapshot {
    #[serde(default = "ClubSnapshot::schema_version_default")]
    pub schema_version: u8,
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub settings: FeeSettings,
    #[serde(default)]
    pub members: Vec<Member>,
    #[serde(default)]
    pub records: BTreeMap<MemberId, Vec<StoredRecord>>,
    #[serde(default)]
    pub attendance: Vec<StoredAttendance>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One member's dues for one year as written to disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub year: i32,
    #[serde(default)]
    pub payments: BTreeMap<u32, i64>,
    #[serde(rename = "exemptMonths", default)]
    pub exempt_months: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredAttendance {
    pub date: NaiveDate,
    #[serde(rename = "memberIds")]
    pub member_ids: Vec<MemberId>,
}

impl ClubSnapshot {
    pub fn schema_version_default() -> u8 {
        CURRENT_SCHEMA_VERSION
    }

    pub fn from_book(book: &ClubBook) -> Self {
        let mut records: BTreeMap<MemberId, Vec<StoredRecord>> = BTreeMap::new();
        for (member, record) in book.records.iter() {
            records
                .entry(member.clone())
                .or_default()
                .push(StoredRecord::from_record(record));
        }
        let attendance = book
            .attendance
            .days()
            .map(|(date, present)| StoredAttendance {
                date,
                member_ids: present.iter().cloned().collect(),
            })
            .collect();
        Self {
            schema_version: book.schema_version,
            id: book.id,
            name: book.name.clone(),
            settings: book.settings,
            members: book.members.clone(),
            records,
            attendance,
            created_at: book.created_at,
            updated_at: book.updated_at,
        }
    }

    /// Validates the snapshot and rebuilds the in-memory book.
    ///
    /// Structural damage fails with `CorruptedRecord`; references to members
    /// missing from the roster are kept and reported as warnings.
    pub fn into_book(self) -> Result<(ClubBook, Vec<String>), LedgerError> {
        if self.schema_version > CURRENT_SCHEMA_VERSION {
            return Err(LedgerError::Persistence(format!(
                "club schema v{} is newer than supported v{}",
                self.schema_version, CURRENT_SCHEMA_VERSION
            )));
        }
        self.settings
            .validate()
            .map_err(|err| LedgerError::CorruptedRecord(format!("fee settings: {err}")))?;

        let mut warnings = Vec::new();
        let mut roster = HashSet::new();
        for member in &self.members {
            if !roster.insert(member.id.clone()) {
                return Err(LedgerError::CorruptedRecord(format!(
                    "duplicate member id `{}`",
                    member.id
                )));
            }
        }

        let mut records = RecordStore::new();
        for (member, stored) in self.records {
            if !roster.contains(&member) {
                warnings.push(format!("ledger records reference unknown member `{}`", member));
            }
            for entry in stored {
                let year = entry.year;
                let record = entry.into_record(&member)?;
                if records.insert(member.clone(), record).is_some() {
                    return Err(LedgerError::CorruptedRecord(format!(
                        "member `{}` has more than one record for {}",
                        member, year
                    )));
                }
            }
        }

        let mut attendance = AttendanceLog::new();
        for day in self.attendance {
            for member in day.member_ids {
                if !roster.contains(&member) {
                    warnings.push(format!(
                        "attendance on {} references unknown member `{}`",
                        day.date, member
                    ));
                }
                attendance.mark(member, day.date);
            }
        }

        let book = ClubBook {
            id: self.id,
            name: self.name,
            members: self.members,
            settings: self.settings,
            records,
            attendance,
            created_at: self.created_at,
            updated_at: self.updated_at,
            schema_version: self.schema_version,
        };
        Ok((book, warnings))
    }
}

impl StoredRecord {
    pub fn from_record(record: &LedgerRecord) -> Self {
        Self {
            year: record.year(),
            payments: record
                .payments()
                .map(|(month, amount)| (month.number(), amount))
                .collect(),
            exempt_months: record.exempt_months().map(Month::number).collect(),
        }
    }

    fn into_record(self, member: &MemberId) -> Result<LedgerRecord, LedgerError> {
        let year = self.year;
        let month = |raw: u32| {
            Month::new(raw).map_err(|_| {
                LedgerError::CorruptedRecord(format!(
                    "member `{}` {}: month {} is out of range",
                    member, year, raw
                ))
            })
        };
        let payments = self
            .payments
            .into_iter()
            .map(|(raw, amount)| Ok((month(raw)?, amount)))
            .collect::<Result<BTreeMap<_, _>, LedgerError>>()?;
        let exempt = self
            .exempt_months
            .into_iter()
            .map(month)
            .collect::<Result<BTreeSet<_>, LedgerError>>()?;
        LedgerRecord::from_parts(year, payments, exempt).map_err(|err| match err {
            LedgerError::CorruptedRecord(message) => {
                LedgerError::CorruptedRecord(format!("member `{}`: {}", member, message))
            }
            other => other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MemberCategory;

    fn snapshot_with_record(record: StoredRecord) -> ClubSnapshot {
        let mut book = ClubBook::new("Snapshot");
        let join = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        book.add_member(Member::new("Member 001", MemberCategory::Regular, join).with_id("m1"));
        let mut snapshot = ClubSnapshot::from_book(&book);
        snapshot.records.insert(MemberId::new("m1"), vec![record]);
        snapshot
    }

    #[test]
    fn out_of_range_month_is_corrupted() {
        let snapshot = snapshot_with_record(StoredRecord {
            year: 2025,
            payments: BTreeMap::from([(13, 30_000)]),
            exempt_months: Vec::new(),
        });
        let err = snapshot.into_book().unwrap_err();
        assert!(matches!(err, LedgerError::CorruptedRecord(_)), "{err}");
    }

    #[test]
    fn negative_payment_is_corrupted() {
        let snapshot = snapshot_with_record(StoredRecord {
            year: 2025,
            payments: BTreeMap::from([(2, -5)]),
            exempt_months: Vec::new(),
        });
        assert!(matches!(
            snapshot.into_book(),
            Err(LedgerError::CorruptedRecord(_))
        ));
    }

    #[test]
    fn duplicate_year_is_corrupted() {
        let record = StoredRecord {
            year: 2025,
            payments: BTreeMap::new(),
            exempt_months: vec![1],
        };
        let mut snapshot = snapshot_with_record(record.clone());
        snapshot
            .records
            .get_mut(&MemberId::new("m1"))
            .unwrap()
            .push(record);
        assert!(matches!(
            snapshot.into_book(),
            Err(LedgerError::CorruptedRecord(_))
        ));
    }

    #[test]
    fn orphan_records_become_warnings() {
        let mut snapshot = snapshot_with_record(StoredRecord {
            year: 2025,
            payments: BTreeMap::from([(1, 30_000)]),
            exempt_months: Vec::new(),
        });
        snapshot.records.insert(
            MemberId::new("gone"),
            vec![StoredRecord {
                year: 2025,
                payments: BTreeMap::new(),
                exempt_months: vec![4],
            }],
        );
        let (book, warnings) = snapshot.into_book().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("gone"));
        assert_eq!(book.records.len(), 2);
    }

    #[test]
    fn stored_record_uses_month_keyed_payments() {
        let json = r#"{"year":2025,"payments":{"3":15000},"exemptMonths":[4,5]}"#;
        let stored: StoredRecord = serde_json::from_str(json).unwrap();
        assert_eq!(stored.payments.get(&3), Some(&15_000));
        assert_eq!(stored.exempt_months, vec![4, 5]);
        assert!(serde_json::from_str::<StoredRecord>(
            r#"{"year":2025,"payments":{"3":"paid"}}"#
        )
        .is_err());
    }
}
