use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::common::*;
use crate::errors::LedgerError;

/// Opaque member identifier. Imported rosters keep their own ids; members
/// created in-app get a random one.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemberId(String);

impl MemberId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        let mut id = Uuid::new_v4().simple().to_string();
        id.truncate(12);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MemberId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MemberId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

/// Membership tier, which decides the monthly fee.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberCategory {
    #[default]
    Regular,
    Associate,
}

impl MemberCategory {
    pub fn label(self) -> &'static str {
        match self {
            MemberCategory::Regular => "regular",
            MemberCategory::Associate => "associate",
        }
    }
}

impl fmt::Display for MemberCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for MemberCategory {
    type Err = LedgerError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "regular" | "r" => Ok(MemberCategory::Regular),
            "associate" | "a" => Ok(MemberCategory::Associate),
            other => Err(LedgerError::InvalidInput(format!(
                "unknown member category `{}` (use regular or associate)",
                other
            ))),
        }
    }
}

/// A club member as listed on the roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub category: MemberCategory,
    pub join_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Member {
    /// Creates a member with a freshly generated identifier.
    pub fn new(name: impl Into<String>, category: MemberCategory, join_date: NaiveDate) -> Self {
        Self {
            id: MemberId::generate(),
            name: name.into(),
            category,
            join_date,
            phone: None,
            notes: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<MemberId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

impl From<String> for MemberId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Identifiable for Member {
    type Id = MemberId;

    fn id(&self) -> &MemberId {
        &self.id
    }
}

impl NamedEntity for Member {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Member {
    fn display_label(&self) -> String {
        format!("{} ({}, joined {})", self.name, self.category, self.join_date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_parses_case_insensitively() {
        assert_eq!(
            "Associate".parse::<MemberCategory>().unwrap(),
            MemberCategory::Associate
        );
        assert_eq!(" regular ".parse::<MemberCategory>().unwrap(), MemberCategory::Regular);
        assert!("honorary".parse::<MemberCategory>().is_err());
    }

    #[test]
    fn generated_ids_are_distinct() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let a = Member::new("Member 001", MemberCategory::Regular, date);
        let b = Member::new("Member 002", MemberCategory::Regular, date);
        assert_ne!(a.id, b.id);
        assert_eq!(a.display_label(), "A (regular, joined 2024-01-01)");
    }
}
