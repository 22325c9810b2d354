use chrono::NaiveDate;

use crate::domain::{Member, MemberCategory, MemberId};
use crate::errors::LedgerError;
use crate::ledger::ClubBook;

use super::{ServiceError, ServiceResult};

/// Fields an administrator may change on an existing member. `None` keeps the
/// current value; an empty string clears an optional contact field.
#[derive(Debug, Clone, Default)]
pub struct MemberChanges {
    pub name: Option<String>,
    pub category: Option<MemberCategory>,
    pub join_date: Option<NaiveDate>,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

impl MemberChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.join_date.is_none()
            && self.phone.is_none()
            && self.notes.is_none()
    }
}

pub struct RosterService;

impl RosterService {
    pub fn add(book: &mut ClubBook, member: Member) -> ServiceResult<MemberId> {
        Self::validate_name(book, None, &member.name)?;
        if book.member(&member.id).is_some() {
            return Err(ServiceError::Invalid(format!(
                "Member id `{}` is already in use",
                member.id
            )));
        }
        tracing::debug!(member = %member.id, name = %member.name, "member added");
        Ok(book.add_member(member))
    }

    pub fn edit(book: &mut ClubBook, id: &MemberId, changes: MemberChanges) -> ServiceResult<()> {
        if let Some(name) = &changes.name {
            Self::validate_name(book, Some(id), name)?;
        }
        let member = book
            .member_mut(id)
            .ok_or_else(|| LedgerError::MemberNotFound(id.to_string()))?;
        if let Some(name) = changes.name {
            member.name = name.trim().to_string();
        }
        if let Some(category) = changes.category {
            member.category = category;
        }
        if let Some(join_date) = changes.join_date {
            member.join_date = join_date;
        }
        if let Some(phone) = changes.phone {
            member.phone = non_empty(phone);
        }
        if let Some(notes) = changes.notes {
            member.notes = non_empty(notes);
        }
        book.touch();
        Ok(())
    }

    /// Removes the member along with every dues record and attendance mark.
    pub fn remove(book: &mut ClubBook, id: &MemberId) -> ServiceResult<Member> {
        let member = book
            .remove_member(id)
            .ok_or_else(|| LedgerError::MemberNotFound(id.to_string()))?;
        tracing::debug!(member = %id, "member removed");
        Ok(member)
    }

    pub fn list(book: &ClubBook) -> Vec<&Member> {
        book.members.iter().collect()
    }

    /// Finds a member by id, exact name (case-insensitive) or unique name prefix.
    pub fn resolve<'a>(book: &'a ClubBook, key: &str) -> ServiceResult<&'a Member> {
        let key = key.trim();
        if let Some(member) = book.member(&MemberId::new(key)) {
            return Ok(member);
        }
        let needle = key.to_lowercase();
        if let Some(member) = book
            .members
            .iter()
            .find(|member| member.name.to_lowercase() == needle)
        {
            return Ok(member);
        }
        let matches: Vec<&Member> = book
            .members
            .iter()
            .filter(|member| member.name.to_lowercase().starts_with(&needle))
            .collect();
        match matches.as_slice() {
            [member] => Ok(*member),
            [] => Err(LedgerError::MemberNotFound(key.to_string()).into()),
            _ => Err(ServiceError::Invalid(format!(
                "`{}` matches {} members; use the member id",
                key,
                matches.len()
            ))),
        }
    }

    fn validate_name(
        book: &ClubBook,
        exclude: Option<&MemberId>,
        candidate: &str,
    ) -> ServiceResult<()> {
        let normalized = candidate.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(LedgerError::InvalidInput("member name cannot be empty".into()).into());
        }
        let duplicate = book.members.iter().any(|member| {
            member.name.trim().to_lowercase() == normalized
                && exclude.map_or(true, |id| &member.id != id)
        });
        if duplicate {
            Err(LedgerError::InvalidInput(format!("member `{}` already exists", candidate.trim())).into())
        } else {
            Ok(())
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}
