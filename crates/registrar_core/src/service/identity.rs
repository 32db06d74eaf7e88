//! Cascading identity resolution for upserts.
//!
//! # Responsibility
//! - Decide whether a write request targets an existing record or a new one.
//!
//! # Invariants
//! - Keys are tried in fixed priority order: surrogate id, natural key,
//!   email. The first hit wins.
//! - A stale surrogate id is a miss, never a reason to create a row under
//!   that id.
//! - Blank natural keys and emails are not candidates.

use crate::model::RecordId;
use crate::repo::RepoResult;
use log::debug;

/// One candidate key for identity lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityKey<'a> {
    SurrogateId(RecordId),
    /// `student_id`, `employee_id` or course `code`, already trimmed.
    NaturalKey(&'a str),
    /// Student email, already trimmed.
    Email(&'a str),
}

/// Which key produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedBy {
    SurrogateId,
    NaturalKey,
    Email,
}

impl IdentityKey<'_> {
    pub fn matched_by(&self) -> MatchedBy {
        match self {
            Self::SurrogateId(_) => MatchedBy::SurrogateId,
            Self::NaturalKey(_) => MatchedBy::NaturalKey,
            Self::Email(_) => MatchedBy::Email,
        }
    }
}

impl MatchedBy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SurrogateId => "surrogate_id",
            Self::NaturalKey => "natural_key",
            Self::Email => "email",
        }
    }
}

/// Ordered candidate keys for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityKeys<'a> {
    keys: Vec<IdentityKey<'a>>,
}

impl<'a> IdentityKeys<'a> {
    /// Builds keys in priority order, skipping absent and blank values.
    pub fn new(id: Option<RecordId>, natural_key: Option<&'a str>, email: Option<&'a str>) -> Self {
        let mut keys = Vec::with_capacity(3);
        if let Some(id) = id {
            keys.push(IdentityKey::SurrogateId(id));
        }
        if let Some(value) = non_blank(natural_key) {
            keys.push(IdentityKey::NaturalKey(value));
        }
        if let Some(value) = non_blank(email) {
            keys.push(IdentityKey::Email(value));
        }
        Self { keys }
    }

    pub fn as_slice(&self) -> &[IdentityKey<'a>] {
        &self.keys
    }
}

/// Result of identity resolution.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution<T> {
    Existing { record: T, matched_by: MatchedBy },
    New,
}

/// Tries each key with `lookup` and returns the first match.
///
/// Lookup errors abort resolution and propagate unchanged.
pub fn resolve<'a, T, F>(keys: &IdentityKeys<'a>, mut lookup: F) -> RepoResult<Resolution<T>>
where
    F: FnMut(IdentityKey<'a>) -> RepoResult<Option<T>>,
{
    for key in keys.as_slice() {
        if let Some(record) = lookup(*key)? {
            return Ok(Resolution::Existing {
                record,
                matched_by: key.matched_by(),
            });
        }
        debug!(
            "event=identity_resolve module=service status=miss key={}",
            key.matched_by().as_str()
        );
    }
    Ok(Resolution::New)
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
