//! Department reference record.
//!
//! Departments are never administered directly: they are provisioned the
//! first time a student, faculty member or course names them.

use super::RecordId;
use serde::{Deserialize, Serialize};

/// Shared reference entity keyed by its human-readable `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub id: RecordId,
    /// Unique human label, matched exactly.
    pub name: String,
    /// Short identifier derived from `name`; collision-avoided, not unique.
    pub code: String,
}
