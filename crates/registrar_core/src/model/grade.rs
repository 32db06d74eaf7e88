//! Grade record.
//!
//! No uniqueness is enforced: a student may hold several grade rows for one
//! course (retakes).

use super::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grade {
    pub id: Option<RecordId>,
    pub student_record_id: Option<RecordId>,
    pub course_id: Option<RecordId>,
    /// Letter grade, e.g. `A`.
    pub grade: Option<String>,
    pub marks: Option<i64>,
    pub semester: Option<i64>,
}
