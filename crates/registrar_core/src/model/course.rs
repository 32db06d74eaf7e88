//! Course record.

use super::department::Department;
use super::RecordId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Option<RecordId>,
    /// Catalog code, unique when set.
    pub code: Option<String>,
    pub name: Option<String>,
    pub department: Option<Department>,
    pub credits: Option<i64>,
    pub instructor: Option<String>,
    pub capacity: Option<i64>,
    /// Enrolled head count; `0` when never reported.
    pub student_count: i64,
    pub semester: Option<i64>,
}
