//! Student record.
//!
//! # Invariants
//! - `student_id` and `email` are unique across students when set.
//! - `major` is `None` until a department label has been resolved.

use super::department::Department;
use super::RecordId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Enrollment lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StudentStatus {
    #[default]
    Active,
    Inactive,
    Graduated,
}

/// Academic risk band used by advising views.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    pub id: Option<RecordId>,
    /// Stable external code, e.g. `EDU-2023-1001`.
    pub student_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub status: StudentStatus,
    pub gpa: f64,
    pub semester: i64,
    pub enrollment_date: NaiveDateTime,
    pub major: Option<Department>,
    pub success_score: i64,
    pub risk_level: RiskLevel,
}

impl Student {
    pub const DEFAULT_GPA: f64 = 0.0;
    pub const DEFAULT_SEMESTER: i64 = 1;
    pub const DEFAULT_SUCCESS_SCORE: i64 = 75;

    /// Creates an unsaved student carrying every declared default.
    pub fn blank(enrollment_date: NaiveDateTime) -> Self {
        Self {
            id: None,
            student_id: None,
            first_name: None,
            last_name: None,
            email: None,
            mobile_number: None,
            status: StudentStatus::default(),
            gpa: Self::DEFAULT_GPA,
            semester: Self::DEFAULT_SEMESTER,
            enrollment_date,
            major: None,
            success_score: Self::DEFAULT_SUCCESS_SCORE,
            risk_level: RiskLevel::default(),
        }
    }

    /// Department name used for roster membership, if any.
    pub fn major_name(&self) -> Option<&str> {
        self.major.as_ref().map(|major| major.name.as_str())
    }
}
