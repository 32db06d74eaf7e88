//! Attendance record and roster projection.
//!
//! # Invariants
//! - At most one attendance row exists per `(student_record_id, date)`.
//! - A [`RosterEntry`] that was synthesized has no attendance id and must not
//!   be written back directly; marking goes through the attendance service.

use super::student::Student;
use super::RecordId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    Absent,
    Late,
}

/// Persisted attendance row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: Option<RecordId>,
    pub student_record_id: RecordId,
    pub date: NaiveDate,
    pub status: AttendanceStatus,
    /// Denormalized department name, used for roster filtering.
    pub branch: Option<String>,
    pub semester: Option<i64>,
}

/// Where a roster line came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "origin", rename_all = "snake_case")]
pub enum RosterOrigin {
    /// Backed by a stored attendance row.
    Recorded { attendance_id: RecordId },
    /// No stored row; status is the default-absence policy.
    Synthesized,
}

/// One display line of an attendance roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub student: Student,
    pub date: NaiveDate,
    pub branch: Option<String>,
    pub semester: Option<i64>,
    pub status: AttendanceStatus,
    #[serde(flatten)]
    pub origin: RosterOrigin,
}

impl RosterEntry {
    /// Status applied to expected students without a stored row.
    pub const DEFAULT_STATUS: AttendanceStatus = AttendanceStatus::Absent;

    /// Builds a line from a stored row, keeping its values verbatim.
    pub fn recorded(student: Student, attendance: &Attendance, attendance_id: RecordId) -> Self {
        Self {
            student,
            date: attendance.date,
            branch: attendance.branch.clone(),
            semester: attendance.semester,
            status: attendance.status,
            origin: RosterOrigin::Recorded { attendance_id },
        }
    }

    /// Builds a transient line for a student with no stored row.
    pub fn synthesized(student: Student, date: NaiveDate, branch: &str, semester: i64) -> Self {
        Self {
            student,
            date,
            branch: Some(branch.to_string()),
            semester: Some(semester),
            status: Self::DEFAULT_STATUS,
            origin: RosterOrigin::Synthesized,
        }
    }

    /// Stored attendance id, `None` for synthesized lines.
    pub fn attendance_id(&self) -> Option<RecordId> {
        match self.origin {
            RosterOrigin::Recorded { attendance_id } => Some(attendance_id),
            RosterOrigin::Synthesized => None,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self.origin, RosterOrigin::Synthesized)
    }
}
