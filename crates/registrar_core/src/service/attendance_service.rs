//! Attendance roster and marking use-cases.
//!
//! # Responsibility
//! - Build the full roster for `(date, branch, semester)` by merging stored
//!   attendance with the expected student population.
//! - Mark attendance with one row per student and date.
//!
//! # Invariants
//! - A roster has exactly one entry per expected student, in population
//!   order. Students without a stored row get a synthesized `ABSENT` entry.
//! - Stored rows for students outside the population are not listed.
//! - Marking resolves the student by natural key only.

use crate::model::attendance::{Attendance, AttendanceStatus, RosterEntry};
use crate::model::RecordId;
use crate::repo::attendance_repo::AttendanceRepository;
use crate::repo::normalize_key;
use crate::repo::student_repo::StudentRepository;
use crate::service::date_normalizer::parse_date_input;
use crate::service::{ServiceError, ServiceResult};
use chrono::NaiveDate;
use log::{error, info};
use std::collections::HashMap;

/// Write request for marking one student on one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkAttendanceRequest {
    /// Student natural key.
    pub student_id: String,
    /// Any shape accepted by the date normalizer; absent means today.
    pub date: Option<String>,
    pub status: AttendanceStatus,
    pub semester: Option<i64>,
    pub branch: Option<String>,
}

/// Attendance use-case service.
pub struct AttendanceService<A: AttendanceRepository, S: StudentRepository> {
    attendance: A,
    students: S,
}

impl<A: AttendanceRepository, S: StudentRepository> AttendanceService<A, S> {
    pub fn new(attendance: A, students: S) -> Self {
        Self {
            attendance,
            students,
        }
    }

    /// Builds the display roster for one class session.
    pub fn build_roster(
        &self,
        date: NaiveDate,
        branch: &str,
        semester: i64,
    ) -> ServiceResult<Vec<RosterEntry>> {
        let population = self
            .students
            .find_by_major_name_and_semester(branch, semester)?;
        let recorded = self
            .attendance
            .find_by_date_branch_semester(date, branch, semester)?;

        let mut by_student: HashMap<RecordId, Attendance> = recorded
            .into_iter()
            .map(|row| (row.student_record_id, row))
            .collect();

        let mut roster = Vec::with_capacity(population.len());
        let mut synthesized = 0_usize;
        for student in population {
            let stored = student
                .id
                .and_then(|id| by_student.remove(&id))
                .and_then(|row| row.id.map(|attendance_id| (attendance_id, row)));
            let entry = match stored {
                Some((attendance_id, row)) => RosterEntry::recorded(student, &row, attendance_id),
                None => {
                    synthesized += 1;
                    RosterEntry::synthesized(student, date, branch, semester)
                }
            };
            roster.push(entry);
        }

        info!(
            "event=roster_build module=service status=ok date={} semester={} entries={} synthesized={}",
            date,
            semester,
            roster.len(),
            synthesized
        );
        Ok(roster)
    }

    /// Creates or updates the attendance row for `(student, date)`.
    ///
    /// # Errors
    /// - [`ServiceError::StudentNotFound`] when `student_id` does not resolve.
    pub fn mark_attendance(&self, request: &MarkAttendanceRequest) -> ServiceResult<Attendance> {
        self.mark_attendance_inner(request).inspect_err(|err| {
            error!("event=attendance_mark module=service status=error error={err}");
        })
    }

    fn mark_attendance_inner(&self, request: &MarkAttendanceRequest) -> ServiceResult<Attendance> {
        let student_id = normalize_key(Some(request.student_id.as_str()))
            .ok_or_else(|| ServiceError::StudentNotFound(request.student_id.clone()))?;
        let student = self
            .students
            .find_by_student_id(&student_id)?
            .ok_or_else(|| ServiceError::StudentNotFound(student_id.clone()))?;
        let Some(student_record_id) = student.id else {
            return Err(ServiceError::InconsistentState("stored student without id"));
        };

        let date = parse_date_input(request.date.as_deref()).value().date();
        let mut attendance = self
            .attendance
            .find_by_student_and_date(student_record_id, date)?
            .unwrap_or(Attendance {
                id: None,
                student_record_id,
                date,
                status: request.status,
                branch: None,
                semester: None,
            });
        attendance.status = request.status;
        attendance.branch = request.branch.clone();
        attendance.semester = request.semester;

        self.attendance.save_attendance(&attendance)?;
        let saved = self
            .attendance
            .find_by_student_and_date(student_record_id, date)?
            .ok_or(ServiceError::InconsistentState(
                "marked attendance not found in read-back",
            ))?;
        info!(
            "event=attendance_mark module=service status=ok attendance_id={:?} date={}",
            saved.id, date
        );
        Ok(saved)
    }
}
