//! Attendance repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `(student_record_id, date)` is unique; inserting a second row for the
//!   same pair updates the existing one instead.
//! - Roster queries match `branch`/`semester` exactly as stored.

use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::RecordId;
use crate::repo::{date_to_db, ensure_connection_ready, parse_date, RepoError, RepoResult};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};

const ATTENDANCE_SELECT_SQL: &str = "SELECT
    id,
    student_record_id,
    date,
    status,
    branch,
    semester
FROM attendance";

/// Repository interface for attendance rows.
pub trait AttendanceRepository {
    fn find_by_student_and_date(
        &self,
        student_record_id: RecordId,
        date: NaiveDate,
    ) -> RepoResult<Option<Attendance>>;
    fn find_by_date_branch_semester(
        &self,
        date: NaiveDate,
        branch: &str,
        semester: i64,
    ) -> RepoResult<Vec<Attendance>>;
    /// Inserts or updates by surrogate id and returns the row id.
    fn save_attendance(&self, attendance: &Attendance) -> RepoResult<RecordId>;
}

/// SQLite-backed attendance repository.
pub struct SqliteAttendanceRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttendanceRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl AttendanceRepository for SqliteAttendanceRepository<'_> {
    fn find_by_student_and_date(
        &self,
        student_record_id: RecordId,
        date: NaiveDate,
    ) -> RepoResult<Option<Attendance>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ATTENDANCE_SELECT_SQL} WHERE student_record_id = ?1 AND date = ?2;"
        ))?;
        let mut rows = stmt.query(params![student_record_id, date_to_db(date)])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_attendance_row(row)?));
        }
        Ok(None)
    }

    fn find_by_date_branch_semester(
        &self,
        date: NaiveDate,
        branch: &str,
        semester: i64,
    ) -> RepoResult<Vec<Attendance>> {
        let mut stmt = self.conn.prepare(&format!(
            "{ATTENDANCE_SELECT_SQL}
             WHERE date = ?1 AND branch = ?2 AND semester = ?3
             ORDER BY id ASC;"
        ))?;
        let mut rows = stmt.query(params![date_to_db(date), branch, semester])?;
        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_attendance_row(row)?);
        }
        Ok(records)
    }

    fn save_attendance(&self, attendance: &Attendance) -> RepoResult<RecordId> {
        let date = date_to_db(attendance.date);
        let status = attendance_status_to_db(attendance.status);

        let Some(id) = attendance.id else {
            let id = self.conn.query_row(
                "INSERT INTO attendance (student_record_id, date, status, branch, semester)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT (student_record_id, date) DO UPDATE SET
                    status = excluded.status,
                    branch = excluded.branch,
                    semester = excluded.semester
                 RETURNING id;",
                params![
                    attendance.student_record_id,
                    date,
                    status,
                    attendance.branch.as_deref(),
                    attendance.semester,
                ],
                |row| row.get(0),
            )?;
            return Ok(id);
        };

        let changed = self.conn.execute(
            "UPDATE attendance
             SET
                student_record_id = ?1,
                date = ?2,
                status = ?3,
                branch = ?4,
                semester = ?5
             WHERE id = ?6;",
            params![
                attendance.student_record_id,
                date,
                status,
                attendance.branch.as_deref(),
                attendance.semester,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "attendance",
                id,
            });
        }
        Ok(id)
    }
}

fn parse_attendance_row(row: &Row<'_>) -> RepoResult<Attendance> {
    let status_text: String = row.get("status")?;
    let status = parse_attendance_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid attendance status `{status_text}` in attendance.status"
        ))
    })?;
    let date_text: String = row.get("date")?;

    Ok(Attendance {
        id: Some(row.get("id")?),
        student_record_id: row.get("student_record_id")?,
        date: parse_date(&date_text, "attendance.date")?,
        status,
        branch: row.get("branch")?,
        semester: row.get("semester")?,
    })
}

fn attendance_status_to_db(status: AttendanceStatus) -> &'static str {
    match status {
        AttendanceStatus::Present => "PRESENT",
        AttendanceStatus::Absent => "ABSENT",
        AttendanceStatus::Late => "LATE",
    }
}

fn parse_attendance_status(value: &str) -> Option<AttendanceStatus> {
    match value {
        "PRESENT" => Some(AttendanceStatus::Present),
        "ABSENT" => Some(AttendanceStatus::Absent),
        "LATE" => Some(AttendanceStatus::Late),
        _ => None,
    }
}
