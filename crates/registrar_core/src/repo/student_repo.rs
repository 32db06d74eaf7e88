//! Student repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Lookups by surrogate id, natural key (`student_id`) and email.
//! - Population query used by roster synthesis.
//!
//! # Invariants
//! - `student_id` and `email` are stored as `NULL` when blank, so uniqueness
//!   only applies to real values.
//! - Population queries order by surrogate id for a stable roster order.

use crate::model::department::Department;
use crate::model::student::{RiskLevel, Student, StudentStatus};
use crate::model::RecordId;
use crate::repo::{
    datetime_to_db, ensure_connection_ready, normalize_key, parse_datetime, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, params_from_iter, Connection, Row};

const STUDENT_SELECT_SQL: &str = "SELECT
    s.id,
    s.student_id,
    s.first_name,
    s.last_name,
    s.email,
    s.mobile_number,
    s.status,
    s.gpa,
    s.semester,
    s.enrollment_date,
    s.success_score,
    s.risk_level,
    d.id AS major_dept_id,
    d.name AS major_name,
    d.code AS major_code
FROM students s
LEFT JOIN departments d ON d.id = s.major_id";

/// Repository interface for student records.
pub trait StudentRepository {
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Student>>;
    fn find_by_student_id(&self, student_id: &str) -> RepoResult<Option<Student>>;
    fn find_by_email(&self, email: &str) -> RepoResult<Option<Student>>;
    /// Inserts or updates by surrogate id and returns the row id.
    fn save_student(&self, student: &Student) -> RepoResult<RecordId>;
    /// Students whose major is named `major_name` in `semester`.
    fn find_by_major_name_and_semester(
        &self,
        major_name: &str,
        semester: i64,
    ) -> RepoResult<Vec<Student>>;
    fn list_by_risk_levels(&self, levels: &[RiskLevel]) -> RepoResult<Vec<Student>>;
}

/// SQLite-backed student repository.
pub struct SqliteStudentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStudentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_one(&self, predicate: &str, value: Value) -> RepoResult<Option<Student>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{STUDENT_SELECT_SQL} WHERE {predicate};"))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_student_row(row)?));
        }
        Ok(None)
    }

    fn query_many(&self, sql: &str, bind_values: Vec<Value>) -> RepoResult<Vec<Student>> {
        let mut stmt = self.conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(bind_values))?;
        let mut students = Vec::new();
        while let Some(row) = rows.next()? {
            students.push(parse_student_row(row)?);
        }
        Ok(students)
    }
}

impl StudentRepository for SqliteStudentRepository<'_> {
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Student>> {
        self.query_one("s.id = ?1", Value::Integer(id))
    }

    fn find_by_student_id(&self, student_id: &str) -> RepoResult<Option<Student>> {
        self.query_one("s.student_id = ?1", Value::Text(student_id.to_string()))
    }

    fn find_by_email(&self, email: &str) -> RepoResult<Option<Student>> {
        self.query_one("s.email = ?1", Value::Text(email.to_string()))
    }

    fn save_student(&self, student: &Student) -> RepoResult<RecordId> {
        let student_id = normalize_key(student.student_id.as_deref());
        let email = normalize_key(student.email.as_deref());
        let major_id = student.major.as_ref().map(|major| major.id);

        let Some(id) = student.id else {
            self.conn.execute(
                "INSERT INTO students (
                    student_id,
                    first_name,
                    last_name,
                    email,
                    mobile_number,
                    status,
                    gpa,
                    semester,
                    enrollment_date,
                    major_id,
                    success_score,
                    risk_level
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12);",
                params![
                    student_id,
                    student.first_name.as_deref(),
                    student.last_name.as_deref(),
                    email,
                    student.mobile_number.as_deref(),
                    student_status_to_db(student.status),
                    student.gpa,
                    student.semester,
                    datetime_to_db(student.enrollment_date),
                    major_id,
                    student.success_score,
                    risk_level_to_db(student.risk_level),
                ],
            )?;
            return Ok(self.conn.last_insert_rowid());
        };

        let changed = self.conn.execute(
            "UPDATE students
             SET
                student_id = ?1,
                first_name = ?2,
                last_name = ?3,
                email = ?4,
                mobile_number = ?5,
                status = ?6,
                gpa = ?7,
                semester = ?8,
                enrollment_date = ?9,
                major_id = ?10,
                success_score = ?11,
                risk_level = ?12
             WHERE id = ?13;",
            params![
                student_id,
                student.first_name.as_deref(),
                student.last_name.as_deref(),
                email,
                student.mobile_number.as_deref(),
                student_status_to_db(student.status),
                student.gpa,
                student.semester,
                datetime_to_db(student.enrollment_date),
                major_id,
                student.success_score,
                risk_level_to_db(student.risk_level),
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "students",
                id,
            });
        }
        Ok(id)
    }

    fn find_by_major_name_and_semester(
        &self,
        major_name: &str,
        semester: i64,
    ) -> RepoResult<Vec<Student>> {
        self.query_many(
            &format!("{STUDENT_SELECT_SQL} WHERE d.name = ?1 AND s.semester = ?2 ORDER BY s.id ASC;"),
            vec![Value::Text(major_name.to_string()), Value::Integer(semester)],
        )
    }

    fn list_by_risk_levels(&self, levels: &[RiskLevel]) -> RepoResult<Vec<Student>> {
        if levels.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; levels.len()].join(", ");
        let bind_values = levels
            .iter()
            .map(|level| Value::Text(risk_level_to_db(*level).to_string()))
            .collect();
        self.query_many(
            &format!(
                "{STUDENT_SELECT_SQL} WHERE s.risk_level IN ({placeholders}) ORDER BY s.id ASC;"
            ),
            bind_values,
        )
    }
}

fn parse_student_row(row: &Row<'_>) -> RepoResult<Student> {
    let status_text: String = row.get("status")?;
    let status = parse_student_status(&status_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid student status `{status_text}` in students.status"))
    })?;

    let risk_text: String = row.get("risk_level")?;
    let risk_level = parse_risk_level(&risk_text).ok_or_else(|| {
        RepoError::InvalidData(format!("invalid risk level `{risk_text}` in students.risk_level"))
    })?;

    let enrollment_text: String = row.get("enrollment_date")?;
    let enrollment_date = parse_datetime(&enrollment_text, "students.enrollment_date")?;

    let major = match row.get::<_, Option<RecordId>>("major_dept_id")? {
        Some(id) => Some(Department {
            id,
            name: row.get("major_name")?,
            code: row.get("major_code")?,
        }),
        None => None,
    };

    Ok(Student {
        id: Some(row.get("id")?),
        student_id: row.get("student_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        mobile_number: row.get("mobile_number")?,
        status,
        gpa: row.get("gpa")?,
        semester: row.get("semester")?,
        enrollment_date,
        major,
        success_score: row.get("success_score")?,
        risk_level,
    })
}

fn student_status_to_db(status: StudentStatus) -> &'static str {
    match status {
        StudentStatus::Active => "ACTIVE",
        StudentStatus::Inactive => "INACTIVE",
        StudentStatus::Graduated => "GRADUATED",
    }
}

fn parse_student_status(value: &str) -> Option<StudentStatus> {
    match value {
        "ACTIVE" => Some(StudentStatus::Active),
        "INACTIVE" => Some(StudentStatus::Inactive),
        "GRADUATED" => Some(StudentStatus::Graduated),
        _ => None,
    }
}

fn risk_level_to_db(level: RiskLevel) -> &'static str {
    match level {
        RiskLevel::Low => "LOW",
        RiskLevel::Medium => "MEDIUM",
        RiskLevel::High => "HIGH",
    }
}

fn parse_risk_level(value: &str) -> Option<RiskLevel> {
    match value {
        "LOW" => Some(RiskLevel::Low),
        "MEDIUM" => Some(RiskLevel::Medium),
        "HIGH" => Some(RiskLevel::High),
        _ => None,
    }
}
