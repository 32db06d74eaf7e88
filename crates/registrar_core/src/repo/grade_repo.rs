//! Grade repository contracts and SQLite implementation.

use crate::model::grade::Grade;
use crate::model::RecordId;
use crate::repo::{ensure_connection_ready, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const GRADE_SELECT_SQL: &str = "SELECT
    id,
    student_record_id,
    course_id,
    grade,
    marks,
    semester
FROM grades";

/// Repository interface for grade rows.
pub trait GradeRepository {
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Grade>>;
    /// Inserts or updates by surrogate id and returns the row id.
    fn save_grade(&self, grade: &Grade) -> RepoResult<RecordId>;
    /// All grade rows of one student, oldest first.
    fn list_by_student(&self, student_record_id: RecordId) -> RepoResult<Vec<Grade>>;
}

/// SQLite-backed grade repository.
pub struct SqliteGradeRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteGradeRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl GradeRepository for SqliteGradeRepository<'_> {
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Grade>> {
        let grade = self
            .conn
            .query_row(
                &format!("{GRADE_SELECT_SQL} WHERE id = ?1;"),
                [id],
                parse_grade_row,
            )
            .optional()?;
        Ok(grade)
    }

    fn save_grade(&self, grade: &Grade) -> RepoResult<RecordId> {
        let Some(id) = grade.id else {
            self.conn.execute(
                "INSERT INTO grades (student_record_id, course_id, grade, marks, semester)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    grade.student_record_id,
                    grade.course_id,
                    grade.grade.as_deref(),
                    grade.marks,
                    grade.semester,
                ],
            )?;
            return Ok(self.conn.last_insert_rowid());
        };

        let changed = self.conn.execute(
            "UPDATE grades
             SET
                student_record_id = ?1,
                course_id = ?2,
                grade = ?3,
                marks = ?4,
                semester = ?5
             WHERE id = ?6;",
            params![
                grade.student_record_id,
                grade.course_id,
                grade.grade.as_deref(),
                grade.marks,
                grade.semester,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "grades",
                id,
            });
        }
        Ok(id)
    }

    fn list_by_student(&self, student_record_id: RecordId) -> RepoResult<Vec<Grade>> {
        let mut stmt = self.conn.prepare(&format!(
            "{GRADE_SELECT_SQL} WHERE student_record_id = ?1 ORDER BY id ASC;"
        ))?;
        let grades = stmt
            .query_map([student_record_id], parse_grade_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(grades)
    }
}

fn parse_grade_row(row: &Row<'_>) -> rusqlite::Result<Grade> {
    Ok(Grade {
        id: Some(row.get("id")?),
        student_record_id: row.get("student_record_id")?,
        course_id: row.get("course_id")?,
        grade: row.get("grade")?,
        marks: row.get("marks")?,
        semester: row.get("semester")?,
    })
}
