//! Course repository contracts and SQLite implementation.

use crate::model::course::Course;
use crate::model::department::Department;
use crate::model::RecordId;
use crate::repo::{ensure_connection_ready, normalize_key, RepoError, RepoResult};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};

const COURSE_SELECT_SQL: &str = "SELECT
    c.id,
    c.code,
    c.name,
    c.credits,
    c.instructor,
    c.capacity,
    c.student_count,
    c.semester,
    d.id AS dept_id,
    d.name AS dept_name,
    d.code AS dept_code
FROM courses c
LEFT JOIN departments d ON d.id = c.department_id";

/// Repository interface for course records.
pub trait CourseRepository {
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Course>>;
    fn find_by_code(&self, code: &str) -> RepoResult<Option<Course>>;
    /// Inserts or updates by surrogate id and returns the row id.
    fn save_course(&self, course: &Course) -> RepoResult<RecordId>;
}

/// SQLite-backed course repository.
pub struct SqliteCourseRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCourseRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_one(&self, predicate: &str, value: Value) -> RepoResult<Option<Course>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{COURSE_SELECT_SQL} WHERE {predicate};"))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_course_row(row)?));
        }
        Ok(None)
    }
}

impl CourseRepository for SqliteCourseRepository<'_> {
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Course>> {
        self.query_one("c.id = ?1", Value::Integer(id))
    }

    fn find_by_code(&self, code: &str) -> RepoResult<Option<Course>> {
        self.query_one("c.code = ?1", Value::Text(code.to_string()))
    }

    fn save_course(&self, course: &Course) -> RepoResult<RecordId> {
        let code = normalize_key(course.code.as_deref());
        let department_id = course.department.as_ref().map(|department| department.id);

        let Some(id) = course.id else {
            self.conn.execute(
                "INSERT INTO courses (
                    code,
                    name,
                    department_id,
                    credits,
                    instructor,
                    capacity,
                    student_count,
                    semester
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
                params![
                    code,
                    course.name.as_deref(),
                    department_id,
                    course.credits,
                    course.instructor.as_deref(),
                    course.capacity,
                    course.student_count,
                    course.semester,
                ],
            )?;
            return Ok(self.conn.last_insert_rowid());
        };

        let changed = self.conn.execute(
            "UPDATE courses
             SET
                code = ?1,
                name = ?2,
                department_id = ?3,
                credits = ?4,
                instructor = ?5,
                capacity = ?6,
                student_count = ?7,
                semester = ?8
             WHERE id = ?9;",
            params![
                code,
                course.name.as_deref(),
                department_id,
                course.credits,
                course.instructor.as_deref(),
                course.capacity,
                course.student_count,
                course.semester,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "courses",
                id,
            });
        }
        Ok(id)
    }
}

fn parse_course_row(row: &Row<'_>) -> RepoResult<Course> {
    let department = match row.get::<_, Option<RecordId>>("dept_id")? {
        Some(id) => Some(Department {
            id,
            name: row.get("dept_name")?,
            code: row.get("dept_code")?,
        }),
        None => None,
    };

    Ok(Course {
        id: Some(row.get("id")?),
        code: row.get("code")?,
        name: row.get("name")?,
        department,
        credits: row.get("credits")?,
        instructor: row.get("instructor")?,
        capacity: row.get("capacity")?,
        student_count: row.get("student_count")?,
        semester: row.get("semester")?,
    })
}
