//! Faculty repository contracts and SQLite implementation.

use crate::model::department::Department;
use crate::model::faculty::Faculty;
use crate::model::RecordId;
use crate::repo::{
    datetime_to_db, ensure_connection_ready, normalize_key, parse_datetime, RepoError, RepoResult,
};
use rusqlite::types::Value;
use rusqlite::{params, Connection, Row};

const FACULTY_SELECT_SQL: &str = "SELECT
    f.id,
    f.employee_id,
    f.first_name,
    f.last_name,
    f.email,
    f.mobile_number,
    f.designation,
    f.status,
    f.joining_date,
    d.id AS dept_id,
    d.name AS dept_name,
    d.code AS dept_code
FROM faculty f
LEFT JOIN departments d ON d.id = f.department_id";

/// Repository interface for faculty records.
pub trait FacultyRepository {
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Faculty>>;
    fn find_by_employee_id(&self, employee_id: &str) -> RepoResult<Option<Faculty>>;
    /// Inserts or updates by surrogate id and returns the row id.
    fn save_faculty(&self, faculty: &Faculty) -> RepoResult<RecordId>;
}

/// SQLite-backed faculty repository.
pub struct SqliteFacultyRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteFacultyRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }

    fn query_one(&self, predicate: &str, value: Value) -> RepoResult<Option<Faculty>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{FACULTY_SELECT_SQL} WHERE {predicate};"))?;
        let mut rows = stmt.query([value])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_faculty_row(row)?));
        }
        Ok(None)
    }
}

impl FacultyRepository for SqliteFacultyRepository<'_> {
    fn find_by_id(&self, id: RecordId) -> RepoResult<Option<Faculty>> {
        self.query_one("f.id = ?1", Value::Integer(id))
    }

    fn find_by_employee_id(&self, employee_id: &str) -> RepoResult<Option<Faculty>> {
        self.query_one("f.employee_id = ?1", Value::Text(employee_id.to_string()))
    }

    fn save_faculty(&self, faculty: &Faculty) -> RepoResult<RecordId> {
        let employee_id = normalize_key(faculty.employee_id.as_deref());
        let email = normalize_key(faculty.email.as_deref());
        let department_id = faculty.department.as_ref().map(|department| department.id);
        let joining_date = datetime_to_db(faculty.joining_date);

        let Some(id) = faculty.id else {
            self.conn.execute(
                "INSERT INTO faculty (
                    employee_id,
                    first_name,
                    last_name,
                    email,
                    mobile_number,
                    department_id,
                    designation,
                    status,
                    joining_date
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9);",
                params![
                    employee_id,
                    faculty.first_name.as_deref(),
                    faculty.last_name.as_deref(),
                    email,
                    faculty.mobile_number.as_deref(),
                    department_id,
                    faculty.designation.as_deref(),
                    faculty.status.as_str(),
                    joining_date,
                ],
            )?;
            return Ok(self.conn.last_insert_rowid());
        };

        let changed = self.conn.execute(
            "UPDATE faculty
             SET
                employee_id = ?1,
                first_name = ?2,
                last_name = ?3,
                email = ?4,
                mobile_number = ?5,
                department_id = ?6,
                designation = ?7,
                status = ?8,
                joining_date = ?9
             WHERE id = ?10;",
            params![
                employee_id,
                faculty.first_name.as_deref(),
                faculty.last_name.as_deref(),
                email,
                faculty.mobile_number.as_deref(),
                department_id,
                faculty.designation.as_deref(),
                faculty.status.as_str(),
                joining_date,
                id,
            ],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                table: "faculty",
                id,
            });
        }
        Ok(id)
    }
}

fn parse_faculty_row(row: &Row<'_>) -> RepoResult<Faculty> {
    let joining_text: String = row.get("joining_date")?;
    let department = match row.get::<_, Option<RecordId>>("dept_id")? {
        Some(id) => Some(Department {
            id,
            name: row.get("dept_name")?,
            code: row.get("dept_code")?,
        }),
        None => None,
    };

    Ok(Faculty {
        id: Some(row.get("id")?),
        employee_id: row.get("employee_id")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        email: row.get("email")?,
        mobile_number: row.get("mobile_number")?,
        department,
        designation: row.get("designation")?,
        status: row.get("status")?,
        joining_date: parse_datetime(&joining_text, "faculty.joining_date")?,
    })
}
