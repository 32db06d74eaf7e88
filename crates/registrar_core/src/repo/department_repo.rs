//! Department repository contracts and SQLite implementation.
//!
//! # Invariants
//! - `name` is unique; `code` is indexed but may repeat.
//! - `insert_if_absent` never creates a second row for an existing name.

use crate::model::department::Department;
use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const DEPARTMENT_SELECT_SQL: &str = "SELECT id, name, code FROM departments";

/// Repository interface for department reference data.
pub trait DepartmentRepository {
    /// Exact, case-sensitive match on `name`.
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Department>>;
    fn code_exists(&self, code: &str) -> RepoResult<bool>;
    /// Inserts `(name, code)` unless `name` already exists, then returns the
    /// stored row for `name` (which keeps its original code on conflict).
    fn insert_if_absent(&self, name: &str, code: &str) -> RepoResult<Department>;
}

/// SQLite-backed department repository.
pub struct SqliteDepartmentRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepartmentRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl DepartmentRepository for SqliteDepartmentRepository<'_> {
    fn find_by_name(&self, name: &str) -> RepoResult<Option<Department>> {
        let department = self
            .conn
            .query_row(
                &format!("{DEPARTMENT_SELECT_SQL} WHERE name = ?1;"),
                [name],
                parse_department_row,
            )
            .optional()?;
        Ok(department)
    }

    fn code_exists(&self, code: &str) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM departments WHERE code = ?1);",
            [code],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn insert_if_absent(&self, name: &str, code: &str) -> RepoResult<Department> {
        self.conn.execute(
            "INSERT INTO departments (name, code)
             VALUES (?1, ?2)
             ON CONFLICT (name) DO NOTHING;",
            params![name, code],
        )?;

        let department = self.conn.query_row(
            &format!("{DEPARTMENT_SELECT_SQL} WHERE name = ?1;"),
            [name],
            parse_department_row,
        )?;
        Ok(department)
    }
}

/// Decodes a `departments` row.
fn parse_department_row(row: &Row<'_>) -> rusqlite::Result<Department> {
    Ok(Department {
        id: row.get("id")?,
        name: row.get("name")?,
        code: row.get("code")?,
    })
}
