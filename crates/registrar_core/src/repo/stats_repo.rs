//! Aggregate queries backing the dashboard.

use crate::repo::{ensure_connection_ready, RepoResult};
use rusqlite::Connection;
use serde::Serialize;

/// Student head count for one department.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DepartmentHeadCount {
    pub department_name: String,
    pub students: i64,
}

/// Repository interface for read-only aggregates.
pub trait StatsRepository {
    fn count_students(&self) -> RepoResult<i64>;
    fn count_courses(&self) -> RepoResult<i64>;
    fn count_faculty_with_status(&self, status: &str) -> RepoResult<i64>;
    /// Mean GPA over all students, `None` when there are none.
    fn average_gpa(&self) -> RepoResult<Option<f64>>;
    /// Every department with its student count, ordered by name.
    fn students_per_department(&self) -> RepoResult<Vec<DepartmentHeadCount>>;
}

/// SQLite-backed aggregate queries.
pub struct SqliteStatsRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteStatsRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl StatsRepository for SqliteStatsRepository<'_> {
    fn count_students(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM students;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_courses(&self) -> RepoResult<i64> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM courses;", [], |row| row.get(0))?;
        Ok(count)
    }

    fn count_faculty_with_status(&self, status: &str) -> RepoResult<i64> {
        let count = self.conn.query_row(
            "SELECT COUNT(*) FROM faculty WHERE status = ?1;",
            [status],
            |row| row.get(0),
        )?;
        Ok(count)
    }

    fn average_gpa(&self) -> RepoResult<Option<f64>> {
        let average = self
            .conn
            .query_row("SELECT AVG(gpa) FROM students;", [], |row| row.get(0))?;
        Ok(average)
    }

    fn students_per_department(&self) -> RepoResult<Vec<DepartmentHeadCount>> {
        let mut stmt = self.conn.prepare(
            "SELECT d.name, COUNT(s.id)
             FROM departments d
             LEFT JOIN students s ON s.major_id = d.id
             GROUP BY d.id, d.name
             ORDER BY d.name ASC;",
        )?;
        let counts = stmt
            .query_map([], |row| {
                Ok(DepartmentHeadCount {
                    department_name: row.get(0)?,
                    students: row.get(1)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(counts)
    }
}
