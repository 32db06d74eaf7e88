//! Dashboard aggregates.

use crate::model::faculty::Faculty;
use crate::repo::stats_repo::{DepartmentHeadCount, StatsRepository};
use crate::service::ServiceResult;
use serde::Serialize;

/// Headline counts for the landing dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_students: i64,
    pub total_courses: i64,
    /// Faculty whose status is exactly `ACTIVE`.
    pub active_faculty: i64,
    /// `0.0` when no students exist.
    pub average_gpa: f64,
    /// Per-department student counts, ordered by department name.
    pub branch_distribution: Vec<DepartmentHeadCount>,
}

pub struct DashboardService<R: StatsRepository> {
    repo: R,
}

impl<R: StatsRepository> DashboardService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    pub fn stats(&self) -> ServiceResult<DashboardStats> {
        Ok(DashboardStats {
            total_students: self.repo.count_students()?,
            total_courses: self.repo.count_courses()?,
            active_faculty: self
                .repo
                .count_faculty_with_status(Faculty::DEFAULT_STATUS)?,
            average_gpa: self.repo.average_gpa()?.unwrap_or(0.0),
            branch_distribution: self.repo.students_per_department()?,
        })
    }
}
