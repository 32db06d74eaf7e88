//! Core record-keeping logic for the academic registrar.
//! This crate owns identity reconciliation, department provisioning,
//! date normalization and attendance roster synthesis.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{load_config, parse_config, AppConfig, ConfigError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::attendance::{Attendance, AttendanceStatus, RosterEntry, RosterOrigin};
pub use model::course::Course;
pub use model::department::Department;
pub use model::faculty::Faculty;
pub use model::grade::Grade;
pub use model::notification::{Notification, NotificationKind};
pub use model::student::{RiskLevel, Student, StudentStatus};
pub use model::RecordId;
pub use repo::attendance_repo::{AttendanceRepository, SqliteAttendanceRepository};
pub use repo::course_repo::{CourseRepository, SqliteCourseRepository};
pub use repo::department_repo::{DepartmentRepository, SqliteDepartmentRepository};
pub use repo::faculty_repo::{FacultyRepository, SqliteFacultyRepository};
pub use repo::grade_repo::{GradeRepository, SqliteGradeRepository};
pub use repo::notification_repo::{NotificationRepository, SqliteNotificationRepository};
pub use repo::stats_repo::{DepartmentHeadCount, SqliteStatsRepository, StatsRepository};
pub use repo::student_repo::{SqliteStudentRepository, StudentRepository};
pub use repo::{RepoError, RepoResult};
pub use service::attendance_service::{AttendanceService, MarkAttendanceRequest};
pub use service::course_service::{CourseService, CourseUpsertRequest};
pub use service::dashboard_service::{DashboardService, DashboardStats};
pub use service::date_normalizer::{normalize, parse_date_input, NormalizedDate};
pub use service::department_provisioner::{derive_department_code, resolve_or_create};
pub use service::faculty_service::{FacultyService, FacultyUpsertRequest};
pub use service::grade_service::{GradeService, GradeUpsertRequest};
pub use service::notification_service::NotificationService;
pub use service::student_service::{StudentService, StudentUpsertRequest};
pub use service::{ServiceError, ServiceResult};

/// Minimal health-check API.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
