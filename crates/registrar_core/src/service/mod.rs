//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate identity resolution, department provisioning and date
//!   normalization into single-row upserts.
//! - Synthesize attendance rosters from the expected population.
//! - Keep transport layers decoupled from storage details.
//!
//! # Invariants
//! - Every upsert ends in exactly one row write for its primary entity; a
//!   department row may be created as a side effect.
//! - Persistence failures propagate unchanged; services never retry.

use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod attendance_service;
pub mod course_service;
pub mod dashboard_service;
pub mod date_normalizer;
pub mod department_provisioner;
pub mod faculty_service;
pub mod grade_service;
pub mod identity;
pub mod notification_service;
pub mod student_service;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service error for record use-cases.
#[derive(Debug)]
pub enum ServiceError {
    /// No student carries the given natural key.
    StudentNotFound(String),
    /// No course carries the given code.
    CourseNotFound(String),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::StudentNotFound(student_id) => write!(f, "student not found: `{student_id}`"),
            Self::CourseNotFound(code) => write!(f, "course not found: `{code}`"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent record state: {details}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}
