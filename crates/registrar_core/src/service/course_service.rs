//! Course upsert use-case.
//!
//! # Invariants
//! - Identity cascade: surrogate id, then course `code`.
//! - `student_count` defaults to `0`.

use crate::model::course::Course;
use crate::model::RecordId;
use crate::repo::course_repo::CourseRepository;
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::normalize_key;
use crate::service::department_provisioner::resolve_or_create;
use crate::service::identity::{resolve, IdentityKey, IdentityKeys, Resolution};
use crate::service::{ServiceError, ServiceResult};
use log::{error, info};

/// Flat write request for a course.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CourseUpsertRequest {
    pub id: Option<RecordId>,
    pub code: Option<String>,
    pub name: Option<String>,
    /// Department name.
    pub department: Option<String>,
    pub credits: Option<i64>,
    pub instructor: Option<String>,
    pub capacity: Option<i64>,
    pub student_count: Option<i64>,
    pub semester: Option<i64>,
}

/// Course use-case service.
pub struct CourseService<C: CourseRepository, D: DepartmentRepository> {
    courses: C,
    departments: D,
}

impl<C: CourseRepository, D: DepartmentRepository> CourseService<C, D> {
    pub fn new(courses: C, departments: D) -> Self {
        Self {
            courses,
            departments,
        }
    }

    /// Creates or updates the course identified by `request`.
    pub fn upsert_course(&self, request: &CourseUpsertRequest) -> ServiceResult<Course> {
        self.upsert_course_inner(request).inspect_err(|err| {
            error!("event=course_upsert module=service status=error error={err}");
        })
    }

    fn upsert_course_inner(&self, request: &CourseUpsertRequest) -> ServiceResult<Course> {
        let keys = IdentityKeys::new(request.id, request.code.as_deref(), None);
        let resolution = resolve(&keys, |key| match key {
            IdentityKey::SurrogateId(id) => self.courses.find_by_id(id),
            IdentityKey::NaturalKey(code) => self.courses.find_by_code(code),
            IdentityKey::Email(_) => Ok(None),
        })?;

        let mut course = match resolution {
            Resolution::Existing { record, matched_by } => {
                info!(
                    "event=course_upsert module=service status=matched matched_by={} id={:?}",
                    matched_by.as_str(),
                    record.id
                );
                record
            }
            Resolution::New => Course::default(),
        };

        if let Some(code) = normalize_key(request.code.as_deref()) {
            course.code = Some(code);
        }
        course.name = request.name.clone();
        course.credits = request.credits;
        course.instructor = request.instructor.clone();
        course.capacity = request.capacity;
        course.student_count = request.student_count.unwrap_or(0);
        course.semester = request.semester;

        if let Some(department) =
            resolve_or_create(&self.departments, request.department.as_deref())?
        {
            course.department = Some(department);
        }

        let id = self.courses.save_course(&course)?;
        let saved = self
            .courses
            .find_by_id(id)?
            .ok_or(ServiceError::InconsistentState(
                "saved course not found in read-back",
            ))?;
        info!("event=course_upsert module=service status=ok id={id}");
        Ok(saved)
    }

    /// Gets one course by catalog code.
    pub fn get_course_by_code(&self, code: &str) -> ServiceResult<Option<Course>> {
        Ok(self.courses.find_by_code(code.trim())?)
    }
}
