//! Grade upsert use-case.
//!
//! # Invariants
//! - Grades are matched by surrogate id only; every other request creates a
//!   new row (retakes are separate rows).
//! - A named student or course must already exist; otherwise the whole call
//!   fails and nothing is written.

use crate::model::grade::Grade;
use crate::model::RecordId;
use crate::repo::course_repo::CourseRepository;
use crate::repo::grade_repo::GradeRepository;
use crate::repo::normalize_key;
use crate::repo::student_repo::StudentRepository;
use crate::service::{ServiceError, ServiceResult};
use log::{error, info};

/// Flat write request for a grade.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeUpsertRequest {
    pub id: Option<RecordId>,
    /// Student natural key.
    pub student_id: Option<String>,
    pub course_code: Option<String>,
    pub grade: Option<String>,
    pub marks: Option<i64>,
    pub semester: Option<i64>,
}

/// Grade use-case service.
pub struct GradeService<G: GradeRepository, S: StudentRepository, C: CourseRepository> {
    grades: G,
    students: S,
    courses: C,
}

impl<G: GradeRepository, S: StudentRepository, C: CourseRepository> GradeService<G, S, C> {
    pub fn new(grades: G, students: S, courses: C) -> Self {
        Self {
            grades,
            students,
            courses,
        }
    }

    /// Creates or updates a grade row.
    ///
    /// # Errors
    /// - [`ServiceError::StudentNotFound`] / [`ServiceError::CourseNotFound`]
    ///   when a provided natural key does not resolve.
    pub fn upsert_grade(&self, request: &GradeUpsertRequest) -> ServiceResult<Grade> {
        self.upsert_grade_inner(request).inspect_err(|err| {
            error!("event=grade_upsert module=service status=error error={err}");
        })
    }

    fn upsert_grade_inner(&self, request: &GradeUpsertRequest) -> ServiceResult<Grade> {
        let mut grade = match request.id {
            Some(id) => self.grades.find_by_id(id)?.unwrap_or_default(),
            None => Grade::default(),
        };

        grade.grade = request.grade.clone();
        grade.marks = request.marks;
        grade.semester = request.semester;

        if let Some(student_id) = normalize_key(request.student_id.as_deref()) {
            let student = self
                .students
                .find_by_student_id(&student_id)?
                .ok_or(ServiceError::StudentNotFound(student_id))?;
            grade.student_record_id = student.id;
        }

        if let Some(code) = normalize_key(request.course_code.as_deref()) {
            let course = self
                .courses
                .find_by_code(&code)?
                .ok_or(ServiceError::CourseNotFound(code))?;
            grade.course_id = course.id;
        }

        let id = self.grades.save_grade(&grade)?;
        let saved = self
            .grades
            .find_by_id(id)?
            .ok_or(ServiceError::InconsistentState(
                "saved grade not found in read-back",
            ))?;
        info!(
            "event=grade_upsert module=service status=ok id={} student_record_id={:?} course_id={:?}",
            id, saved.student_record_id, saved.course_id
        );
        Ok(saved)
    }

    /// All grades of the student with natural key `student_id`.
    pub fn grades_for_student(&self, student_id: &str) -> ServiceResult<Vec<Grade>> {
        let student_id = student_id.trim();
        let student = self
            .students
            .find_by_student_id(student_id)?
            .ok_or_else(|| ServiceError::StudentNotFound(student_id.to_string()))?;
        let Some(student_record_id) = student.id else {
            return Err(ServiceError::InconsistentState("stored student without id"));
        };
        Ok(self.grades.list_by_student(student_record_id)?)
    }
}
