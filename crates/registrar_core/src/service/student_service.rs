//! Student upsert use-case.
//!
//! # Responsibility
//! - Turn a flat student write request into one persisted student row.
//! - Provision the named major department on first use.
//!
//! # Invariants
//! - Identity cascade: surrogate id, then `student_id`, then `email`.
//! - Absent scalar fields take their declared defaults; absent identity keys
//!   keep the values already stored on the matched record.
//! - An absent major leaves the current association untouched.
//! - A non-finite GPA is treated as absent.

use crate::model::student::{RiskLevel, Student, StudentStatus};
use crate::model::RecordId;
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::normalize_key;
use crate::repo::student_repo::StudentRepository;
use crate::service::date_normalizer::parse_date_input;
use crate::service::department_provisioner::resolve_or_create;
use crate::service::identity::{resolve, IdentityKey, IdentityKeys, Resolution};
use crate::service::{ServiceError, ServiceResult};
use log::{error, info};

/// Flat write request for a student.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentUpsertRequest {
    pub id: Option<RecordId>,
    pub student_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    /// Department name.
    pub major: Option<String>,
    pub semester: Option<i64>,
    pub status: Option<StudentStatus>,
    pub gpa: Option<f64>,
    pub success_score: Option<i64>,
    pub risk_level: Option<RiskLevel>,
    /// Any shape accepted by the date normalizer.
    pub enrollment_date: Option<String>,
}

/// Student use-case service.
pub struct StudentService<S: StudentRepository, D: DepartmentRepository> {
    students: S,
    departments: D,
}

impl<S: StudentRepository, D: DepartmentRepository> StudentService<S, D> {
    pub fn new(students: S, departments: D) -> Self {
        Self {
            students,
            departments,
        }
    }

    /// Creates or updates the student identified by `request`.
    ///
    /// # Side effects
    /// - May insert a department row for a previously unseen major.
    pub fn upsert_student(&self, request: &StudentUpsertRequest) -> ServiceResult<Student> {
        self.upsert_student_inner(request).inspect_err(|err| {
            error!("event=student_upsert module=service status=error error={err}");
        })
    }

    fn upsert_student_inner(&self, request: &StudentUpsertRequest) -> ServiceResult<Student> {
        let keys = IdentityKeys::new(
            request.id,
            request.student_id.as_deref(),
            request.email.as_deref(),
        );
        let resolution = resolve(&keys, |key| match key {
            IdentityKey::SurrogateId(id) => self.students.find_by_id(id),
            IdentityKey::NaturalKey(student_id) => self.students.find_by_student_id(student_id),
            IdentityKey::Email(email) => self.students.find_by_email(email),
        })?;

        let enrollment_date = parse_date_input(request.enrollment_date.as_deref());
        let mut student = match resolution {
            Resolution::Existing { record, matched_by } => {
                info!(
                    "event=student_upsert module=service status=matched matched_by={} id={:?}",
                    matched_by.as_str(),
                    record.id
                );
                record
            }
            Resolution::New => {
                info!("event=student_upsert module=service status=new");
                Student::blank(enrollment_date.value())
            }
        };

        if let Some(student_id) = normalize_key(request.student_id.as_deref()) {
            student.student_id = Some(student_id);
        }
        if let Some(email) = normalize_key(request.email.as_deref()) {
            student.email = Some(email);
        }
        student.first_name = request.first_name.clone();
        student.last_name = request.last_name.clone();
        student.mobile_number = request.mobile_number.clone();
        student.status = request.status.unwrap_or_default();
        student.gpa = request
            .gpa
            .filter(|gpa| gpa.is_finite())
            .unwrap_or(Student::DEFAULT_GPA);
        student.semester = request.semester.unwrap_or(Student::DEFAULT_SEMESTER);
        student.success_score = request
            .success_score
            .unwrap_or(Student::DEFAULT_SUCCESS_SCORE);
        student.risk_level = request.risk_level.unwrap_or_default();
        student.enrollment_date = enrollment_date.value();

        if let Some(major) = resolve_or_create(&self.departments, request.major.as_deref())? {
            student.major = Some(major);
        }

        let id = self.students.save_student(&student)?;
        let saved = self
            .students
            .find_by_id(id)?
            .ok_or(ServiceError::InconsistentState(
                "saved student not found in read-back",
            ))?;
        info!(
            "event=student_upsert module=service status=ok id={} defaulted_date={}",
            id,
            enrollment_date.is_defaulted()
        );
        Ok(saved)
    }

    /// Gets one student by surrogate id.
    pub fn get_student(&self, id: RecordId) -> ServiceResult<Option<Student>> {
        Ok(self.students.find_by_id(id)?)
    }

    /// Students flagged `HIGH` or `MEDIUM` risk, by id.
    pub fn at_risk_students(&self) -> ServiceResult<Vec<Student>> {
        Ok(self
            .students
            .list_by_risk_levels(&[RiskLevel::High, RiskLevel::Medium])?)
    }
}
