//! Faculty upsert use-case.
//!
//! # Invariants
//! - Identity cascade: surrogate id, then `employee_id`.
//! - Status defaults to `ACTIVE`; joining date defaults to now.

use crate::model::faculty::Faculty;
use crate::model::RecordId;
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::faculty_repo::FacultyRepository;
use crate::repo::normalize_key;
use crate::service::date_normalizer::parse_date_input;
use crate::service::department_provisioner::resolve_or_create;
use crate::service::identity::{resolve, IdentityKey, IdentityKeys, Resolution};
use crate::service::{ServiceError, ServiceResult};
use log::{error, info};

/// Flat write request for a faculty member.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyUpsertRequest {
    pub id: Option<RecordId>,
    pub employee_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    /// Department name.
    pub department: Option<String>,
    pub designation: Option<String>,
    pub status: Option<String>,
    pub joining_date: Option<String>,
}

/// Faculty use-case service.
pub struct FacultyService<F: FacultyRepository, D: DepartmentRepository> {
    faculty: F,
    departments: D,
}

impl<F: FacultyRepository, D: DepartmentRepository> FacultyService<F, D> {
    pub fn new(faculty: F, departments: D) -> Self {
        Self {
            faculty,
            departments,
        }
    }

    /// Creates or updates the faculty member identified by `request`.
    pub fn upsert_faculty(&self, request: &FacultyUpsertRequest) -> ServiceResult<Faculty> {
        self.upsert_faculty_inner(request).inspect_err(|err| {
            error!("event=faculty_upsert module=service status=error error={err}");
        })
    }

    fn upsert_faculty_inner(&self, request: &FacultyUpsertRequest) -> ServiceResult<Faculty> {
        let keys = IdentityKeys::new(request.id, request.employee_id.as_deref(), None);
        let resolution = resolve(&keys, |key| match key {
            IdentityKey::SurrogateId(id) => self.faculty.find_by_id(id),
            IdentityKey::NaturalKey(employee_id) => self.faculty.find_by_employee_id(employee_id),
            IdentityKey::Email(_) => Ok(None),
        })?;

        let joining_date = parse_date_input(request.joining_date.as_deref()).value();
        let mut faculty = match resolution {
            Resolution::Existing { record, matched_by } => {
                info!(
                    "event=faculty_upsert module=service status=matched matched_by={} id={:?}",
                    matched_by.as_str(),
                    record.id
                );
                record
            }
            Resolution::New => Faculty::blank(joining_date),
        };

        if let Some(employee_id) = normalize_key(request.employee_id.as_deref()) {
            faculty.employee_id = Some(employee_id);
        }
        if let Some(email) = normalize_key(request.email.as_deref()) {
            faculty.email = Some(email);
        }
        faculty.first_name = request.first_name.clone();
        faculty.last_name = request.last_name.clone();
        faculty.mobile_number = request.mobile_number.clone();
        faculty.designation = request.designation.clone();
        faculty.status = normalize_key(request.status.as_deref())
            .unwrap_or_else(|| Faculty::DEFAULT_STATUS.to_string());
        faculty.joining_date = joining_date;

        if let Some(department) =
            resolve_or_create(&self.departments, request.department.as_deref())?
        {
            faculty.department = Some(department);
        }

        let id = self.faculty.save_faculty(&faculty)?;
        let saved = self
            .faculty
            .find_by_id(id)?
            .ok_or(ServiceError::InconsistentState(
                "saved faculty not found in read-back",
            ))?;
        info!("event=faculty_upsert module=service status=ok id={id}");
        Ok(saved)
    }

    /// Gets one faculty member by surrogate id.
    pub fn get_faculty(&self, id: RecordId) -> ServiceResult<Option<Faculty>> {
        Ok(self.faculty.find_by_id(id)?)
    }
}
