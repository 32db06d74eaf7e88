//! Faculty record.

use super::department::Department;
use super::RecordId;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Faculty {
    pub id: Option<RecordId>,
    /// Stable external employee code.
    pub employee_id: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub mobile_number: Option<String>,
    pub department: Option<Department>,
    pub designation: Option<String>,
    /// Free-form, e.g. `ACTIVE`, `ON_LEAVE`, `RESIGNED`.
    pub status: String,
    pub joining_date: NaiveDateTime,
}

impl Faculty {
    pub const DEFAULT_STATUS: &'static str = "ACTIVE";

    /// Creates an unsaved faculty record with default status.
    pub fn blank(joining_date: NaiveDateTime) -> Self {
        Self {
            id: None,
            employee_id: None,
            first_name: None,
            last_name: None,
            email: None,
            mobile_number: None,
            department: None,
            designation: None,
            status: Self::DEFAULT_STATUS.to_string(),
            joining_date,
        }
    }
}
