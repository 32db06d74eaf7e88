//! Domain model for academic records.
//!
//! # Responsibility
//! - Define the records persisted by the repository layer.
//! - Carry the declared defaults applied by the upsert services.
//!
//! # Invariants
//! - `id == None` means "not yet persisted"; repositories assign ids on insert.
//! - Natural keys (`student_id`, `employee_id`, `code`) are unique when set.

pub mod attendance;
pub mod course;
pub mod department;
pub mod faculty;
pub mod grade;
pub mod notification;
pub mod student;

/// Surrogate row identifier assigned by storage.
pub type RecordId = i64;
