//! Lazy department provisioning.
//!
//! # Responsibility
//! - Resolve a free-text department label to a stored department, creating
//!   it on first use.
//! - Derive short department codes that avoid clashing with existing ones.
//!
//! # Invariants
//! - A blank label resolves to no department.
//! - Provisioning the same label twice returns the same row.
//! - A derived code that is already taken gets exactly one random decimal
//!   digit appended.

use crate::model::department::Department;
use crate::repo::department_repo::DepartmentRepository;
use crate::repo::RepoResult;
use log::info;
use rand::Rng;

const CODE_PREFIX_CHARS: usize = 2;

/// Resolves `label` to a department, creating it when unknown.
///
/// Returns `Ok(None)` for an absent or blank label.
pub fn resolve_or_create<D>(departments: &D, label: Option<&str>) -> RepoResult<Option<Department>>
where
    D: DepartmentRepository + ?Sized,
{
    resolve_or_create_with_rng(departments, label, &mut rand::thread_rng())
}

/// Same as [`resolve_or_create`] with a caller-provided random source.
pub fn resolve_or_create_with_rng<D, R>(
    departments: &D,
    label: Option<&str>,
    rng: &mut R,
) -> RepoResult<Option<Department>>
where
    D: DepartmentRepository + ?Sized,
    R: Rng + ?Sized,
{
    let Some(name) = label.map(str::trim).filter(|name| !name.is_empty()) else {
        return Ok(None);
    };

    if let Some(existing) = departments.find_by_name(name)? {
        return Ok(Some(existing));
    }

    let candidate = derive_department_code(name);
    let code = if departments.code_exists(&candidate)? {
        disambiguate_code(&candidate, rng)
    } else {
        candidate
    };

    let department = departments.insert_if_absent(name, &code)?;
    info!(
        "event=department_provision module=service status=ok department_id={} code={}",
        department.id, department.code
    );
    Ok(Some(department))
}

/// Uppercased first two characters of `label` (the whole label if shorter).
pub fn derive_department_code(label: &str) -> String {
    label
        .chars()
        .take(CODE_PREFIX_CHARS)
        .collect::<String>()
        .to_uppercase()
}

/// Appends one random decimal digit to `candidate`.
pub fn disambiguate_code<R: Rng + ?Sized>(candidate: &str, rng: &mut R) -> String {
    let digit: u8 = rng.gen_range(0..10);
    format!("{candidate}{digit}")
}

#[cfg(test)]
mod tests {
    use super::{derive_department_code, disambiguate_code};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn code_uses_first_two_characters_uppercased() {
        assert_eq!(derive_department_code("Computer Science"), "CO");
        assert_eq!(derive_department_code("cyber security"), "CY");
        assert_eq!(derive_department_code("x"), "X");
    }

    #[test]
    fn code_counts_characters_not_bytes() {
        assert_eq!(derive_department_code("élan"), "ÉL");
    }

    #[test]
    fn disambiguated_code_appends_exactly_one_digit() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let code = disambiguate_code("CS", &mut rng);
            assert_eq!(code.len(), 3);
            assert!(code.starts_with("CS"));
            assert!(code.chars().last().is_some_and(|c| c.is_ascii_digit()));
        }
    }
}
