use chrono::NaiveDate;
use registrar_core::db::open_db_in_memory;
use registrar_core::{
    RiskLevel, ServiceError, SqliteDepartmentRepository, SqliteStudentRepository, Student,
    StudentRepository, StudentService, StudentStatus, StudentUpsertRequest,
};
use rusqlite::Connection;

fn service(
    conn: &Connection,
) -> StudentService<SqliteStudentRepository<'_>, SqliteDepartmentRepository<'_>> {
    StudentService::new(
        SqliteStudentRepository::try_new(conn).unwrap(),
        SqliteDepartmentRepository::try_new(conn).unwrap(),
    )
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn request(student_id: &str) -> StudentUpsertRequest {
    StudentUpsertRequest {
        student_id: Some(student_id.to_string()),
        first_name: Some("Ada".to_string()),
        last_name: Some("Lovelace".to_string()),
        email: Some(format!("{}@uni.edu", student_id.to_ascii_lowercase())),
        major: Some("Computer Science".to_string()),
        semester: Some(3),
        enrollment_date: Some("2023-09-01".to_string()),
        ..StudentUpsertRequest::default()
    }
}

#[test]
fn same_student_id_twice_updates_one_row() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let first = service.upsert_student(&request("EDU-2023-1001")).unwrap();
    let mut second_request = request("EDU-2023-1001");
    second_request.first_name = Some("Augusta".to_string());
    second_request.gpa = Some(3.7);
    let second = service.upsert_student(&second_request).unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.first_name.as_deref(), Some("Augusta"));
    assert_eq!(second.gpa, 3.7);
    assert_eq!(count_rows(&conn, "students"), 1);
}

#[test]
fn stale_surrogate_id_falls_through_to_natural_key() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let stored = service.upsert_student(&request("EDU-2023-1002")).unwrap();

    let mut stale = request("EDU-2023-1002");
    stale.id = Some(9_999);
    stale.semester = Some(4);
    let updated = service.upsert_student(&stale).unwrap();

    assert_eq!(updated.id, stored.id);
    assert_eq!(updated.semester, 4);
    assert_eq!(count_rows(&conn, "students"), 1);
}

#[test]
fn email_matches_when_student_id_is_unknown() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let stored = service
        .upsert_student(&StudentUpsertRequest {
            email: Some("grace@uni.edu".to_string()),
            ..StudentUpsertRequest::default()
        })
        .unwrap();
    assert_eq!(stored.student_id, None);

    let updated = service
        .upsert_student(&StudentUpsertRequest {
            student_id: Some("EDU-2023-1003".to_string()),
            email: Some(" grace@uni.edu ".to_string()),
            ..StudentUpsertRequest::default()
        })
        .unwrap();

    assert_eq!(updated.id, stored.id);
    assert_eq!(updated.student_id.as_deref(), Some("EDU-2023-1003"));
    assert_eq!(updated.email.as_deref(), Some("grace@uni.edu"));
    assert_eq!(count_rows(&conn, "students"), 1);
}

#[test]
fn absent_identity_keys_keep_stored_values() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let stored = service.upsert_student(&request("EDU-2023-1004")).unwrap();

    let updated = service
        .upsert_student(&StudentUpsertRequest {
            id: stored.id,
            first_name: Some("Renamed".to_string()),
            ..StudentUpsertRequest::default()
        })
        .unwrap();

    assert_eq!(updated.student_id.as_deref(), Some("EDU-2023-1004"));
    assert_eq!(updated.email.as_deref(), Some("edu-2023-1004@uni.edu"));
    assert_eq!(updated.major_name(), Some("Computer Science"));
}

#[test]
fn new_student_without_keys_gets_defaults() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let created = service
        .upsert_student(&StudentUpsertRequest::default())
        .unwrap();

    assert!(created.id.is_some());
    assert_eq!(created.status, StudentStatus::Active);
    assert_eq!(created.gpa, Student::DEFAULT_GPA);
    assert_eq!(created.semester, Student::DEFAULT_SEMESTER);
    assert_eq!(created.success_score, Student::DEFAULT_SUCCESS_SCORE);
    assert_eq!(created.risk_level, RiskLevel::Low);
    assert_eq!(created.major, None);
}

#[test]
fn enrollment_date_accepts_legacy_format_and_defaults_on_garbage() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut legacy = request("EDU-2023-1005");
    legacy.enrollment_date = Some("15-03-2024".to_string());
    let created = service.upsert_student(&legacy).unwrap();
    assert_eq!(
        created.enrollment_date,
        NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    );

    let mut garbage = request("EDU-2023-1006");
    garbage.enrollment_date = Some("next tuesday".to_string());
    let before = chrono::Local::now().naive_local();
    let created = service.upsert_student(&garbage).unwrap();
    assert!(created.enrollment_date >= before - chrono::Duration::seconds(1));
}

#[test]
fn unseen_major_is_provisioned_once() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let first = service.upsert_student(&request("EDU-2023-1007")).unwrap();
    let second = service.upsert_student(&request("EDU-2023-1008")).unwrap();

    let major = first.major.unwrap();
    assert_eq!(major.name, "Computer Science");
    assert_eq!(major.code, "CO");
    assert_eq!(second.major.unwrap().id, major.id);
    assert_eq!(count_rows(&conn, "departments"), 1);
}

#[test]
fn absent_major_keeps_current_association() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let stored = service.upsert_student(&request("EDU-2023-1009")).unwrap();

    let mut no_major = request("EDU-2023-1009");
    no_major.major = None;
    let updated = service.upsert_student(&no_major).unwrap();

    assert_eq!(updated.major, stored.major);
}

#[test]
fn at_risk_students_lists_high_and_medium() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    for (student_id, risk) in [
        ("EDU-1", RiskLevel::Low),
        ("EDU-2", RiskLevel::High),
        ("EDU-3", RiskLevel::Medium),
    ] {
        let mut req = request(student_id);
        req.risk_level = Some(risk);
        service.upsert_student(&req).unwrap();
    }

    let at_risk = service.at_risk_students().unwrap();
    let ids: Vec<_> = at_risk
        .iter()
        .map(|student| student.student_id.as_deref().unwrap())
        .collect();
    assert_eq!(ids, vec!["EDU-2", "EDU-3"]);
}

#[test]
fn concurrent_duplicate_create_surfaces_constraint_violation() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteStudentRepository::try_new(&conn).unwrap();
    let enrolled = NaiveDate::from_ymd_opt(2023, 9, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();

    // Two writers that both resolved to "new" before either saved.
    let mut first = Student::blank(enrolled);
    first.student_id = Some("EDU-2023-2000".to_string());
    let second = first.clone();

    repo.save_student(&first).unwrap();
    let err = repo.save_student(&second).unwrap_err();
    assert!(err.is_constraint_violation());

    let service_err = ServiceError::from(err);
    assert!(matches!(service_err, ServiceError::Repo(_)));
}

#[test]
fn non_finite_gpa_falls_back_to_default() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);

    let mut nan = request("EDU-2023-3000");
    nan.gpa = Some(f64::NAN);
    let created = service.upsert_student(&nan).unwrap();
    assert_eq!(created.gpa, Student::DEFAULT_GPA);

    let mut infinite = request("EDU-2023-3000");
    infinite.gpa = Some(f64::INFINITY);
    let updated = service.upsert_student(&infinite).unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.gpa, Student::DEFAULT_GPA);
}

#[test]
fn get_student_reads_by_surrogate_id() {
    let conn = open_db_in_memory().unwrap();
    let service = service(&conn);
    let stored = service.upsert_student(&request("EDU-2023-3001")).unwrap();

    assert_eq!(
        service.get_student(stored.id.unwrap()).unwrap(),
        Some(stored)
    );
    assert_eq!(service.get_student(9_999).unwrap(), None);
}
