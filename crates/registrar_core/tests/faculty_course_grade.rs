use registrar_core::db::open_db_in_memory;
use registrar_core::{
    CourseService, CourseUpsertRequest, Faculty, FacultyService, FacultyUpsertRequest,
    GradeService, GradeUpsertRequest, ServiceError, SqliteCourseRepository,
    SqliteDepartmentRepository, SqliteFacultyRepository, SqliteGradeRepository,
    SqliteStudentRepository, StudentService, StudentUpsertRequest,
};
use rusqlite::Connection;

fn faculty_service(
    conn: &Connection,
) -> FacultyService<SqliteFacultyRepository<'_>, SqliteDepartmentRepository<'_>> {
    FacultyService::new(
        SqliteFacultyRepository::try_new(conn).unwrap(),
        SqliteDepartmentRepository::try_new(conn).unwrap(),
    )
}

fn course_service(
    conn: &Connection,
) -> CourseService<SqliteCourseRepository<'_>, SqliteDepartmentRepository<'_>> {
    CourseService::new(
        SqliteCourseRepository::try_new(conn).unwrap(),
        SqliteDepartmentRepository::try_new(conn).unwrap(),
    )
}

fn grade_service(
    conn: &Connection,
) -> GradeService<SqliteGradeRepository<'_>, SqliteStudentRepository<'_>, SqliteCourseRepository<'_>>
{
    GradeService::new(
        SqliteGradeRepository::try_new(conn).unwrap(),
        SqliteStudentRepository::try_new(conn).unwrap(),
        SqliteCourseRepository::try_new(conn).unwrap(),
    )
}

fn count_rows(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
        row.get(0)
    })
    .unwrap()
}

fn seed_student_and_course(conn: &Connection) {
    StudentService::new(
        SqliteStudentRepository::try_new(conn).unwrap(),
        SqliteDepartmentRepository::try_new(conn).unwrap(),
    )
    .upsert_student(&StudentUpsertRequest {
        student_id: Some("EDU-2023-1001".to_string()),
        ..StudentUpsertRequest::default()
    })
    .unwrap();
    course_service(conn)
        .upsert_course(&CourseUpsertRequest {
            code: Some("CS101".to_string()),
            name: Some("Intro to Programming".to_string()),
            ..CourseUpsertRequest::default()
        })
        .unwrap();
}

#[test]
fn faculty_is_matched_by_employee_id_and_defaults_status() {
    let conn = open_db_in_memory().unwrap();
    let service = faculty_service(&conn);

    let created = service
        .upsert_faculty(&FacultyUpsertRequest {
            employee_id: Some("FAC-001".to_string()),
            first_name: Some("Alan".to_string()),
            department: Some("Mathematics".to_string()),
            joining_date: Some("01-08-2019".to_string()),
            ..FacultyUpsertRequest::default()
        })
        .unwrap();
    assert_eq!(created.status, Faculty::DEFAULT_STATUS);
    assert_eq!(created.department.as_ref().unwrap().code, "MA");
    assert_eq!(created.joining_date.to_string(), "2019-08-01 00:00:00");

    let updated = service
        .upsert_faculty(&FacultyUpsertRequest {
            id: Some(4_242),
            employee_id: Some("FAC-001".to_string()),
            status: Some("ON_LEAVE".to_string()),
            ..FacultyUpsertRequest::default()
        })
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.status, "ON_LEAVE");
    assert_eq!(updated.department, created.department);
    assert_eq!(count_rows(&conn, "faculty"), 1);
    assert_eq!(service.get_faculty(created.id.unwrap()).unwrap(), Some(updated));
}

#[test]
fn course_is_matched_by_code_and_defaults_student_count() {
    let conn = open_db_in_memory().unwrap();
    let service = course_service(&conn);

    let created = service
        .upsert_course(&CourseUpsertRequest {
            code: Some("CS101".to_string()),
            credits: Some(4),
            department: Some("Computer Science".to_string()),
            ..CourseUpsertRequest::default()
        })
        .unwrap();
    assert_eq!(created.student_count, 0);

    let updated = service
        .upsert_course(&CourseUpsertRequest {
            code: Some(" CS101 ".to_string()),
            credits: Some(3),
            student_count: Some(40),
            ..CourseUpsertRequest::default()
        })
        .unwrap();
    assert_eq!(updated.id, created.id);
    assert_eq!(updated.credits, Some(3));
    assert_eq!(updated.student_count, 40);
    assert_eq!(count_rows(&conn, "courses"), 1);
    assert_eq!(service.get_course_by_code("CS101").unwrap(), Some(updated));
}

#[test]
fn grade_links_student_and_course_by_natural_keys() {
    let conn = open_db_in_memory().unwrap();
    seed_student_and_course(&conn);
    let service = grade_service(&conn);

    let grade = service
        .upsert_grade(&GradeUpsertRequest {
            student_id: Some("EDU-2023-1001".to_string()),
            course_code: Some("CS101".to_string()),
            grade: Some("B".to_string()),
            marks: Some(78),
            semester: Some(1),
            ..GradeUpsertRequest::default()
        })
        .unwrap();

    assert!(grade.student_record_id.is_some());
    assert!(grade.course_id.is_some());

    let regraded = service
        .upsert_grade(&GradeUpsertRequest {
            id: grade.id,
            grade: Some("A".to_string()),
            marks: Some(91),
            ..GradeUpsertRequest::default()
        })
        .unwrap();
    assert_eq!(regraded.id, grade.id);
    assert_eq!(regraded.grade.as_deref(), Some("A"));
    assert_eq!(regraded.course_id, grade.course_id);
}

#[test]
fn retakes_create_separate_rows() {
    let conn = open_db_in_memory().unwrap();
    seed_student_and_course(&conn);
    let service = grade_service(&conn);
    let attempt = GradeUpsertRequest {
        student_id: Some("EDU-2023-1001".to_string()),
        course_code: Some("CS101".to_string()),
        grade: Some("F".to_string()),
        ..GradeUpsertRequest::default()
    };

    service.upsert_grade(&attempt).unwrap();
    service
        .upsert_grade(&GradeUpsertRequest {
            grade: Some("C".to_string()),
            ..attempt.clone()
        })
        .unwrap();

    let grades = service.grades_for_student("EDU-2023-1001").unwrap();
    let letters: Vec<_> = grades
        .iter()
        .map(|grade| grade.grade.as_deref().unwrap())
        .collect();
    assert_eq!(letters, vec!["F", "C"]);
}

#[test]
fn unknown_student_or_course_aborts_grade_write() {
    let conn = open_db_in_memory().unwrap();
    seed_student_and_course(&conn);
    let service = grade_service(&conn);

    let err = service
        .upsert_grade(&GradeUpsertRequest {
            student_id: Some("EDU-GHOST".to_string()),
            course_code: Some("CS101".to_string()),
            ..GradeUpsertRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::StudentNotFound(_)));

    let err = service
        .upsert_grade(&GradeUpsertRequest {
            student_id: Some("EDU-2023-1001".to_string()),
            course_code: Some("XX999".to_string()),
            ..GradeUpsertRequest::default()
        })
        .unwrap_err();
    assert!(matches!(err, ServiceError::CourseNotFound(ref code) if code == "XX999"));

    assert_eq!(count_rows(&conn, "grades"), 0);
    assert!(matches!(
        service.grades_for_student("EDU-GHOST"),
        Err(ServiceError::StudentNotFound(_))
    ));
}
