use registrar_core::db::open_db_in_memory;
use registrar_core::{
    DashboardService, FacultyService, FacultyUpsertRequest, NotificationKind,
    NotificationService, SqliteDepartmentRepository, SqliteFacultyRepository,
    SqliteNotificationRepository, SqliteStatsRepository, SqliteStudentRepository,
    StudentService, StudentUpsertRequest,
};

#[test]
fn notifications_are_listed_newest_first_and_marked_read() {
    let conn = open_db_in_memory().unwrap();
    let service = NotificationService::new(SqliteNotificationRepository::try_new(&conn).unwrap());

    let first = service
        .notify("registrar", NotificationKind::Registration, "Enrolled", "EDU-1 enrolled")
        .unwrap();
    let second = service
        .notify("registrar", NotificationKind::Alert, "At risk", "EDU-2 flagged")
        .unwrap();
    service
        .notify("dean", NotificationKind::System, "Backup", "Nightly backup done")
        .unwrap();
    assert!(!first.is_read);

    let listed = service.list_for_recipient("registrar").unwrap();
    let ids: Vec<_> = listed.iter().map(|item| item.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    service.mark_as_read(first.id.unwrap()).unwrap();
    service.mark_as_read(9_999).unwrap();

    let listed = service.list_for_recipient("registrar").unwrap();
    assert!(listed
        .iter()
        .find(|item| item.id == first.id)
        .is_some_and(|item| item.is_read));
    assert!(listed
        .iter()
        .find(|item| item.id == second.id)
        .is_some_and(|item| !item.is_read));
}

#[test]
fn dashboard_stats_on_empty_database() {
    let conn = open_db_in_memory().unwrap();
    let stats = DashboardService::new(SqliteStatsRepository::try_new(&conn).unwrap())
        .stats()
        .unwrap();

    assert_eq!(stats.total_students, 0);
    assert_eq!(stats.total_courses, 0);
    assert_eq!(stats.active_faculty, 0);
    assert_eq!(stats.average_gpa, 0.0);
    assert!(stats.branch_distribution.is_empty());
}

#[test]
fn dashboard_stats_aggregate_records() {
    let conn = open_db_in_memory().unwrap();
    let students = StudentService::new(
        SqliteStudentRepository::try_new(&conn).unwrap(),
        SqliteDepartmentRepository::try_new(&conn).unwrap(),
    );
    for (student_id, major, gpa) in [
        ("EDU-1", "Physics", 3.0),
        ("EDU-2", "Physics", 4.0),
        ("EDU-3", "Chemistry", 2.0),
    ] {
        students
            .upsert_student(&StudentUpsertRequest {
                student_id: Some(student_id.to_string()),
                major: Some(major.to_string()),
                gpa: Some(gpa),
                ..StudentUpsertRequest::default()
            })
            .unwrap();
    }
    let faculty = FacultyService::new(
        SqliteFacultyRepository::try_new(&conn).unwrap(),
        SqliteDepartmentRepository::try_new(&conn).unwrap(),
    );
    faculty
        .upsert_faculty(&FacultyUpsertRequest {
            employee_id: Some("FAC-1".to_string()),
            department: Some("Biology".to_string()),
            ..FacultyUpsertRequest::default()
        })
        .unwrap();
    faculty
        .upsert_faculty(&FacultyUpsertRequest {
            employee_id: Some("FAC-2".to_string()),
            status: Some("RESIGNED".to_string()),
            ..FacultyUpsertRequest::default()
        })
        .unwrap();

    let stats = DashboardService::new(SqliteStatsRepository::try_new(&conn).unwrap())
        .stats()
        .unwrap();

    assert_eq!(stats.total_students, 3);
    assert_eq!(stats.active_faculty, 1);
    assert!((stats.average_gpa - 3.0).abs() < f64::EPSILON);

    let distribution: Vec<_> = stats
        .branch_distribution
        .iter()
        .map(|row| (row.department_name.as_str(), row.students))
        .collect();
    assert_eq!(
        distribution,
        vec![("Biology", 0), ("Chemistry", 1), ("Physics", 2)]
    );

    let json = serde_json::to_value(&stats).unwrap();
    assert_eq!(json["total_students"], 3);
}
