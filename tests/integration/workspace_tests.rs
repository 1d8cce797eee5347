//! Professor workspace: scoped queries, ownership checks and batch grading

use campus_portal::error::AppError;
use campus_portal::models::{AbsenceUpdate, GradeStatus, GradeUpdate};
use campus_portal::services::{
    AbsenceQuery, AbsenceRequest, BatchGradeEntry, BatchGradeRequest, GradeQuery, GradeRequest,
    ScheduleView, SessionQuery,
};

use crate::common::{day, utc, TestCampus};

fn absence_request(student_id: &str, session_id: &str) -> AbsenceRequest {
    AbsenceRequest {
        student_id: Some(student_id.to_string()),
        session_id: Some(session_id.to_string()),
        ..Default::default()
    }
}

fn batch_entry(student_id: &str, course_id: &str, title: &str, score: f64) -> BatchGradeEntry {
    BatchGradeEntry {
        student_id: student_id.to_string(),
        course_id: course_id.to_string(),
        title: title.to_string(),
        score,
        comment: String::new(),
        due_date: None,
    }
}

#[tokio::test]
async fn test_duplicate_absence_is_rejected() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;
    let session = campus.session(&course, day(2025, 3, 11), "08:00").await;
    let workspace = &campus.state.professors;

    let absence = workspace
        .record_absence(&user, absence_request(&alice.id, &session.id))
        .await
        .unwrap();
    assert_eq!(absence.date, session.date);
    assert!(!absence.justified);

    let err = workspace
        .record_absence(&user, absence_request(&alice.id, &session.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    let absences = workspace.my_absences(&user, AbsenceQuery::default()).await.unwrap();
    assert_eq!(absences.len(), 1);

    let snapshot = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();
    assert_eq!(snapshot.stats.total_students, 1);
}

#[tokio::test]
async fn test_record_absence_checks_in_order() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;
    let session = campus.session(&course, day(2025, 3, 11), "08:00").await;
    let workspace = &campus.state.professors;

    let missing_field = workspace
        .record_absence(&user, AbsenceRequest::default())
        .await
        .unwrap_err();
    assert!(matches!(missing_field, AppError::Validation(_)));

    let unknown_session = workspace
        .record_absence(&user, absence_request(&alice.id, "no-such-session"))
        .await
        .unwrap_err();
    assert!(matches!(unknown_session, AppError::NotFound(ref m) if m == "Session not found"));

    let unknown_student = workspace
        .record_absence(&user, absence_request("no-such-student", &session.id))
        .await
        .unwrap_err();
    assert!(matches!(unknown_student, AppError::NotFound(ref m) if m == "Student not found"));
}

#[tokio::test]
async fn test_foreign_session_and_course_are_forbidden() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (owner, professor) = campus.professor("owner@upf.ma").await;
    let (intruder, _) = campus.professor("intruder@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;
    let session = campus.session(&course, day(2025, 3, 11), "08:00").await;
    let workspace = &campus.state.professors;

    let err = workspace
        .record_absence(&intruder, absence_request(&alice.id, &session.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(workspace
        .my_absences(&owner, AbsenceQuery::default())
        .await
        .unwrap()
        .is_empty());

    let absence = campus.absence(&alice, &session).await;
    let err = workspace
        .update_absence(
            &intruder,
            &absence.id,
            AbsenceUpdate {
                justified: Some(true),
                reason: Some("forged".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    let err = workspace.delete_absence(&intruder, &absence.id).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let stored = workspace.my_absences(&owner, AbsenceQuery::default()).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(!stored[0].absence.justified);
    assert_eq!(stored[0].absence.reason, "");

    let grade_request = GradeRequest {
        title: Some("Quiz".to_string()),
        course_id: Some(course.id.clone()),
        student_id: Some(alice.id.clone()),
        due_date: Some(utc(2025, 3, 20, 12, 0)),
        ..Default::default()
    };
    let err = workspace.create_grade(&intruder, grade_request.clone()).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let grade = workspace.create_grade(&owner, grade_request).await.unwrap();
    let err = workspace
        .update_grade(
            &intruder,
            &grade.id,
            GradeUpdate {
                score: Some(2.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let grades = workspace.my_grades(&owner, GradeQuery::default()).await.unwrap();
    assert_eq!(grades.len(), 1);
    assert_eq!(grades[0].grade.score, None);
    assert_eq!(grades[0].grade.status, GradeStatus::Pending);
}

#[tokio::test]
async fn test_absence_filters_never_widen() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, other) = campus.professor("other@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;

    let algorithms = campus.course(&professor, "INF301").await;
    let databases = campus.course(&professor, "INF305").await;
    let foreign = campus.course(&other, "MAT201").await;

    let first = campus.session(&algorithms, day(2025, 3, 10), "08:00").await;
    let second = campus.session(&databases, day(2025, 3, 11), "08:00").await;
    let theirs = campus.session(&foreign, day(2025, 3, 11), "10:00").await;
    campus.absence(&alice, &first).await;
    campus.absence(&alice, &second).await;
    campus.absence(&alice, &theirs).await;
    let workspace = &campus.state.professors;

    let all = workspace.my_absences(&user, AbsenceQuery::default()).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].session.id, second.id);

    let by_course = workspace
        .my_absences(
            &user,
            AbsenceQuery {
                course_id: Some(algorithms.id.clone()),
                session_id: Some(second.id.clone()),
            },
        )
        .await
        .unwrap();
    assert_eq!(by_course.len(), 1);
    assert_eq!(by_course[0].session.id, first.id);

    let foreign_session = workspace
        .my_absences(
            &user,
            AbsenceQuery {
                session_id: Some(theirs.id.clone()),
                course_id: None,
            },
        )
        .await
        .unwrap();
    assert!(foreign_session.is_empty());

    let foreign_course = workspace
        .my_absences(
            &user,
            AbsenceQuery {
                course_id: Some(foreign.id.clone()),
                session_id: None,
            },
        )
        .await
        .unwrap();
    assert!(foreign_course.is_empty());
}

#[tokio::test]
async fn test_schedule_day_and_week_views() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;

    campus.session(&course, day(2025, 3, 12), "14:00").await;
    campus.session(&course, day(2025, 3, 12), "08:00").await;
    campus.session(&course, day(2025, 3, 16), "10:00").await;
    campus.session(&course, day(2025, 3, 17), "10:00").await;
    let workspace = &campus.state.professors;

    let week = workspace.my_sessions(&user, SessionQuery::default()).await.unwrap();
    assert_eq!(week.len(), 3);
    let starts: Vec<_> = week.iter().map(|s| s.session.start_time.as_str()).collect();
    assert_eq!(starts, vec!["08:00", "14:00", "10:00"]);
    assert_eq!(week[0].course.code, "INF301");
    assert_eq!(week[0].room.as_ref().map(|r| r.number.as_str()), Some("B204"));

    let today = workspace
        .my_sessions(
            &user,
            SessionQuery {
                view: Some(ScheduleView::Day),
                date: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(today.len(), 2);

    let next_week = workspace
        .my_sessions(
            &user,
            SessionQuery {
                view: Some(ScheduleView::Week),
                date: Some(day(2025, 3, 19)),
            },
        )
        .await
        .unwrap();
    assert_eq!(next_week.len(), 1);
}

#[tokio::test]
async fn test_grade_lifecycle() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;
    let workspace = &campus.state.professors;

    let grade = workspace
        .create_grade(
            &user,
            GradeRequest {
                title: Some("Project".to_string()),
                course_id: Some(course.id.clone()),
                student_id: Some(alice.id.clone()),
                due_date: Some(utc(2025, 3, 30, 23, 0)),
                status: Some(GradeStatus::Submitted),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(grade.status, GradeStatus::Submitted);

    let out_of_range = workspace
        .update_grade(
            &user,
            &grade.id,
            GradeUpdate {
                score: Some(21.0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(out_of_range, AppError::Validation(_)));

    let graded = workspace
        .update_grade(
            &user,
            &grade.id,
            GradeUpdate {
                score: Some(14.5),
                comment: Some("Solid work".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(graded.status, GradeStatus::Graded);

    let listed = workspace
        .my_grades(
            &user,
            GradeQuery {
                course_id: Some(course.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].grade.score, Some(14.5));
    assert_eq!(listed[0].student.as_ref().map(|s| s.id.as_str()), Some(alice.id.as_str()));

    workspace.delete_grade(&user, &grade.id).await.unwrap();
    let err = workspace.delete_grade(&user, &grade.id).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_grade_listing_narrows_by_student_and_status() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;
    let (_, bob) = campus.student("bob@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;
    let workspace = &campus.state.professors;

    for (student, score) in [(&alice, Some(15.0)), (&alice, None), (&bob, Some(9.5))] {
        workspace
            .create_grade(
                &user,
                GradeRequest {
                    title: Some("Quiz".to_string()),
                    course_id: Some(course.id.clone()),
                    student_id: Some(student.id.clone()),
                    due_date: Some(utc(2025, 3, 20, 18, 0)),
                    score,
                    ..Default::default()
                },
            )
            .await
            .unwrap();
    }

    let alice_grades = workspace
        .my_grades(
            &user,
            GradeQuery {
                student_id: Some(alice.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(alice_grades.len(), 2);
    assert!(alice_grades.iter().all(|g| g.grade.student_id == alice.id));

    let pending = workspace
        .my_grades(
            &user,
            GradeQuery {
                status: Some(GradeStatus::Pending),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].grade.student_id, alice.id);

    let bob_graded = workspace
        .my_grades(
            &user,
            GradeQuery {
                student_id: Some(bob.id.clone()),
                status: Some(GradeStatus::Graded),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(bob_graded.len(), 1);
    assert_eq!(bob_graded[0].grade.score, Some(9.5));

    // Filters narrow within owned courses only
    let (_, other) = campus.professor("other@upf.ma").await;
    let foreign = campus.course(&other, "MAT201").await;
    let none = workspace
        .my_grades(
            &user,
            GradeQuery {
                course_id: Some(foreign.id.clone()),
                student_id: Some(alice.id.clone()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_batch_keeps_entries_before_failure() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;
    let (_, bob) = campus.student("bob@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;
    let workspace = &campus.state.professors;

    let request = BatchGradeRequest {
        grades: vec![
            batch_entry(&alice.id, &course.id, "Midterm", 12.0),
            batch_entry(&bob.id, &course.id, "Midterm", 16.5),
            batch_entry("no-such-student", &course.id, "Midterm", 10.0),
            batch_entry(&alice.id, &course.id, "Final", 18.0),
        ],
    };

    let err = workspace.batch_grades(&user, request).await.unwrap_err();
    match err {
        AppError::BatchAborted { persisted, cause } => {
            assert_eq!(persisted, 2);
            assert!(matches!(*cause, AppError::NotFound(_)));
        }
        other => panic!("unexpected error: {other:?}"),
    }

    let stored = workspace.my_grades(&user, GradeQuery::default()).await.unwrap();
    assert_eq!(stored.len(), 2);
    assert!(stored.iter().all(|g| g.grade.status == GradeStatus::Graded));
    assert!(stored.iter().all(|g| g.grade.title == "Midterm"));
}

#[tokio::test]
async fn test_batch_checks_ownership_before_writing() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, other) = campus.professor("other@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;
    let mine = campus.course(&professor, "INF301").await;
    let theirs = campus.course(&other, "MAT201").await;
    let workspace = &campus.state.professors;

    let request = BatchGradeRequest {
        grades: vec![
            batch_entry(&alice.id, &mine.id, "Quiz", 11.0),
            batch_entry(&alice.id, &theirs.id, "Quiz", 11.0),
        ],
    };
    let err = workspace.batch_grades(&user, request).await.unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(workspace.my_grades(&user, GradeQuery::default()).await.unwrap().is_empty());

    let empty = workspace.batch_grades(&user, BatchGradeRequest::default()).await.unwrap_err();
    assert!(matches!(empty, AppError::Validation(_)));

    let outcome = workspace
        .batch_grades(
            &user,
            BatchGradeRequest {
                grades: vec![batch_entry(&alice.id, &mine.id, "Quiz", 11.0)],
            },
        )
        .await
        .unwrap();
    assert_eq!(outcome.count, 1);
    assert_eq!(outcome.grades[0].score, Some(11.0));
}

#[tokio::test]
async fn test_course_students_requires_ownership() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, other) = campus.professor("other@upf.ma").await;
    campus.student("alice@upf.ma").await;
    campus.student("bob@upf.ma").await;
    let mine = campus.course(&professor, "INF301").await;
    let theirs = campus.course(&other, "MAT201").await;
    let workspace = &campus.state.professors;

    assert_eq!(workspace.course_students(&user, &mine.id).await.unwrap().len(), 2);
    assert!(matches!(
        workspace.course_students(&user, &theirs.id).await.unwrap_err(),
        AppError::Forbidden(_)
    ));
    assert!(matches!(
        workspace.course_students(&user, "missing").await.unwrap_err(),
        AppError::NotFound(_)
    ));

    let courses = workspace.my_courses(&user).await.unwrap();
    assert_eq!(courses.len(), 1);
    assert_eq!(courses[0].course.code, "INF301");
}
