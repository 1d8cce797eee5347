//! Grade status transitions through the public model API

use chrono::{TimeZone, Utc};

use campus_portal::models::{Grade, GradeError, GradeStatus, GradeUpdate, NewGrade};

fn new_grade(score: Option<f64>, status: Option<GradeStatus>) -> NewGrade {
    NewGrade {
        title: "Essay".to_string(),
        description: String::new(),
        course_id: "course-1".to_string(),
        student_id: "student-1".to_string(),
        due_date: Utc.with_ymd_and_hms(2025, 4, 1, 23, 59, 0).unwrap(),
        score,
        comment: String::new(),
        status,
    }
}

#[test]
fn test_pending_to_submitted_to_graded() {
    let now = Utc.with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap();
    let mut grade = Grade::create(new_grade(None, None), now).unwrap();
    assert_eq!(grade.status, GradeStatus::Pending);

    grade
        .apply(GradeUpdate {
            status: Some(GradeStatus::Submitted),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(grade.status, GradeStatus::Submitted);
    assert_eq!(grade.score, None);

    grade
        .apply(GradeUpdate {
            score: Some(0.0),
            status: Some(GradeStatus::Pending),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(grade.status, GradeStatus::Graded);
    assert_eq!(grade.score, Some(0.0));
}

#[test]
fn test_score_bounds_are_inclusive() {
    let now = Utc.with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap();
    for score in [0.0, 10.25, 20.0] {
        let grade = Grade::create(new_grade(Some(score), None), now).unwrap();
        assert_eq!(grade.status, GradeStatus::Graded);
    }
    for score in [-0.5, 20.01, f64::NAN, f64::INFINITY] {
        assert!(matches!(
            Grade::create(new_grade(Some(score), None), now),
            Err(GradeError::ScoreOutOfRange(_))
        ));
    }
}

#[test]
fn test_status_names() {
    assert_eq!(GradeStatus::default(), GradeStatus::Pending);
    assert_eq!(serde_json::to_string(&GradeStatus::Graded).unwrap(), "\"graded\"");
    assert_eq!("submitted".parse::<GradeStatus>().unwrap(), GradeStatus::Submitted);
}

#[test]
fn test_status_only_update_keeps_scored_grade_graded() {
    let now = Utc.with_ymd_and_hms(2025, 3, 12, 10, 0, 0).unwrap();
    let mut grade = Grade::create(new_grade(Some(12.0), None), now).unwrap();

    for status in [GradeStatus::Pending, GradeStatus::Submitted] {
        grade
            .apply(GradeUpdate {
                status: Some(status),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(grade.status, GradeStatus::Graded);
        assert_eq!(grade.score, Some(12.0));
    }

    grade
        .apply(GradeUpdate {
            comment: Some("Resubmitted late".to_string()),
            ..Default::default()
        })
        .unwrap();
    assert_eq!(grade.status, GradeStatus::Graded);
}
