//! Professor dashboard snapshot against a real database

use chrono::Duration;

use campus_portal::error::AppError;
use campus_portal::services::calendar::local_midnight;

use crate::common::{day, utc, TestCampus};

#[tokio::test]
async fn test_professor_without_courses() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("empty@upf.ma").await;

    let snapshot = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();

    assert_eq!(snapshot.professor.id, professor.id);
    assert_eq!(snapshot.stats.courses_assigned, 0);
    assert_eq!(snapshot.stats.total_students, 0);
    assert_eq!(snapshot.stats.sessions_completed, 0);
    assert_eq!(snapshot.stats.sessions_remaining, 0);
    assert_eq!(snapshot.stats.attendance_rate, 100);
    assert!(snapshot.today_sessions.is_empty());
    assert!(snapshot.week_sessions.is_empty());
    assert!(snapshot.recent_absences.is_empty());
}

#[tokio::test]
async fn test_account_without_professor_profile() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, _) = campus.student("student@upf.ma").await;

    let err = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Professor profile not found"));
}

#[tokio::test]
async fn test_attendance_rate_from_stored_absences() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;
    let (_, bob) = campus.student("bob@upf.ma").await;

    let course = campus.course(&professor, "INF301").await;
    let monday = campus.session(&course, day(2025, 3, 10), "08:00").await;
    let tuesday = campus.session(&course, day(2025, 3, 11), "08:00").await;
    campus.session(&course, day(2025, 3, 5), "08:00").await;
    let friday = campus.session(&course, day(2025, 3, 14), "08:00").await;

    campus.absence(&alice, &monday).await;
    campus.absence(&bob, &tuesday).await;

    let snapshot = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();
    assert_eq!(snapshot.stats.courses_assigned, 1);
    assert_eq!(snapshot.stats.sessions_completed, 3);
    assert_eq!(snapshot.stats.sessions_remaining, 1);
    assert_eq!(snapshot.stats.total_students, 2);
    // (3 * 2 - 2) / (3 * 2) = 66.67
    assert_eq!(snapshot.stats.attendance_rate, 67);

    // Absences on upcoming sessions are counted against past ones
    campus.absence(&alice, &friday).await;
    let snapshot = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();
    assert_eq!(snapshot.stats.total_students, 2);
    assert_eq!(snapshot.stats.attendance_rate, 50);
    assert_eq!(snapshot.recent_absences.len(), 3);
    assert_eq!(snapshot.recent_absences[0].session.id, friday.id);
}

#[tokio::test]
async fn test_other_professors_data_is_ignored() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, other) = campus.professor("other@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;

    let mine = campus.course(&professor, "INF301").await;
    let theirs = campus.course(&other, "MAT201").await;
    campus.session(&mine, day(2025, 3, 10), "08:00").await;
    let foreign = campus.session(&theirs, day(2025, 3, 11), "10:00").await;
    campus.absence(&alice, &foreign).await;

    let snapshot = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();
    assert_eq!(snapshot.stats.courses_assigned, 1);
    assert_eq!(snapshot.stats.total_students, 0);
    assert_eq!(snapshot.stats.attendance_rate, 100);
    assert_eq!(snapshot.week_sessions.len(), 1);
    assert!(snapshot.recent_absences.is_empty());
}

#[tokio::test]
async fn test_snapshot_is_idempotent() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let (_, alice) = campus.student("alice@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;
    let session = campus.session(&course, day(2025, 3, 11), "08:00").await;
    campus.session(&course, day(2025, 3, 12), "14:00").await;
    campus.absence(&alice, &session).await;

    let first = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();
    let second = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();

    assert_eq!(first.stats, second.stats);
    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
}

#[tokio::test]
async fn test_today_bucket_boundaries_in_local_time() {
    // 11:00 in Paris (UTC+1 before the March change)
    let campus = TestCampus::with_timezone(utc(2025, 3, 12, 10, 0), "Europe/Paris").await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;

    let today_midnight = local_midnight(day(2025, 3, 12), campus.tz);
    let at_midnight = campus.session_at(&course, today_midnight, "08:00").await;
    let just_before = campus
        .session_at(&course, today_midnight - Duration::milliseconds(1), "09:00")
        .await;

    let snapshot = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();
    let today: Vec<_> = snapshot.today_sessions.iter().map(|s| s.session.id.clone()).collect();
    assert_eq!(today, vec![at_midnight.id.clone()]);

    let week: Vec<_> = snapshot.week_sessions.iter().map(|s| s.session.id.clone()).collect();
    assert!(week.contains(&at_midnight.id));
    assert!(week.contains(&just_before.id));
}

#[tokio::test]
async fn test_week_bucket_spans_monday_to_sunday() {
    let campus = TestCampus::with_timezone(utc(2025, 3, 12, 10, 0), "Europe/Paris").await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;

    let monday = local_midnight(day(2025, 3, 10), campus.tz);
    let next_monday = local_midnight(day(2025, 3, 17), campus.tz);
    let last_ms = Duration::milliseconds(1);

    let first = campus.session_at(&course, monday, "08:00").await;
    let last = campus.session_at(&course, next_monday - last_ms, "09:00").await;
    campus.session_at(&course, monday - last_ms, "10:00").await;
    campus.session_at(&course, next_monday, "11:00").await;

    let snapshot = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();
    let week: Vec<_> = snapshot.week_sessions.iter().map(|s| s.session.id.clone()).collect();
    assert_eq!(week, vec![first.id, last.id]);
    assert_eq!(snapshot.stats.sessions_completed + snapshot.stats.sessions_remaining, 4);
}

#[tokio::test]
async fn test_buckets_follow_the_clock() {
    let campus = TestCampus::new(utc(2025, 3, 12, 10, 0)).await;
    let (user, professor) = campus.professor("prof@upf.ma").await;
    let course = campus.course(&professor, "INF301").await;
    campus.session(&course, day(2025, 3, 13), "08:00").await;

    let before = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();
    assert!(before.today_sessions.is_empty());
    assert_eq!(before.stats.sessions_remaining, 1);

    campus.clock.advance_days(1);
    let after = campus.state.reporting.build_dashboard_snapshot(&user).await.unwrap();
    assert_eq!(after.today_sessions.len(), 1);
    assert_eq!(after.stats.sessions_completed, 1);
    assert_eq!(after.stats.sessions_remaining, 0);
}
