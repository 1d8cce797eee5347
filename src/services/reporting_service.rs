//! Attendance & workload reporting
//!
//! Builds the professor dashboard snapshot: owned courses, their sessions,
//! the absences recorded on those sessions, and the statistics derived from
//! them. The aggregation itself is a pure function of the fetched records and
//! the current instant, so it can be exercised without a database.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{Instrument, Span};

use crate::database::{AcademicRepository, DatabaseManager};
use crate::error::{AppError, AppResult};
use crate::logging::log_dashboard_built;
use crate::models::{
    AbsenceView, CourseView, DashboardSnapshot, DashboardStats, Professor, ProfessorSummary,
    SessionView, User,
};
use crate::report_span;
use crate::services::calendar::{day_window, week_window, Window};
use crate::services::time_provider::TimeProvider;

/// Number of absences shown in the dashboard feed
pub const RECENT_ABSENCE_LIMIT: usize = 5;

/// Attendance rate reported when there is nothing to measure yet
pub const FULL_ATTENDANCE: i64 = 100;

/// Attendance percentage, rounded half up.
///
/// `total_absences` counts every absence on the professor's sessions, past
/// or future, while the expected attendance only counts past sessions.
pub fn attendance_rate(past_sessions: usize, distinct_students: usize, total_absences: usize) -> i64 {
    if past_sessions == 0 || distinct_students == 0 {
        return FULL_ATTENDANCE;
    }

    // floor(attended / expected * 100 + 0.5) in integers
    let expected = (past_sessions * distinct_students) as i64;
    let attended = expected - total_absences as i64;
    (200 * attended + expected).div_euclid(2 * expected)
}

/// Students referenced by the absences; unresolved students are skipped.
pub fn distinct_students(absences: &[AbsenceView]) -> usize {
    absences
        .iter()
        .filter_map(|absence| absence.student.as_ref().map(|student| student.id.as_str()))
        .collect::<HashSet<_>>()
        .len()
}

/// Sessions whose date falls inside the window, order preserved
pub fn sessions_within(sessions: &[SessionView], window: Window) -> Vec<SessionView> {
    sessions
        .iter()
        .filter(|view| window.contains(view.session.date))
        .cloned()
        .collect()
}

/// Most recently dated absences first, at most `limit` of them
pub fn recent_absences(absences: &[AbsenceView], limit: usize) -> Vec<AbsenceView> {
    let mut recent = absences.to_vec();
    recent.sort_by(|a, b| b.absence.date.cmp(&a.absence.date));
    recent.truncate(limit);
    recent
}

/// Everything the aggregation needs, already fetched
#[derive(Debug, Clone)]
pub struct ReportInput {
    pub professor: ProfessorSummary,
    pub courses: Vec<CourseView>,
    pub sessions: Vec<SessionView>,
    pub absences: Vec<AbsenceView>,
}

/// Aggregate the fetched records into a snapshot.
///
/// `now` splits sessions into completed and remaining; `today` in `tz` picks
/// the calendar day and week buckets. The two partitions are independent.
pub fn compute_snapshot(
    input: ReportInput,
    now: DateTime<Utc>,
    today: NaiveDate,
    tz: Tz,
) -> DashboardSnapshot {
    let mut sessions = input.sessions;
    sessions.sort_by(|a, b| a.session.schedule_key().cmp(&b.session.schedule_key()));

    let sessions_completed = sessions
        .iter()
        .filter(|view| view.session.date < now)
        .count();
    let sessions_remaining = sessions.len() - sessions_completed;

    let total_students = distinct_students(&input.absences);
    let stats = DashboardStats {
        courses_assigned: input.courses.len(),
        total_students,
        sessions_completed,
        attendance_rate: attendance_rate(sessions_completed, total_students, input.absences.len()),
        sessions_remaining,
    };

    DashboardSnapshot {
        professor: input.professor,
        stats,
        today_sessions: sessions_within(&sessions, day_window(today, tz)),
        week_sessions: sessions_within(&sessions, week_window(today, tz)),
        recent_absences: recent_absences(&input.absences, RECENT_ABSENCE_LIMIT),
        courses: input.courses.into_iter().map(|view| view.course).collect(),
    }
}

fn professor_summary(identity: &User, professor: Professor) -> ProfessorSummary {
    ProfessorSummary {
        id: professor.id,
        name: professor.name,
        email: professor.email,
        photo_url: identity.photo_url.clone(),
        employee_number: professor.employee_number,
        specialty: professor.specialty,
        office: professor.office,
    }
}

pub struct ReportingService {
    db: DatabaseManager,
    clock: Arc<dyn TimeProvider>,
    timezone: Tz,
}

impl ReportingService {
    pub fn new(db: DatabaseManager, clock: Arc<dyn TimeProvider>, timezone: Tz) -> Self {
        Self { db, clock, timezone }
    }

    /// Build the dashboard snapshot for an authenticated professor.
    ///
    /// Fails with `NotFound` when the account has no professor profile. Any
    /// read failure aborts the whole computation.
    pub async fn build_dashboard_snapshot(&self, identity: &User) -> AppResult<DashboardSnapshot> {
        self.build(identity)
            .instrument(report_span!(identity.id))
            .await
    }

    async fn build(&self, identity: &User) -> AppResult<DashboardSnapshot> {
        let professor = self
            .db
            .find_professor_by_user(&identity.id)
            .await?
            .ok_or_else(|| AppError::not_found("Professor profile"))?;

        let courses = self.db.find_courses_by_professor(&professor.id).await?;
        let course_ids: Vec<String> = courses.iter().map(|view| view.course.id.clone()).collect();

        let sessions = self.db.find_sessions_by_courses(&course_ids, None).await?;
        let session_ids: Vec<String> = sessions.iter().map(|view| view.session.id.clone()).collect();

        let absences = self.db.find_absences_by_sessions(&session_ids).await?;

        let absence_count = absences.len();
        let span = Span::current();
        span.record("courses", courses.len());
        span.record("sessions", sessions.len());
        span.record("absences", absences.len());

        let input = ReportInput {
            professor: professor_summary(identity, professor),
            courses,
            sessions,
            absences,
        };
        let snapshot = compute_snapshot(
            input,
            self.clock.now_utc(),
            self.clock.today_in_timezone(self.timezone),
            self.timezone,
        );

        log_dashboard_built(
            &snapshot.professor.id,
            snapshot.courses.len(),
            snapshot.stats.sessions_completed + snapshot.stats.sessions_remaining,
            absence_count,
            snapshot.stats.attendance_rate,
        );

        Ok(snapshot)
    }
}
