//! Read-side repository contract
//!
//! Every cross-entity fetch is an explicit join returning typed views.
//! Lists of ids are bound one placeholder per id; an empty list short-circuits
//! to an empty result without touching the database.

use sqlx::{query_as, QueryBuilder, Sqlite};
use tracing::Instrument;

use super::connection::DatabaseManager;
use super::rows::{
    AbsenceViewRow, CourseRow, GradeViewRow, OwnedAbsenceRow, OwnedGradeRow, OwnedSessionRow,
    SessionViewRow, UserRow,
};
use crate::error::AppResult;
use crate::models::{
    Absence, AbsenceView, Course, CourseView, Grade, GradeStatus, GradeView, Professor, Session,
    SessionView, Student, User,
};
use crate::services::calendar::Window;

/// A record together with the professor who owns it through its course
#[derive(Debug, Clone, PartialEq)]
pub struct Owned<T> {
    pub record: T,
    pub professor_id: String,
}

impl<T> Owned<T> {
    pub fn is_owned_by(&self, professor_id: &str) -> bool {
        self.professor_id == professor_id
    }
}

/// Optional narrowing of a grade listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GradeFilter {
    pub student_id: Option<String>,
    pub status: Option<GradeStatus>,
}

/// Queries used by the reporting engine and the role workspaces
#[allow(async_fn_in_trait)]
pub trait AcademicRepository {
    async fn find_user(&self, user_id: &str) -> AppResult<Option<User>>;

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>>;

    async fn find_professor_by_user(&self, user_id: &str) -> AppResult<Option<Professor>>;

    async fn find_student_by_user(&self, user_id: &str) -> AppResult<Option<Student>>;

    async fn find_student(&self, student_id: &str) -> AppResult<Option<Student>>;

    async fn list_students(&self) -> AppResult<Vec<Student>>;

    async fn find_course(&self, course_id: &str) -> AppResult<Option<Course>>;

    /// Courses owned by a professor, sorted by (semester, name)
    async fn find_courses_by_professor(&self, professor_id: &str) -> AppResult<Vec<CourseView>>;

    /// Sessions of the given courses, optionally restricted to a window,
    /// sorted by (date, start time)
    async fn find_sessions_by_courses(
        &self,
        course_ids: &[String],
        window: Option<Window>,
    ) -> AppResult<Vec<SessionView>>;

    async fn find_session_with_owner(&self, session_id: &str) -> AppResult<Option<Owned<Session>>>;

    /// Absences on the given sessions, most recent first
    async fn find_absences_by_sessions(&self, session_ids: &[String]) -> AppResult<Vec<AbsenceView>>;

    async fn find_absence_with_owner(&self, absence_id: &str) -> AppResult<Option<Owned<Absence>>>;

    /// Grades on the given courses, latest due date first
    async fn find_grades_by_courses(
        &self,
        course_ids: &[String],
        filter: &GradeFilter,
    ) -> AppResult<Vec<GradeView>>;

    async fn find_grade_with_owner(&self, grade_id: &str) -> AppResult<Option<Owned<Grade>>>;
}

const STUDENT_SELECT: &str = r#"
    SELECT st.id, st.user_id, u.name, u.email, st.registration_number, st.program, st.study_year
    FROM students st
    JOIN users u ON u.id = st.user_id
"#;

const SESSION_VIEW_SELECT: &str = r#"
    SELECT s.id, s.course_id, s.room_id, s.date, s.start_time, s.end_time, s.kind, s.notes,
           c.name AS course_name, c.code AS course_code,
           r.number AS room_number, r.building AS room_building
    FROM sessions s
    JOIN courses c ON c.id = s.course_id
    LEFT JOIN rooms r ON r.id = s.room_id
    WHERE s.course_id IN ("#;

const ABSENCE_VIEW_SELECT: &str = r#"
    SELECT a.id, a.student_id, a.session_id, a.date, a.justified, a.reason, a.created_at,
           st.id AS resolved_student_id, su.name AS student_name, su.email AS student_email,
           st.registration_number, st.program,
           s.date AS session_date, s.start_time, s.end_time,
           c.id AS course_id, c.name AS course_name, c.code AS course_code
    FROM absences a
    JOIN sessions s ON s.id = a.session_id
    JOIN courses c ON c.id = s.course_id
    LEFT JOIN students st ON st.id = a.student_id
    LEFT JOIN users su ON su.id = st.user_id
    WHERE a.session_id IN ("#;

const GRADE_VIEW_SELECT: &str = r#"
    SELECT g.id, g.title, g.description, g.course_id, g.student_id, g.due_date, g.score,
           g.comment, g.status, g.created_at,
           c.name AS course_name, c.code AS course_code,
           st.id AS resolved_student_id, su.name AS student_name, su.email AS student_email,
           st.registration_number, st.program
    FROM grades g
    JOIN courses c ON c.id = g.course_id
    LEFT JOIN students st ON st.id = g.student_id
    LEFT JOIN users su ON su.id = st.user_id
    WHERE g.course_id IN ("#;

fn push_id_list(builder: &mut QueryBuilder<'_, Sqlite>, ids: &[String]) {
    let mut separated = builder.separated(", ");
    for id in ids {
        separated.push_bind(id.clone());
    }
    separated.push_unseparated(")");
}

impl AcademicRepository for DatabaseManager {
    async fn find_user(&self, user_id: &str) -> AppResult<Option<User>> {
        let row = query_as::<_, UserRow>("SELECT * FROM users WHERE id = ?")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        let row = query_as::<_, UserRow>("SELECT * FROM users WHERE email = ?")
            .bind(User::normalize_email(email))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(User::from))
    }

    async fn find_professor_by_user(&self, user_id: &str) -> AppResult<Option<Professor>> {
        let professor = query_as::<_, Professor>(
            r#"
            SELECT p.id, p.user_id, u.name, u.email, p.employee_number, p.specialty, p.office
            FROM professors p
            JOIN users u ON u.id = p.user_id
            WHERE p.user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(professor)
    }

    async fn find_student_by_user(&self, user_id: &str) -> AppResult<Option<Student>> {
        let student = query_as::<_, Student>(&format!("{STUDENT_SELECT} WHERE st.user_id = ?"))
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    async fn find_student(&self, student_id: &str) -> AppResult<Option<Student>> {
        let student = query_as::<_, Student>(&format!("{STUDENT_SELECT} WHERE st.id = ?"))
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(student)
    }

    async fn list_students(&self) -> AppResult<Vec<Student>> {
        let students = query_as::<_, Student>(&format!("{STUDENT_SELECT} ORDER BY u.name"))
            .fetch_all(&self.pool)
            .await?;
        Ok(students)
    }

    async fn find_course(&self, course_id: &str) -> AppResult<Option<Course>> {
        let row = query_as::<_, CourseRow>("SELECT * FROM courses WHERE id = ?")
            .bind(course_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Course::from))
    }

    async fn find_courses_by_professor(&self, professor_id: &str) -> AppResult<Vec<CourseView>> {
        let rows = query_as::<_, CourseRow>(
            r#"
            SELECT c.*, d.name AS department_name
            FROM courses c
            LEFT JOIN departments d ON d.id = c.department_id
            WHERE c.professor_id = ?
            ORDER BY c.semester, c.name
            "#,
        )
        .bind(professor_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(CourseView::from).collect())
    }

    async fn find_sessions_by_courses(
        &self,
        course_ids: &[String],
        window: Option<Window>,
    ) -> AppResult<Vec<SessionView>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(SESSION_VIEW_SELECT);
        push_id_list(&mut builder, course_ids);
        if let Some(window) = window {
            builder
                .push(" AND s.date >= ")
                .push_bind(window.start.timestamp_millis())
                .push(" AND s.date < ")
                .push_bind(window.end.timestamp_millis());
        }
        builder.push(" ORDER BY s.date ASC, s.start_time ASC");

        let span = crate::db_span!("SELECT", "sessions");
        let rows = builder
            .build_query_as::<SessionViewRow>()
            .fetch_all(&self.pool)
            .instrument(span.clone())
            .await?;
        span.record("rows", rows.len());
        Ok(rows.into_iter().map(SessionView::from).collect())
    }

    async fn find_session_with_owner(&self, session_id: &str) -> AppResult<Option<Owned<Session>>> {
        let row = query_as::<_, OwnedSessionRow>(
            r#"
            SELECT s.*, c.professor_id
            FROM sessions s
            JOIN courses c ON c.id = s.course_id
            WHERE s.id = ?
            "#,
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Owned {
            record: row.session.into(),
            professor_id: row.professor_id,
        }))
    }

    async fn find_absences_by_sessions(&self, session_ids: &[String]) -> AppResult<Vec<AbsenceView>> {
        if session_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(ABSENCE_VIEW_SELECT);
        push_id_list(&mut builder, session_ids);
        builder.push(" ORDER BY a.date DESC, a.created_at DESC");

        let span = crate::db_span!("SELECT", "absences");
        let rows = builder
            .build_query_as::<AbsenceViewRow>()
            .fetch_all(&self.pool)
            .instrument(span.clone())
            .await?;
        span.record("rows", rows.len());
        Ok(rows.into_iter().map(AbsenceView::from).collect())
    }

    async fn find_absence_with_owner(&self, absence_id: &str) -> AppResult<Option<Owned<Absence>>> {
        let row = query_as::<_, OwnedAbsenceRow>(
            r#"
            SELECT a.*, c.professor_id
            FROM absences a
            JOIN sessions s ON s.id = a.session_id
            JOIN courses c ON c.id = s.course_id
            WHERE a.id = ?
            "#,
        )
        .bind(absence_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Owned {
            record: row.absence.into(),
            professor_id: row.professor_id,
        }))
    }

    async fn find_grades_by_courses(
        &self,
        course_ids: &[String],
        filter: &GradeFilter,
    ) -> AppResult<Vec<GradeView>> {
        if course_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder = QueryBuilder::<Sqlite>::new(GRADE_VIEW_SELECT);
        push_id_list(&mut builder, course_ids);
        if let Some(student_id) = &filter.student_id {
            builder.push(" AND g.student_id = ").push_bind(student_id.clone());
        }
        if let Some(status) = filter.status {
            builder.push(" AND g.status = ").push_bind(status);
        }
        builder.push(" ORDER BY g.due_date DESC, g.created_at DESC");

        let span = crate::db_span!("SELECT", "grades");
        let rows = builder
            .build_query_as::<GradeViewRow>()
            .fetch_all(&self.pool)
            .instrument(span.clone())
            .await?;
        span.record("rows", rows.len());
        Ok(rows.into_iter().map(GradeView::from).collect())
    }

    async fn find_grade_with_owner(&self, grade_id: &str) -> AppResult<Option<Owned<Grade>>> {
        let row = query_as::<_, OwnedGradeRow>(
            r#"
            SELECT g.*, c.professor_id
            FROM grades g
            JOIN courses c ON c.id = g.course_id
            WHERE g.id = ?
            "#,
        )
        .bind(grade_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| Owned {
            record: row.grade.into(),
            professor_id: row.professor_id,
        }))
    }
}
