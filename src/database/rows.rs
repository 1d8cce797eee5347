//! Database row structures
//!
//! Rows mirror the SQL result columns (timestamps as epoch milliseconds) and
//! convert into the domain models.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};

use crate::models::{
    Absence, AbsenceView, Club, ClubWithEventCount, Course, CourseSummary, CourseView, Event, Grade,
    GradeStatus, GradeView, Role, RoomSummary, Semester, Session, SessionKind, SessionRef,
    SessionView, StudentSummary, User,
};

/// Out-of-range values fall back to the epoch and are logged
pub(crate) fn millis_to_utc(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms).single().unwrap_or_else(|| {
        tracing::warn!(timestamp_ms = ms, "Stored timestamp out of range, using the epoch");
        DateTime::UNIX_EPOCH
    })
}

/// `group_concat` output back into a list of ids
fn split_ids(list: Option<String>) -> Vec<String> {
    list.map(|ids| ids.split(',').map(str::to_string).collect())
        .unwrap_or_default()
}

#[derive(Debug, sqlx::FromRow)]
pub struct UserRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub salt: String,
    pub photo_url: String,
    pub role: Role,
    pub created_at: i64,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            salt: row.salt,
            photo_url: row.photo_url,
            role: row.role,
            created_at: millis_to_utc(row.created_at),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct CourseRow {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub credits: i64,
    pub semester: Semester,
    pub professor_id: String,
    pub department_id: Option<String>,
    pub created_at: i64,
    #[sqlx(default)]
    pub department_name: Option<String>,
}

impl CourseRow {
    fn split(self) -> (Course, Option<String>) {
        let course = Course {
            id: self.id,
            name: self.name,
            code: self.code,
            description: self.description,
            credits: self.credits,
            semester: self.semester,
            professor_id: self.professor_id,
            department_id: self.department_id,
            created_at: millis_to_utc(self.created_at),
        };
        (course, self.department_name)
    }
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        row.split().0
    }
}

impl From<CourseRow> for CourseView {
    fn from(row: CourseRow) -> Self {
        let (course, department_name) = row.split();
        Self {
            course,
            department_name,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct SessionRow {
    pub id: String,
    pub course_id: String,
    pub room_id: String,
    pub date: i64,
    pub start_time: String,
    pub end_time: String,
    pub kind: SessionKind,
    pub notes: String,
}

impl From<SessionRow> for Session {
    fn from(row: SessionRow) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            room_id: row.room_id,
            date: millis_to_utc(row.date),
            start_time: row.start_time,
            end_time: row.end_time,
            kind: row.kind,
            notes: row.notes,
        }
    }
}

/// Session with the professor owning its course
#[derive(Debug, sqlx::FromRow)]
pub struct OwnedSessionRow {
    #[sqlx(flatten)]
    pub session: SessionRow,
    pub professor_id: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct SessionViewRow {
    #[sqlx(flatten)]
    pub session: SessionRow,
    pub course_name: String,
    pub course_code: String,
    pub room_number: Option<String>,
    pub room_building: Option<String>,
}

impl From<SessionViewRow> for SessionView {
    fn from(row: SessionViewRow) -> Self {
        let session = Session::from(row.session);
        let room = row.room_number.map(|number| RoomSummary {
            id: session.room_id.clone(),
            number,
            building: row.room_building.unwrap_or_default(),
        });
        let course = CourseSummary {
            id: session.course_id.clone(),
            name: row.course_name,
            code: row.course_code,
        };

        Self {
            session,
            course,
            room,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct AbsenceRow {
    pub id: String,
    pub student_id: Option<String>,
    pub session_id: String,
    pub date: i64,
    pub justified: bool,
    pub reason: String,
    pub created_at: i64,
}

impl From<AbsenceRow> for Absence {
    fn from(row: AbsenceRow) -> Self {
        Self {
            id: row.id,
            student_id: row.student_id,
            session_id: row.session_id,
            date: millis_to_utc(row.date),
            justified: row.justified,
            reason: row.reason,
            created_at: millis_to_utc(row.created_at),
        }
    }
}

/// Absence with the professor owning its session's course
#[derive(Debug, sqlx::FromRow)]
pub struct OwnedAbsenceRow {
    #[sqlx(flatten)]
    pub absence: AbsenceRow,
    pub professor_id: String,
}

/// Student columns of a `LEFT JOIN students`; all null when unresolved
#[derive(Debug, sqlx::FromRow)]
pub struct JoinedStudentRow {
    pub resolved_student_id: Option<String>,
    pub student_name: Option<String>,
    pub student_email: Option<String>,
    pub registration_number: Option<String>,
    pub program: Option<String>,
}

impl JoinedStudentRow {
    pub fn into_summary(self) -> Option<StudentSummary> {
        Some(StudentSummary {
            id: self.resolved_student_id?,
            name: self.student_name.unwrap_or_default(),
            email: self.student_email.unwrap_or_default(),
            registration_number: self.registration_number.unwrap_or_default(),
            program: self.program.unwrap_or_default(),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct AbsenceViewRow {
    #[sqlx(flatten)]
    pub absence: AbsenceRow,
    #[sqlx(flatten)]
    pub student: JoinedStudentRow,
    pub session_date: i64,
    pub start_time: String,
    pub end_time: String,
    pub course_id: String,
    pub course_name: String,
    pub course_code: String,
}

impl From<AbsenceViewRow> for AbsenceView {
    fn from(row: AbsenceViewRow) -> Self {
        let absence = Absence::from(row.absence);
        let session = SessionRef {
            id: absence.session_id.clone(),
            date: millis_to_utc(row.session_date),
            start_time: row.start_time,
            end_time: row.end_time,
            course: CourseSummary {
                id: row.course_id,
                name: row.course_name,
                code: row.course_code,
            },
        };

        Self {
            absence,
            student: row.student.into_summary(),
            session,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct GradeRow {
    pub id: String,
    pub title: String,
    pub description: String,
    pub course_id: String,
    pub student_id: String,
    pub due_date: i64,
    pub score: Option<f64>,
    pub comment: String,
    pub status: GradeStatus,
    pub created_at: i64,
}

impl From<GradeRow> for Grade {
    fn from(row: GradeRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            course_id: row.course_id,
            student_id: row.student_id,
            due_date: millis_to_utc(row.due_date),
            score: row.score,
            comment: row.comment,
            status: row.status,
            created_at: millis_to_utc(row.created_at),
        }
    }
}

/// Grade with the professor owning its course
#[derive(Debug, sqlx::FromRow)]
pub struct OwnedGradeRow {
    #[sqlx(flatten)]
    pub grade: GradeRow,
    pub professor_id: String,
}

#[derive(Debug, sqlx::FromRow)]
pub struct GradeViewRow {
    #[sqlx(flatten)]
    pub grade: GradeRow,
    #[sqlx(flatten)]
    pub student: JoinedStudentRow,
    pub course_name: String,
    pub course_code: String,
}

impl From<GradeViewRow> for GradeView {
    fn from(row: GradeViewRow) -> Self {
        let grade = Grade::from(row.grade);
        let course = CourseSummary {
            id: grade.course_id.clone(),
            name: row.course_name,
            code: row.course_code,
        };

        Self {
            grade,
            course,
            student: row.student.into_summary(),
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct ClubRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo: String,
    pub president_id: Option<String>,
    pub created_at: i64,
    pub members: Option<String>,
    #[sqlx(default)]
    pub event_count: i64,
}

impl From<ClubRow> for Club {
    fn from(row: ClubRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            logo: row.logo,
            president_id: row.president_id,
            members: split_ids(row.members),
            created_at: millis_to_utc(row.created_at),
        }
    }
}

impl From<ClubRow> for ClubWithEventCount {
    fn from(row: ClubRow) -> Self {
        let event_count = row.event_count;
        Self {
            club: row.into(),
            event_count,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub struct EventRow {
    pub id: String,
    pub club_id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub photo: String,
    pub seats_available: i64,
    pub created_at: i64,
    pub participants: Option<String>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            club_id: row.club_id,
            title: row.title,
            description: row.description,
            date: row.date,
            time: row.time,
            location: row.location,
            photo: row.photo,
            seats_available: row.seats_available,
            participants: split_ids(row.participants),
            created_at: millis_to_utc(row.created_at),
        }
    }
}
