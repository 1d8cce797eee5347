//! Joined read views and the professor dashboard snapshot
//!
//! These types are built per request and never stored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    absence::Absence,
    course::{Course, CourseSummary, RoomSummary},
    grade::Grade,
    session::Session,
    user::StudentSummary,
};

/// Session joined with its course and room
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView {
    #[serde(flatten)]
    pub session: Session,
    pub course: CourseSummary,
    pub room: Option<RoomSummary>,
}

/// Session fields shown next to an absence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRef {
    pub id: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub course: CourseSummary,
}

/// Absence joined with its student and session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceView {
    #[serde(flatten)]
    pub absence: Absence,
    pub student: Option<StudentSummary>,
    pub session: SessionRef,
}

/// Grade joined with its course and student
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeView {
    #[serde(flatten)]
    pub grade: Grade,
    pub course: CourseSummary,
    pub student: Option<StudentSummary>,
}

/// Professor display fields
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfessorSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub photo_url: String,
    pub employee_number: String,
    pub specialty: String,
    pub office: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub courses_assigned: usize,
    pub total_students: usize,
    pub sessions_completed: usize,
    pub attendance_rate: i64,
    pub sessions_remaining: usize,
}

/// Everything the professor dashboard shows, computed in one pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub professor: ProfessorSummary,
    pub stats: DashboardStats,
    pub today_sessions: Vec<SessionView>,
    pub week_sessions: Vec<SessionView>,
    pub recent_absences: Vec<AbsenceView>,
    pub courses: Vec<Course>,
}
