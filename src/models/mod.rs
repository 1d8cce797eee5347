//! Models module for Campus Portal
//!
//! Contains all data models and their validation logic.

pub mod absence;
pub mod club;
pub mod course;
pub mod dashboard;
pub mod grade;
pub mod session;
pub mod user;

// Re-export commonly used types
pub use absence::{Absence, AbsenceUpdate};
pub use club::{Club, ClubDetail, ClubError, ClubUpdate, ClubWithEventCount, Event, NewClub, NewEvent};
pub use course::{Course, CourseError, CourseSummary, CourseView, Department, Room, RoomKind, RoomSummary, Semester};
pub use dashboard::{
    AbsenceView, DashboardSnapshot, DashboardStats, GradeView, ProfessorSummary, SessionRef, SessionView,
};
pub use grade::{Grade, GradeError, GradeStatus, GradeUpdate, NewGrade};
pub use session::{is_clock_time, Session, SessionError, SessionKind};
pub use user::{Professor, PublicUser, Role, Student, StudentSummary, User, UserError};
