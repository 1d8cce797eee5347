//! Services module for Campus Portal
//!
//! Contains all business logic and service implementations.

pub mod auth_service;
pub mod calendar;
pub mod club_service;
pub mod professor_service;
pub mod reporting_service;
pub mod time_provider;

// Re-export commonly used services
pub use auth_service::{require_role, AuthService, Claims, LoginRequest, LoginResponse, NewAccount};
pub use calendar::{day_window, week_window, Window};
pub use club_service::{ClubService, EventQuery, EventRequest};
pub use professor_service::{
    AbsenceQuery, AbsenceRequest, BatchGradeEntry, BatchGradeOutcome, BatchGradeRequest, GradeQuery,
    GradeRequest, ProfessorService, ScheduleView, SessionQuery,
};
pub use reporting_service::ReportingService;
pub use time_provider::{MockTimeProvider, SystemTimeProvider, TimeProvider};
