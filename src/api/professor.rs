//! Professor API Endpoints
//!
//! Everything here is scoped to the calling professor's own courses.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, patch, post},
    Router,
};

use super::{acknowledged, created, ApiResponse, AppState, JsonBody, ProfessorUser, QueryParams};
use crate::error::AppResult;
use crate::models::{
    Absence, AbsenceUpdate, AbsenceView, CourseView, DashboardSnapshot, Grade, GradeUpdate, GradeView,
    SessionView, Student,
};
use crate::services::{
    AbsenceQuery, AbsenceRequest, BatchGradeOutcome, BatchGradeRequest, GradeQuery, GradeRequest,
    SessionQuery,
};

/// Create professor API routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboard))
        .route("/courses", get(my_courses))
        .route("/courses/:id/students", get(course_students))
        .route("/sessions", get(my_sessions))
        .route("/absences", get(my_absences).post(record_absence))
        .route("/absences/:id", patch(update_absence).delete(delete_absence))
        .route("/grades", get(my_grades).post(create_grade))
        .route("/grades/batch", post(batch_grades))
        .route("/grades/:id", patch(update_grade).delete(delete_grade))
        .route("/students", get(list_students))
}

/// Dashboard snapshot: stats, today's and this week's sessions, recent absences
pub async fn dashboard(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
) -> AppResult<Json<ApiResponse<DashboardSnapshot>>> {
    let snapshot = state.reporting.build_dashboard_snapshot(&user).await?;
    Ok(ApiResponse::ok(snapshot))
}

pub async fn my_courses(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
) -> AppResult<Json<ApiResponse<Vec<CourseView>>>> {
    let courses = state.professors.my_courses(&user).await?;
    Ok(ApiResponse::list(courses))
}

/// Sessions of the current week, or of one day with `?view=day&date=YYYY-MM-DD`
pub async fn my_sessions(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    QueryParams(query): QueryParams<SessionQuery>,
) -> AppResult<Json<ApiResponse<Vec<SessionView>>>> {
    let sessions = state.professors.my_sessions(&user, query).await?;
    Ok(ApiResponse::list(sessions))
}

pub async fn my_absences(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    QueryParams(query): QueryParams<AbsenceQuery>,
) -> AppResult<Json<ApiResponse<Vec<AbsenceView>>>> {
    let absences = state.professors.my_absences(&user, query).await?;
    Ok(ApiResponse::list(absences))
}

pub async fn record_absence(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    JsonBody(request): JsonBody<AbsenceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Absence>>)> {
    let absence = state.professors.record_absence(&user, request).await?;
    Ok(created(absence))
}

pub async fn update_absence(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<AbsenceUpdate>,
) -> AppResult<Json<ApiResponse<Absence>>> {
    let absence = state.professors.update_absence(&user, &id, update).await?;
    Ok(ApiResponse::ok(absence))
}

pub async fn delete_absence(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    state.professors.delete_absence(&user, &id).await?;
    Ok(acknowledged("Absence deleted"))
}

pub async fn my_grades(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    QueryParams(query): QueryParams<GradeQuery>,
) -> AppResult<Json<ApiResponse<Vec<GradeView>>>> {
    let grades = state.professors.my_grades(&user, query).await?;
    Ok(ApiResponse::list(grades))
}

pub async fn create_grade(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    JsonBody(request): JsonBody<GradeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Grade>>)> {
    let grade = state.professors.create_grade(&user, request).await?;
    Ok(created(grade))
}

/// Insert several graded records; a failure keeps what was already saved
pub async fn batch_grades(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    JsonBody(request): JsonBody<BatchGradeRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BatchGradeOutcome>>)> {
    let outcome = state.professors.batch_grades(&user, request).await?;
    let message = format!("{} grade(s) saved", outcome.count);
    Ok((StatusCode::CREATED, ApiResponse::with_message(message, outcome)))
}

pub async fn update_grade(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<GradeUpdate>,
) -> AppResult<Json<ApiResponse<Grade>>> {
    let grade = state.professors.update_grade(&user, &id, update).await?;
    Ok(ApiResponse::ok(grade))
}

pub async fn delete_grade(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    state.professors.delete_grade(&user, &id).await?;
    Ok(acknowledged("Grade deleted"))
}

pub async fn list_students(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
) -> AppResult<Json<ApiResponse<Vec<Student>>>> {
    let students = state.professors.list_students(&user).await?;
    Ok(ApiResponse::list(students))
}

pub async fn course_students(
    State(state): State<AppState>,
    ProfessorUser(user): ProfessorUser,
    Path(course_id): Path<String>,
) -> AppResult<Json<ApiResponse<Vec<Student>>>> {
    let students = state.professors.course_students(&user, &course_id).await?;
    Ok(ApiResponse::list(students))
}
