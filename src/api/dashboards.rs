//! Landing dashboards for the admin, student and club-president roles

use axum::{extract::State, response::Json};
use serde::Serialize;

use super::{AdminUser, ApiResponse, AppState, AuthUser};
use crate::database::AcademicRepository;
use crate::error::AppResult;
use crate::models::{Club, PublicUser, Role};
use crate::services::require_role;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Welcome {
    pub user: PublicUser,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club: Option<Club>,
}

fn welcome(role: &str, user: PublicUser, club: Option<Club>) -> Json<ApiResponse<Welcome>> {
    ApiResponse::with_message(format!("Welcome to the {} dashboard", role), Welcome { user, club })
}

pub async fn admin_dashboard(AdminUser(user): AdminUser) -> Json<ApiResponse<Welcome>> {
    welcome("admin", PublicUser::from(&user), None)
}

pub async fn student_dashboard(AuthUser(user): AuthUser) -> AppResult<Json<ApiResponse<Welcome>>> {
    require_role(&user, &[Role::Student])?;
    Ok(welcome("student", PublicUser::from(&user), None))
}

/// The president also gets the club they run, when one is assigned
pub async fn club_dashboard(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<ApiResponse<Welcome>>> {
    require_role(&user, &[Role::ClubPresident])?;

    let club = match state.db.find_student_by_user(&user.id).await? {
        Some(student) => state.db.find_club_by_president(&student.id).await?,
        None => None,
    };
    Ok(welcome("club president", PublicUser::from(&user), club))
}
