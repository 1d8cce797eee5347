//! Authentication endpoints and request extractors

use axum::{
    async_trait,
    extract::{FromRequestParts, State},
    http::request::Parts,
    response::Json,
    routing::{get, post},
    RequestPartsExt, Router,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};

use super::{ApiResponse, AppState, JsonBody};
use crate::error::{AppError, AppResult};
use crate::models::{PublicUser, Role, User};
use crate::services::{require_role, LoginRequest, LoginResponse};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(login))
        .route("/me", get(me))
}

/// The account behind a valid bearer token
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| AppError::authentication_failed("No token provided"))?;

        let user = state.auth.authenticate(bearer.token()).await?;
        Ok(AuthUser(user))
    }
}

/// An authenticated professor
#[derive(Debug, Clone)]
pub struct ProfessorUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for ProfessorUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        require_role(&user, &[Role::Professor])?;
        Ok(ProfessorUser(user))
    }
}

/// An authenticated administrator
#[derive(Debug, Clone)]
pub struct AdminUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        require_role(&user, &[Role::Admin])?;
        Ok(AdminUser(user))
    }
}

/// Exchange credentials for an access token
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> AppResult<Json<ApiResponse<LoginResponse>>> {
    let response = state.auth.login(request).await?;
    Ok(ApiResponse::with_message("Login successful", response))
}

/// The public profile of the caller
pub async fn me(AuthUser(user): AuthUser) -> Json<ApiResponse<PublicUser>> {
    ApiResponse::ok(PublicUser::from(&user))
}
