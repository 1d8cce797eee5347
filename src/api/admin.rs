//! Administration endpoints: clubs and their events
//!
//! Reads are public so that the portal can list clubs before login.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};

use super::{created, dashboards, AdminUser, ApiResponse, AppState, JsonBody, QueryParams};
use crate::error::AppResult;
use crate::models::{Club, ClubDetail, ClubUpdate, ClubWithEventCount, Event, NewClub};
use crate::services::{EventQuery, EventRequest};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(dashboards::admin_dashboard))
        .route("/clubs", get(list_clubs).post(create_club))
        .route("/clubs/:id", get(get_club).put(update_club))
        .route("/events", get(list_events).post(create_event))
}

pub async fn list_clubs(
    State(state): State<AppState>,
) -> AppResult<Json<ApiResponse<Vec<ClubWithEventCount>>>> {
    let clubs = state.clubs.list_clubs().await?;
    Ok(ApiResponse::list(clubs))
}

pub async fn get_club(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<ClubDetail>>> {
    let club = state.clubs.get_club(&id).await?;
    Ok(ApiResponse::ok(club))
}

pub async fn create_club(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    JsonBody(new): JsonBody<NewClub>,
) -> AppResult<(StatusCode, Json<ApiResponse<Club>>)> {
    let club = state.clubs.create_club(new).await?;
    Ok(created(club))
}

pub async fn update_club(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<String>,
    JsonBody(update): JsonBody<ClubUpdate>,
) -> AppResult<Json<ApiResponse<Club>>> {
    let club = state.clubs.update_club(&id, update).await?;
    Ok(ApiResponse::ok(club))
}

/// Events sorted by date then time, optionally for one club (`?clubId=`)
pub async fn list_events(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<EventQuery>,
) -> AppResult<Json<ApiResponse<Vec<Event>>>> {
    let events = state.clubs.list_events(query).await?;
    Ok(ApiResponse::list(events))
}

pub async fn create_event(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    JsonBody(request): JsonBody<EventRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Event>>)> {
    let event = state.clubs.create_event(request).await?;
    Ok(created(event))
}
