//! Clubs and events

use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::database::DatabaseManager;
use crate::error::{AppError, AppResult};
use crate::models::{Club, ClubDetail, ClubUpdate, ClubWithEventCount, Event, NewClub, NewEvent};
use crate::services::time_provider::TimeProvider;

const DUPLICATE_CLUB: &str = "A club with this name already exists";

/// Body of an event to be created; missing fields are reported together
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub club_id: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
    pub location: Option<String>,
    pub photo: Option<String>,
    pub seats_available: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventQuery {
    pub club_id: Option<String>,
}

pub struct ClubService {
    db: DatabaseManager,
    clock: Arc<dyn TimeProvider>,
}

impl ClubService {
    pub fn new(db: DatabaseManager, clock: Arc<dyn TimeProvider>) -> Self {
        Self { db, clock }
    }

    pub async fn list_clubs(&self) -> AppResult<Vec<ClubWithEventCount>> {
        self.db.list_clubs().await
    }

    /// A club with its events sorted by (date, time)
    pub async fn get_club(&self, club_id: &str) -> AppResult<ClubDetail> {
        let club = self
            .db
            .find_club(club_id)
            .await?
            .ok_or_else(|| AppError::not_found("Club"))?;
        let events = self.db.list_events(Some(club_id)).await?;
        Ok(ClubDetail { club, events })
    }

    pub async fn create_club(&self, new: NewClub) -> AppResult<Club> {
        let club = Club::create(new, self.clock.now_utc())?;
        if self.db.find_club_by_name(&club.name).await?.is_some() {
            return Err(AppError::validation_error(DUPLICATE_CLUB));
        }

        self.db.insert_club(&club).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::validation_error(DUPLICATE_CLUB),
            other => other,
        })?;
        Ok(club)
    }

    pub async fn update_club(&self, club_id: &str, update: ClubUpdate) -> AppResult<Club> {
        let mut club = self
            .db
            .find_club(club_id)
            .await?
            .ok_or_else(|| AppError::not_found("Club"))?;

        club.apply(update)?;
        if let Some(existing) = self.db.find_club_by_name(&club.name).await? {
            if existing.id != club.id {
                return Err(AppError::validation_error(DUPLICATE_CLUB));
            }
        }

        self.db.update_club(&club).await?;
        Ok(club)
    }

    pub async fn create_event(&self, request: EventRequest) -> AppResult<Event> {
        let (Some(club_id), Some(title), Some(date), Some(time), Some(location)) = (
            request.club_id,
            request.title,
            request.date,
            request.time,
            request.location,
        ) else {
            return Err(AppError::validation_error(
                "title, date, time, location and club are required",
            ));
        };

        let event = Event::create(
            NewEvent {
                club_id,
                title,
                description: request.description.unwrap_or_default(),
                date,
                time,
                location,
                photo: request.photo.unwrap_or_default(),
                seats_available: request.seats_available.unwrap_or(0),
            },
            self.clock.now_utc(),
        )?;

        if self.db.find_club(&event.club_id).await?.is_none() {
            return Err(AppError::not_found("Club"));
        }

        self.db.insert_event(&event).await?;
        Ok(event)
    }

    pub async fn list_events(&self, query: EventQuery) -> AppResult<Vec<Event>> {
        let club_id = query.club_id.filter(|id| !id.trim().is_empty());
        self.db.list_events(club_id.as_deref()).await
    }
}
