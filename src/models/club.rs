//! Club and Event Models
//!
//! Logos and photos are stored-file paths handed over by the upload layer.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::session::is_clock_time;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Club {
    pub id: String,
    pub name: String,
    pub description: String,
    pub logo: String,
    pub president_id: Option<String>,
    pub members: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubWithEventCount {
    #[serde(flatten)]
    pub club: Club,
    pub event_count: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubDetail {
    #[serde(flatten)]
    pub club: Club,
    pub events: Vec<Event>,
}

/// Fields of a club to be created
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewClub {
    pub name: String,
    pub description: String,
    pub logo: String,
    pub president_id: Option<String>,
}

/// Partial club update; absent fields keep their value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClubUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub logo: Option<String>,
    pub president_id: Option<String>,
}

impl Club {
    pub fn create(new: NewClub, now: DateTime<Utc>) -> Result<Self, ClubError> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(ClubError::MissingField("name"));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            description: new.description,
            logo: new.logo,
            president_id: new.president_id,
            members: Vec::new(),
            created_at: now,
        })
    }

    pub fn apply(&mut self, update: ClubUpdate) -> Result<(), ClubError> {
        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(ClubError::MissingField("name"));
            }
            self.name = name.to_string();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(logo) = update.logo.filter(|logo| !logo.is_empty()) {
            self.logo = logo;
        }
        if let Some(president_id) = update.president_id {
            self.president_id = Some(president_id);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,
    pub club_id: String,
    pub title: String,
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    pub photo: String,
    pub seats_available: i64,
    pub participants: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Fields of an event to be created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
    pub club_id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub date: NaiveDate,
    pub time: String,
    pub location: String,
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub seats_available: i64,
}

impl Event {
    pub fn create(new: NewEvent, now: DateTime<Utc>) -> Result<Self, ClubError> {
        if new.club_id.trim().is_empty() {
            return Err(ClubError::MissingField("club"));
        }
        let title = new.title.trim();
        if title.is_empty() {
            return Err(ClubError::MissingField("title"));
        }
        let location = new.location.trim();
        if location.is_empty() {
            return Err(ClubError::MissingField("location"));
        }
        if !is_clock_time(&new.time) {
            return Err(ClubError::InvalidTime(new.time));
        }
        if new.seats_available < 0 {
            return Err(ClubError::NegativeSeats(new.seats_available));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            club_id: new.club_id,
            title: title.to_string(),
            description: new.description,
            date: new.date,
            time: new.time,
            location: location.to_string(),
            photo: new.photo,
            seats_available: new.seats_available,
            participants: Vec::new(),
            created_at: now,
        })
    }

    pub fn is_full(&self) -> bool {
        self.participants.len() as i64 >= self.seats_available
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ClubError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid time format (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Available seats cannot be negative, got {0}")]
    NegativeSeats(i64),
}

impl From<ClubError> for crate::error::AppError {
    fn from(err: ClubError) -> Self {
        crate::error::AppError::Validation(err.to_string())
    }
}
