//! Class Session Model
//!
//! One scheduled meeting of a course. Times are zero-padded `HH:MM` strings,
//! so lexicographic order is chronological order.

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CLOCK_TIME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[01][0-9]|2[0-3]):[0-5][0-9]$").expect("clock time pattern is valid")
});

/// Check that a string is a zero-padded 24h `HH:MM` time
pub fn is_clock_time(value: &str) -> bool {
    CLOCK_TIME.is_match(value)
}

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[sqlx(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SessionKind {
    Lecture,
    Tutorial,
    Lab,
}

/// Stored class session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub course_id: String,
    pub room_id: String,
    pub date: DateTime<Utc>,
    pub start_time: String,
    pub end_time: String,
    pub kind: SessionKind,
    pub notes: String,
}

impl Session {
    pub fn new(
        course_id: &str,
        room_id: &str,
        date: DateTime<Utc>,
        start_time: &str,
        end_time: &str,
        kind: SessionKind,
    ) -> Result<Self, SessionError> {
        Self::validate_times(start_time, end_time)?;

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            course_id: course_id.to_string(),
            room_id: room_id.to_string(),
            date,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            kind,
            notes: String::new(),
        })
    }

    pub fn validate_times(start_time: &str, end_time: &str) -> Result<(), SessionError> {
        if !is_clock_time(start_time) {
            return Err(SessionError::InvalidTime(start_time.to_string()));
        }
        if !is_clock_time(end_time) {
            return Err(SessionError::InvalidTime(end_time.to_string()));
        }
        if start_time >= end_time {
            return Err(SessionError::EndBeforeStart {
                start: start_time.to_string(),
                end: end_time.to_string(),
            });
        }
        Ok(())
    }

    /// Ordering key used for schedules: date, then start time.
    pub fn schedule_key(&self) -> (DateTime<Utc>, &str) {
        (self.date, self.start_time.as_str())
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Invalid time format (expected HH:MM): {0}")]
    InvalidTime(String),

    #[error("Start time {start} must be before end time {end}")]
    EndBeforeStart { start: String, end: String },
}

impl From<SessionError> for crate::error::AppError {
    fn from(err: SessionError) -> Self {
        crate::error::AppError::Validation(err.to_string())
    }
}
