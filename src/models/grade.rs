//! Grade Model
//!
//! A gradable item tied to one course and one student. Attaching a score
//! always moves the record to `graded`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
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
pub enum GradeStatus {
    #[default]
    Pending,
    Submitted,
    Graded,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Grade {
    pub id: String,
    pub title: String,
    pub description: String,
    pub course_id: String,
    pub student_id: String,
    pub due_date: DateTime<Utc>,
    pub score: Option<f64>,
    pub comment: String,
    pub status: GradeStatus,
    pub created_at: DateTime<Utc>,
}

/// Fields of a grade to be created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGrade {
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub course_id: String,
    pub student_id: String,
    pub due_date: DateTime<Utc>,
    pub score: Option<f64>,
    #[serde(default)]
    pub comment: String,
    pub status: Option<GradeStatus>,
}

/// Editable fields of a grade
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GradeUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
    pub score: Option<f64>,
    pub comment: Option<String>,
    pub status: Option<GradeStatus>,
}

impl Grade {
    pub const MIN_SCORE: f64 = 0.0;
    pub const MAX_SCORE: f64 = 20.0;

    pub fn validate_score(score: f64) -> Result<(), GradeError> {
        if score.is_finite() && (Self::MIN_SCORE..=Self::MAX_SCORE).contains(&score) {
            Ok(())
        } else {
            Err(GradeError::ScoreOutOfRange(score))
        }
    }

    /// Build a grade record. A present score forces `graded`.
    pub fn create(new: NewGrade, now: DateTime<Utc>) -> Result<Self, GradeError> {
        let title = new.title.trim();
        if title.is_empty() {
            return Err(GradeError::MissingTitle);
        }
        if let Some(score) = new.score {
            Self::validate_score(score)?;
        }

        let status = match new.score {
            Some(_) => GradeStatus::Graded,
            None => new.status.unwrap_or_default(),
        };

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            title: title.to_string(),
            description: new.description,
            course_id: new.course_id,
            student_id: new.student_id,
            due_date: new.due_date,
            score: new.score,
            comment: new.comment,
            status,
            created_at: now,
        })
    }

    pub fn apply(&mut self, update: GradeUpdate) -> Result<(), GradeError> {
        if let Some(score) = update.score {
            Self::validate_score(score)?;
        }
        if let Some(title) = update.title {
            let title = title.trim();
            if title.is_empty() {
                return Err(GradeError::MissingTitle);
            }
            self.title = title.to_string();
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(due_date) = update.due_date {
            self.due_date = due_date;
        }
        if let Some(comment) = update.comment {
            self.comment = comment;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(score) = update.score {
            self.score = Some(score);
        }
        if self.score.is_some() {
            self.status = GradeStatus::Graded;
        }
        Ok(())
    }
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GradeError {
    #[error("Grade title is required")]
    MissingTitle,

    #[error("Score must be between 0 and 20, got {0}")]
    ScoreOutOfRange(f64),
}

impl From<GradeError> for crate::error::AppError {
    fn from(err: GradeError) -> Self {
        crate::error::AppError::Validation(err.to_string())
    }
}
