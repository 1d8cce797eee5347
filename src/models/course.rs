//! Course, Department and Room Models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Semester tag, S1 through S8
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    sqlx::Type,
    strum::Display,
    strum::EnumString,
)]
pub enum Semester {
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    S8,
}

/// Stored course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: String,
    pub credits: i64,
    pub semester: Semester,
    pub professor_id: String,
    pub department_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Course {
    pub const MIN_CREDITS: i64 = 1;
    pub const MAX_CREDITS: i64 = 10;

    /// Build a new course, validating and normalizing its fields
    pub fn new(
        name: &str,
        code: &str,
        credits: i64,
        semester: Semester,
        professor_id: &str,
        department_id: Option<String>,
    ) -> Result<Self, CourseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CourseError::MissingName);
        }
        let code = code.trim().to_uppercase();
        if code.is_empty() {
            return Err(CourseError::MissingCode);
        }
        if !(Self::MIN_CREDITS..=Self::MAX_CREDITS).contains(&credits) {
            return Err(CourseError::InvalidCredits(credits));
        }

        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            code,
            description: String::new(),
            credits,
            semester,
            professor_id: professor_id.to_string(),
            department_id,
            created_at: Utc::now(),
        })
    }

    pub fn is_owned_by(&self, professor_id: &str) -> bool {
        self.professor_id == professor_id
    }

    pub fn summary(&self) -> CourseSummary {
        CourseSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            code: self.code.clone(),
        }
    }
}

/// Course reference embedded in joined views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseSummary {
    pub id: String,
    pub name: String,
    pub code: String,
}

/// Course as listed in a professor's workspace
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    #[serde(flatten)]
    pub course: Course,
    pub department_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Department {
    pub id: String,
    pub name: String,
    pub code: String,
    pub description: String,
}

/// Kind of teaching room
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
pub enum RoomKind {
    Amphitheater,
    Classroom,
    LabRoom,
    TutorialRoom,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: String,
    pub number: String,
    pub building: String,
    pub capacity: i64,
    pub kind: RoomKind,
}

impl Room {
    pub fn summary(&self) -> RoomSummary {
        RoomSummary {
            id: self.id.clone(),
            number: self.number.clone(),
            building: self.building.clone(),
        }
    }
}

/// Room reference embedded in joined views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomSummary {
    pub id: String,
    pub number: String,
    pub building: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum CourseError {
    #[error("Course name is required")]
    MissingName,

    #[error("Course code is required")]
    MissingCode,

    #[error("Credits must be between 1 and 10, got {0}")]
    InvalidCredits(i64),
}

impl From<CourseError> for crate::error::AppError {
    fn from(err: CourseError) -> Self {
        crate::error::AppError::Validation(err.to_string())
    }
}
