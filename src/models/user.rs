//! User, Professor and Student Models
//!
//! Accounts carry a role; professor and student profiles hang off an account
//! one-to-one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role used for route authorization
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
pub enum Role {
    Admin,
    Professor,
    Student,
    #[serde(alias = "president")]
    #[strum(to_string = "club_president", serialize = "president")]
    ClubPresident,
}

/// Stored account
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[serde(skip_serializing)]
    pub salt: String,
    pub photo_url: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Account fields safe to return to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub photo_url: String,
}

impl From<&User> for PublicUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            photo_url: user.photo_url.clone(),
        }
    }
}

impl User {
    pub const MIN_PASSWORD_LENGTH: usize = 6;

    /// Emails are compared lower-cased and trimmed.
    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }

    /// Validate the fields of a new account before it is hashed and stored
    pub fn validate_new(name: &str, email: &str, password: &str) -> Result<(), UserError> {
        if name.trim().is_empty() {
            return Err(UserError::MissingName);
        }
        let email = Self::normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(UserError::InvalidEmail(email));
        }
        if password.len() < Self::MIN_PASSWORD_LENGTH {
            return Err(UserError::PasswordTooShort(Self::MIN_PASSWORD_LENGTH));
        }
        Ok(())
    }
}

/// Professor profile joined with its account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Professor {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub employee_number: String,
    pub specialty: String,
    pub office: String,
}

impl Professor {
    pub const DEFAULT_OFFICE: &'static str = "Unassigned";
}

/// Student profile joined with its account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub program: String,
    pub study_year: i64,
}

impl Student {
    pub fn validate_study_year(year: i64) -> Result<(), UserError> {
        if (1..=5).contains(&year) {
            Ok(())
        } else {
            Err(UserError::InvalidStudyYear(year))
        }
    }
}

/// Compact student reference used in joined views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub registration_number: String,
    pub program: String,
}

impl From<Student> for StudentSummary {
    fn from(student: Student) -> Self {
        Self {
            id: student.id,
            name: student.name,
            email: student.email,
            registration_number: student.registration_number,
            program: student.program,
        }
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum UserError {
    #[error("Name is required")]
    MissingName,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),

    #[error("Study year must be between 1 and 5, got {0}")]
    InvalidStudyYear(i64),
}

impl From<UserError> for crate::error::AppError {
    fn from(err: UserError) -> Self {
        crate::error::AppError::Validation(err.to_string())
    }
}
