//! Absence Model
//!
//! One record per (student, session). The date is copied from the session
//! when the absence is recorded. The only transitions after creation are
//! toggling the justification and deleting the record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::session::Session;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Absence {
    pub id: String,
    pub student_id: Option<String>,
    pub session_id: String,
    pub date: DateTime<Utc>,
    pub justified: bool,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

impl Absence {
    /// New unjustified absence of `student_id` at `session`
    pub fn record(student_id: &str, session: &Session, now: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            student_id: Some(student_id.to_string()),
            session_id: session.id.clone(),
            date: session.date,
            justified: false,
            reason: String::new(),
            created_at: now,
        }
    }

    pub fn apply(&mut self, update: AbsenceUpdate) {
        if let Some(justified) = update.justified {
            self.justified = justified;
        }
        if let Some(reason) = update.reason {
            self.reason = reason;
        }
    }
}

/// Editable fields of an absence
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AbsenceUpdate {
    pub justified: Option<bool>,
    pub reason: Option<String>,
}
