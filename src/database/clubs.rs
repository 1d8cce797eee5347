//! Club and event persistence

use sqlx::{query, query_as};

use super::connection::DatabaseManager;
use super::rows::{ClubRow, EventRow};
use crate::error::AppResult;
use crate::logging::log_database_operation;
use crate::models::{Club, ClubWithEventCount, Event};

const CLUB_SELECT: &str = r#"
    SELECT c.id, c.name, c.description, c.logo, c.president_id, c.created_at,
           (SELECT group_concat(m.student_id) FROM club_members m WHERE m.club_id = c.id) AS members,
           (SELECT COUNT(*) FROM events e WHERE e.club_id = c.id) AS event_count
    FROM clubs c
"#;

const EVENT_SELECT: &str = r#"
    SELECT e.id, e.club_id, e.title, e.description, e.date, e.time, e.location, e.photo,
           e.seats_available, e.created_at,
           (SELECT group_concat(p.student_id) FROM event_participants p WHERE p.event_id = e.id)
               AS participants
    FROM events e
"#;

impl DatabaseManager {
    /// All clubs with their event counts, sorted by name
    pub async fn list_clubs(&self) -> AppResult<Vec<ClubWithEventCount>> {
        let rows = query_as::<_, ClubRow>(&format!("{CLUB_SELECT} ORDER BY c.name"))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(ClubWithEventCount::from).collect())
    }

    pub async fn find_club(&self, club_id: &str) -> AppResult<Option<Club>> {
        let row = query_as::<_, ClubRow>(&format!("{CLUB_SELECT} WHERE c.id = ?"))
            .bind(club_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Club::from))
    }

    pub async fn find_club_by_name(&self, name: &str) -> AppResult<Option<Club>> {
        let row = query_as::<_, ClubRow>(&format!("{CLUB_SELECT} WHERE c.name = ?"))
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Club::from))
    }

    /// Club presided by the given student
    pub async fn find_club_by_president(&self, student_id: &str) -> AppResult<Option<Club>> {
        let row = query_as::<_, ClubRow>(&format!("{CLUB_SELECT} WHERE c.president_id = ?"))
            .bind(student_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Club::from))
    }

    pub async fn insert_club(&self, club: &Club) -> AppResult<()> {
        let result = query(
            r#"
            INSERT INTO clubs (id, name, description, logo, president_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&club.id)
        .bind(&club.name)
        .bind(&club.description)
        .bind(&club.logo)
        .bind(&club.president_id)
        .bind(club.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        log_database_operation("INSERT", "clubs", Some(result.rows_affected()));
        Ok(())
    }

    pub async fn update_club(&self, club: &Club) -> AppResult<()> {
        let result = query(
            "UPDATE clubs SET name = ?, description = ?, logo = ?, president_id = ? WHERE id = ?",
        )
        .bind(&club.name)
        .bind(&club.description)
        .bind(&club.logo)
        .bind(&club.president_id)
        .bind(&club.id)
        .execute(&self.pool)
        .await?;

        log_database_operation("UPDATE", "clubs", Some(result.rows_affected()));
        Ok(())
    }

    pub async fn add_club_member(&self, club_id: &str, student_id: &str) -> AppResult<()> {
        query("INSERT OR IGNORE INTO club_members (club_id, student_id) VALUES (?, ?)")
            .bind(club_id)
            .bind(student_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    pub async fn insert_event(&self, event: &Event) -> AppResult<()> {
        let result = query(
            r#"
            INSERT INTO events (id, club_id, title, description, date, time, location, photo,
                                seats_available, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&event.id)
        .bind(&event.club_id)
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.date)
        .bind(&event.time)
        .bind(&event.location)
        .bind(&event.photo)
        .bind(event.seats_available)
        .bind(event.created_at.timestamp_millis())
        .execute(&self.pool)
        .await?;

        log_database_operation("INSERT", "events", Some(result.rows_affected()));
        Ok(())
    }

    /// Events, optionally of one club, sorted by (date, time)
    pub async fn list_events(&self, club_id: Option<&str>) -> AppResult<Vec<Event>> {
        let rows = match club_id {
            Some(club_id) => {
                query_as::<_, EventRow>(&format!(
                    "{EVENT_SELECT} WHERE e.club_id = ? ORDER BY e.date, e.time"
                ))
                .bind(club_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                query_as::<_, EventRow>(&format!("{EVENT_SELECT} ORDER BY e.date, e.time"))
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(rows.into_iter().map(Event::from).collect())
    }

    pub async fn add_event_participant(&self, event_id: &str, student_id: &str) -> AppResult<()> {
        query("INSERT OR IGNORE INTO event_participants (event_id, student_id) VALUES (?, ?)")
            .bind(event_id)
            .bind(student_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
