//! Database connection manager
//!
//! Owns the SQLite pool and creates the schema at start-up.

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{query, query_scalar};
use std::str::FromStr;
use tracing::{debug, info};

/// Database connection manager
#[derive(Debug, Clone)]
pub struct DatabaseManager {
    pub pool: SqlitePool,
}

impl DatabaseManager {
    /// Create a new database manager with the given connection URL
    pub async fn new(database_url: &str) -> Result<Self> {
        info!("Connecting to database: {}", database_url);

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| anyhow::anyhow!("Invalid database URL: {}", e))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to `:memory:` opens its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to database: {}", e))?;

        debug!("Successfully connected to SQLite database");

        Ok(Self { pool })
    }

    /// Fresh in-memory database with the schema applied
    pub async fn in_memory() -> Result<Self> {
        let db = Self::new("sqlite::memory:").await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Run database migrations
    pub async fn migrate(&self) -> Result<()> {
        info!("Running database migrations");
        self.create_tables().await?;
        info!("Database migrations completed successfully");
        Ok(())
    }

    /// Create database tables
    async fn create_tables(&self) -> Result<()> {
        for statement in SCHEMA {
            query(statement).execute(&self.pool).await?;
        }

        debug!("SQLite tables created successfully");
        Ok(())
    }

    /// Test database connection
    pub async fn test_connection(&self) -> Result<()> {
        let one: i64 = query_scalar("SELECT 1").fetch_one(&self.pool).await?;
        debug!("Database connection test successful ({})", one);
        Ok(())
    }

    /// Close the pool, waiting for checked-out connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        email TEXT UNIQUE NOT NULL,
        password_hash TEXT NOT NULL,
        salt TEXT NOT NULL,
        photo_url TEXT NOT NULL DEFAULT '',
        role TEXT NOT NULL CHECK (role IN ('admin', 'professor', 'student', 'club_president')),
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS professors (
        id TEXT PRIMARY KEY,
        user_id TEXT UNIQUE NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        employee_number TEXT UNIQUE NOT NULL,
        specialty TEXT NOT NULL DEFAULT '',
        office TEXT NOT NULL DEFAULT 'Unassigned'
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS students (
        id TEXT PRIMARY KEY,
        user_id TEXT UNIQUE NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        registration_number TEXT UNIQUE NOT NULL,
        program TEXT NOT NULL,
        study_year INTEGER NOT NULL CHECK (study_year BETWEEN 1 AND 5)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS departments (
        id TEXT PRIMARY KEY,
        name TEXT UNIQUE NOT NULL,
        code TEXT UNIQUE NOT NULL,
        description TEXT NOT NULL DEFAULT ''
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS rooms (
        id TEXT PRIMARY KEY,
        number TEXT UNIQUE NOT NULL,
        building TEXT NOT NULL,
        capacity INTEGER NOT NULL CHECK (capacity > 0),
        kind TEXT NOT NULL CHECK (kind IN ('amphitheater', 'classroom', 'lab_room', 'tutorial_room'))
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        id TEXT PRIMARY KEY,
        name TEXT NOT NULL,
        code TEXT UNIQUE NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        credits INTEGER NOT NULL CHECK (credits BETWEEN 1 AND 10),
        semester TEXT NOT NULL,
        professor_id TEXT NOT NULL REFERENCES professors(id),
        department_id TEXT REFERENCES departments(id),
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        course_id TEXT NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        room_id TEXT NOT NULL REFERENCES rooms(id),
        date INTEGER NOT NULL,
        start_time TEXT NOT NULL,
        end_time TEXT NOT NULL,
        kind TEXT NOT NULL CHECK (kind IN ('lecture', 'tutorial', 'lab')),
        notes TEXT NOT NULL DEFAULT '',
        CHECK (start_time < end_time),
        UNIQUE (room_id, date, start_time)
    )
    "#,
    // student_id is not a foreign key: absences may outlive their student
    r#"
    CREATE TABLE IF NOT EXISTS absences (
        id TEXT PRIMARY KEY,
        student_id TEXT,
        session_id TEXT NOT NULL REFERENCES sessions(id) ON DELETE CASCADE,
        date INTEGER NOT NULL,
        justified BOOLEAN NOT NULL DEFAULT FALSE,
        reason TEXT NOT NULL DEFAULT '',
        created_at INTEGER NOT NULL,
        UNIQUE (student_id, session_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS grades (
        id TEXT PRIMARY KEY,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        course_id TEXT NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
        student_id TEXT NOT NULL REFERENCES students(id),
        due_date INTEGER NOT NULL,
        score REAL CHECK (score IS NULL OR (score >= 0 AND score <= 20)),
        comment TEXT NOT NULL DEFAULT '',
        status TEXT NOT NULL DEFAULT 'pending' CHECK (status IN ('pending', 'submitted', 'graded')),
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS clubs (
        id TEXT PRIMARY KEY,
        name TEXT UNIQUE NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        logo TEXT NOT NULL DEFAULT '',
        president_id TEXT REFERENCES students(id),
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS club_members (
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        PRIMARY KEY (club_id, student_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS events (
        id TEXT PRIMARY KEY,
        club_id TEXT NOT NULL REFERENCES clubs(id) ON DELETE CASCADE,
        title TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        date TEXT NOT NULL,
        time TEXT NOT NULL,
        location TEXT NOT NULL,
        photo TEXT NOT NULL DEFAULT '',
        seats_available INTEGER NOT NULL DEFAULT 0 CHECK (seats_available >= 0),
        created_at INTEGER NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS event_participants (
        event_id TEXT NOT NULL REFERENCES events(id) ON DELETE CASCADE,
        student_id TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
        PRIMARY KEY (event_id, student_id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_courses_professor ON courses(professor_id)",
    "CREATE INDEX IF NOT EXISTS idx_sessions_course_date ON sessions(course_id, date)",
    "CREATE INDEX IF NOT EXISTS idx_absences_session ON absences(session_id)",
    "CREATE INDEX IF NOT EXISTS idx_grades_course ON grades(course_id)",
    "CREATE INDEX IF NOT EXISTS idx_events_club ON events(club_id)",
];
