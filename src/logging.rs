//! Logging configuration for Campus Portal
//!
//! Structured logging setup with appropriate levels and formatting.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Initialize the application logging system.
///
/// `RUST_LOG` wins over the configured level. Production emits JSON lines,
/// every other environment a compact console format.
pub fn init_logging(config: &Config) {
    let default_filter = format!(
        "campus_portal={},tower_http=info,axum::rejection=trace",
        config.log_level
    );

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let registry = tracing_subscriber::registry().with(env_filter);

    let result = if config.is_production() {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init()
    } else {
        registry
            .with(fmt::layer().with_target(false).compact().with_ansi(true))
            .try_init()
    };

    // A second initialisation (tests) keeps the first subscriber.
    if result.is_ok() {
        tracing::info!("Logging system initialized");
    }
}

/// Create a span for request logging
#[macro_export]
macro_rules! request_span {
    ($method:expr, $path:expr) => {
        tracing::info_span!(
            "http_request",
            method = %$method,
            path = %$path,
            status_code = tracing::field::Empty,
            duration_ms = tracing::field::Empty,
        )
    };
}

/// Create a span for database operations
#[macro_export]
macro_rules! db_span {
    ($operation:expr, $table:expr) => {
        tracing::debug_span!(
            "database_operation",
            operation = %$operation,
            table = %$table,
            rows = tracing::field::Empty,
        )
    };
}

/// Create a span for a dashboard computation
#[macro_export]
macro_rules! report_span {
    ($user_id:expr) => {
        tracing::info_span!(
            "dashboard_report",
            user_id = %$user_id,
            courses = tracing::field::Empty,
            sessions = tracing::field::Empty,
            absences = tracing::field::Empty,
        )
    };
}

/// Log application startup
pub fn log_startup() {
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        git_commit = option_env!("GIT_COMMIT").unwrap_or("unknown"),
        "Campus Portal starting up"
    );
}

/// Log authentication event
pub fn log_authentication_event(event: &str, subject: Option<&str>, success: bool) {
    if success {
        tracing::info!(event = %event, subject = ?subject, "Authentication successful");
    } else {
        tracing::warn!(event = %event, subject = ?subject, "Authentication failed");
    }
}

/// Log a completed dashboard snapshot
pub fn log_dashboard_built(
    professor_id: &str,
    courses: usize,
    sessions: usize,
    absences: usize,
    attendance_rate: i64,
) {
    tracing::info!(
        professor_id = %professor_id,
        courses,
        sessions,
        absences,
        attendance_rate,
        "Dashboard snapshot built"
    );
}

/// Log an absence write (create, update, delete)
pub fn log_absence_change(operation: &str, absence_id: &str, professor_id: &str) {
    tracing::info!(
        operation = %operation,
        absence_id = %absence_id,
        professor_id = %professor_id,
        "Absence changed"
    );
}

/// Log the outcome of a batch grade insertion
pub fn log_grade_batch(professor_id: &str, requested: usize, persisted: usize) {
    if requested == persisted {
        tracing::info!(professor_id = %professor_id, persisted, "Grade batch stored");
    } else {
        tracing::warn!(
            professor_id = %professor_id,
            requested,
            persisted,
            "Grade batch stopped early"
        );
    }
}

/// Log database operation
pub fn log_database_operation(operation: &str, table: &str, rows_affected: Option<u64>) {
    tracing::debug!(
        operation = %operation,
        table = %table,
        rows_affected = ?rows_affected,
        "Database operation completed"
    );
}

/// Log error with context
pub fn log_error(error: &str, context: &str, subject: Option<&str>) {
    tracing::error!(
        error = %error,
        context = %context,
        subject = ?subject,
        "Application error occurred"
    );
}
