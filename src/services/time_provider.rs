//! Time Provider Trait and Implementations
//!
//! Provides time abstraction for deterministic testing and production use.
//! The reporting engine and schedule queries read "now" exclusively through
//! this trait so their day and week buckets can be pinned in tests.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::{Arc, Mutex};

/// Trait for providing time functionality
pub trait TimeProvider: Send + Sync {
    /// Get the current UTC time
    fn now_utc(&self) -> DateTime<Utc>;

    /// Get current time in a specific timezone
    fn now_in_timezone(&self, timezone: Tz) -> DateTime<Tz> {
        self.now_utc().with_timezone(&timezone)
    }

    /// Current calendar date in a specific timezone
    fn today_in_timezone(&self, timezone: Tz) -> NaiveDate {
        self.now_in_timezone(timezone).date_naive()
    }
}

/// System time provider for production use
#[derive(Debug, Clone, Default)]
pub struct SystemTimeProvider;

impl SystemTimeProvider {
    pub fn new() -> Self {
        Self
    }
}

impl TimeProvider for SystemTimeProvider {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Mock time provider for testing
#[derive(Debug, Clone)]
pub struct MockTimeProvider {
    current_time: Arc<Mutex<DateTime<Utc>>>,
}

impl MockTimeProvider {
    /// Create a new mock time provider starting from the given time
    pub fn new(start_time: DateTime<Utc>) -> Self {
        Self {
            current_time: Arc::new(Mutex::new(start_time)),
        }
    }

    /// Create a mock time provider starting from a specific UTC date/time
    pub fn new_from_ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, min, sec)
            .single()
            .map(Self::new)
    }

    /// Set the current mock time
    pub fn set_time(&self, new_time: DateTime<Utc>) {
        if let Ok(mut time) = self.current_time.lock() {
            *time = new_time;
        }
    }

    /// Advance the mock time by the specified duration
    pub fn advance(&self, duration: chrono::Duration) {
        if let Ok(mut time) = self.current_time.lock() {
            *time += duration;
        }
    }

    /// Advance the mock time by the specified number of days
    pub fn advance_days(&self, days: i64) {
        self.advance(chrono::Duration::days(days));
    }

    /// Get the current mock time
    pub fn current_time(&self) -> DateTime<Utc> {
        match self.current_time.lock() {
            Ok(time) => *time,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_utc(&self) -> DateTime<Utc> {
        self.current_time()
    }
}
