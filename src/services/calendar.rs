//! Calendar boundaries
//!
//! Day and week windows in a given time zone, expressed as UTC instants so
//! they can be compared directly against stored session dates.

use chrono::{DateTime, Datelike, Duration, LocalResult, NaiveDate, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Half-open window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl Window {
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Last millisecond inside the window.
    pub fn last_instant(&self) -> DateTime<Utc> {
        self.end - Duration::milliseconds(1)
    }
}

/// Local midnight of `date` in `tz`. A midnight skipped by a DST jump
/// resolves to the first valid local instant after it.
pub fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(NaiveTime::MIN);
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt.with_timezone(&Utc),
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        LocalResult::None => tz
            .from_local_datetime(&(naive + Duration::hours(1)))
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or_else(|| Utc.from_utc_datetime(&naive)),
    }
}

/// Calendar day containing `date`: `[00:00, next day 00:00)`.
pub fn day_window(date: NaiveDate, tz: Tz) -> Window {
    let next = date.succ_opt().unwrap_or(date);
    Window {
        start: local_midnight(date, tz),
        end: local_midnight(next, tz),
    }
}

/// Monday of the week containing `date`. Weeks always start on Monday.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
}

/// Calendar week containing `date`: Monday 00:00 through Sunday
/// 23:59:59.999, i.e. `[Monday, next Monday)`.
pub fn week_window(date: NaiveDate, tz: Tz) -> Window {
    let monday = week_start(date);
    Window {
        start: local_midnight(monday, tz),
        end: local_midnight(monday + Duration::days(7), tz),
    }
}
