//! Civil-time source for the attendance engine.
//!
//! All attendance semantics are defined over *civil dates* in one fixed UTC
//! offset (default UTC+9). There are no daylight-saving transitions to
//! handle; a day boundary is always midnight in that offset.
//!
//! The clock is an injected collaborator: services take any [`ClockSource`],
//! so tests substitute a [`ManualClock`] and drive time by hand.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, Utc};
use std::sync::Mutex;

/// Default civil-day offset in hours east of UTC.
pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 9;

/// Source of the current civil date/time in the system's fixed offset.
pub trait ClockSource: Send + Sync {
    /// Current instant, expressed in the fixed civil offset.
    fn now(&self) -> DateTime<FixedOffset>;

    /// Today's civil date.
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    /// Yesterday's civil date.
    fn yesterday(&self) -> NaiveDate {
        self.today() - Duration::days(1)
    }
}

/// Build a `FixedOffset` from whole hours, falling back to UTC when the
/// value is out of chrono's accepted range.
pub fn fixed_offset(offset_hours: i32) -> FixedOffset {
    FixedOffset::east_opt(offset_hours * 3600)
        .unwrap_or_else(|| FixedOffset::east_opt(0).expect("UTC offset is always valid"))
}

/// Wall-clock source over the OS clock.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    /// Clock with an arbitrary whole-hour offset.
    pub fn new(offset_hours: i32) -> Self {
        Self {
            offset: fixed_offset(offset_hours),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new(DEFAULT_UTC_OFFSET_HOURS)
    }
}

impl ClockSource for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.offset)
    }
}

/// Deterministic clock for tests: returns whatever instant it was last set
/// to. Shared freely between a service under test and the test body.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<FixedOffset>>,
}

impl ManualClock {
    pub fn new(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    /// Clock pinned to noon of `date` in the default offset.
    pub fn at_date(date: NaiveDate) -> Self {
        let noon = date
            .and_hms_opt(12, 0, 0)
            .expect("noon is a valid wall-clock time");
        let offset = fixed_offset(DEFAULT_UTC_OFFSET_HOURS);
        let now = noon
            .and_local_timezone(offset)
            .single()
            .expect("fixed offsets never yield ambiguous local times");
        Self::new(now)
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        *self.now.lock().unwrap_or_else(|e| e.into_inner()) = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += by;
    }
}

impl ClockSource for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: ClockSource + ?Sized> ClockSource for std::sync::Arc<C> {
    fn now(&self) -> DateTime<FixedOffset> {
        (**self).now()
    }
}

/// Human-readable label for a civil date, e.g. `2024-01-01 (Mon)`.
pub fn day_label(date: NaiveDate) -> String {
    format!("{} ({})", date.format("%Y-%m-%d"), date.weekday())
}

/// `YYYY-MM` key for a month, used by the ranking aggregation.
pub fn month_key(year: i32, month: u32) -> String {
    format!("{year:04}-{month:02}")
}

/// The month containing `date`, as `(year, month)`.
pub fn month_of(date: NaiveDate) -> (i32, u32) {
    (date.year(), date.month())
}
