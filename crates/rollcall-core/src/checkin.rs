//! Check-in pipeline.
//!
//! One user action, three storage steps in a fixed order: conditional ledger
//! insert, streak transition, headcount. The ledger insert decides which of
//! the two outcomes the caller gets; the headcount is always taken after the
//! insert so a first check-in counts itself.
//!
//! Any storage failure aborts the whole check-in and surfaces as an error.
//! The caller never receives an outcome built from partial state.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clock::ClockSource;
use crate::error::Result;
use crate::storage::database::RecordOutcome;
use crate::storage::Database;

/// What a check-in attempt produced.
///
/// A repeat check-in on the same civil day is not an error; it is the
/// `AlreadyCheckedIn` outcome, and the stored streak is untouched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum CheckInOutcome {
    /// First check-in of the day for this user.
    FirstToday {
        /// Consecutive-day run including today.
        streak: u32,
        /// Distinct users checked in today, including this one.
        headcount: u64,
    },
    /// The user had already checked in today.
    AlreadyCheckedIn {
        /// Distinct users checked in today.
        headcount: u64,
    },
}

/// Records check-ins against the ledger and streak store.
pub struct CheckInService<C> {
    clock: C,
    db: Arc<Database>,
}

impl<C: ClockSource> CheckInService<C> {
    pub fn new(clock: C, db: Arc<Database>) -> Self {
        Self { clock, db }
    }

    /// Record a check-in by `user_id` for the current civil day.
    ///
    /// # Errors
    /// Returns an error if any storage step fails; the outcome is only
    /// produced once every step has succeeded.
    pub fn check_in(&self, user_id: &str) -> Result<CheckInOutcome> {
        let today = self.clock.today();

        match self.db.record_if_absent(user_id, today)? {
            RecordOutcome::AlreadyPresent => {
                let headcount = self.db.count_distinct_users(today)?;
                tracing::debug!(user_id, %today, "repeat check-in ignored");
                Ok(CheckInOutcome::AlreadyCheckedIn { headcount })
            }
            RecordOutcome::Inserted => {
                let streak = self.db.advance_streak(user_id, today)?;
                let headcount = self.db.count_distinct_users(today)?;
                tracing::info!(user_id, %today, streak, headcount, "check-in recorded");
                Ok(CheckInOutcome::FirstToday { streak, headcount })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, NaiveDate};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn service(start: NaiveDate) -> (Arc<ManualClock>, CheckInService<Arc<ManualClock>>) {
        let clock = Arc::new(ManualClock::at_date(start));
        let db = Arc::new(Database::open_memory().unwrap());
        let service = CheckInService::new(Arc::clone(&clock), db);
        (clock, service)
    }

    #[test]
    fn first_check_in_counts_itself() {
        let (_, service) = service(date(2024, 1, 15));
        assert_eq!(
            service.check_in("alice").unwrap(),
            CheckInOutcome::FirstToday {
                streak: 1,
                headcount: 1
            }
        );
    }

    #[test]
    fn repeat_check_in_reports_headcount_only() {
        let (_, service) = service(date(2024, 1, 15));
        service.check_in("alice").unwrap();
        service.check_in("bob").unwrap();
        assert_eq!(
            service.check_in("alice").unwrap(),
            CheckInOutcome::AlreadyCheckedIn { headcount: 2 }
        );
    }

    #[test]
    fn repeat_check_in_does_not_touch_streak() {
        let (clock, service) = service(date(2024, 1, 15));
        service.check_in("alice").unwrap();
        clock.advance(Duration::days(1));
        service.check_in("alice").unwrap();
        service.check_in("alice").unwrap();
        clock.advance(Duration::days(1));
        assert_eq!(
            service.check_in("alice").unwrap(),
            CheckInOutcome::FirstToday {
                streak: 3,
                headcount: 1
            }
        );
    }

    #[test]
    fn streak_resets_after_a_missed_day() {
        let (clock, service) = service(date(2024, 1, 15));
        service.check_in("alice").unwrap();
        clock.advance(Duration::days(2));
        assert_eq!(
            service.check_in("alice").unwrap(),
            CheckInOutcome::FirstToday {
                streak: 1,
                headcount: 1
            }
        );
    }

    #[test]
    fn headcount_tracks_distinct_users() {
        let (_, service) = service(date(2024, 1, 15));
        assert_eq!(
            service.check_in("alice").unwrap(),
            CheckInOutcome::FirstToday {
                streak: 1,
                headcount: 1
            }
        );
        assert_eq!(
            service.check_in("bob").unwrap(),
            CheckInOutcome::FirstToday {
                streak: 1,
                headcount: 2
            }
        );
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(CheckInOutcome::FirstToday {
            streak: 3,
            headcount: 7,
        })
        .unwrap();
        assert_eq!(json["status"], "first_today");
        assert_eq!(json["streak"], 3);
        assert_eq!(json["headcount"], 7);
    }
}
