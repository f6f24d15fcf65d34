//! Streak transition rule.
//!
//! A streak counts consecutive civil days with at least one check-in. The
//! transition is a pure function of the stored record and today's date, so
//! the rule is testable without a database. Persistence (the atomic upsert)
//! lives in [`crate::storage::database::Database::advance_streak`].

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

/// Persisted streak record for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakState {
    pub user_id: String,
    /// Civil date of the most recent counted check-in.
    pub last_date: NaiveDate,
    /// Length of the consecutive-day run ending at `last_date`.
    pub streak: u32,
}

/// Next streak value after a check-in on `today`.
///
/// * no prior record: the run starts at 1
/// * last counted day was yesterday: the run extends
/// * last counted day is today: the value holds (idempotent within a day)
/// * anything else, including a stored date in the future: the run resets to 1
pub fn next_streak(prev: Option<(NaiveDate, u32)>, today: NaiveDate) -> u32 {
    match prev {
        None => 1,
        Some((last_date, streak)) => {
            if last_date == today {
                streak
            } else if last_date == today - Duration::days(1) {
                streak.saturating_add(1)
            } else {
                if last_date > today {
                    tracing::warn!(
                        %last_date,
                        %today,
                        "stored streak date is ahead of the current civil day; resetting"
                    );
                }
                1
            }
        }
    }
}
