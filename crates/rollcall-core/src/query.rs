//! Read-only reporting over the attendance ledger.
//!
//! Nothing here writes. An empty day or month is an empty report, not an
//! error.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clock::{day_label, month_key, month_of, ClockSource};
use crate::error::Result;
use crate::storage::Database;

/// Who has checked in on one civil day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TodayReport {
    /// Day label, e.g. `2024-01-15 (Mon)`.
    pub date: String,
    pub headcount: u64,
    /// User ids in check-in order.
    pub users: Vec<String>,
}

/// One row of the monthly ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankingEntry {
    pub rank: u32,
    pub user_id: String,
    /// Days with at least one check-in this month.
    pub days: u64,
}

/// Monthly top-10 ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingReport {
    /// Month key, e.g. `2024-01`.
    pub month: String,
    pub entries: Vec<RankingEntry>,
}

/// Read-only queries over the ledger.
pub struct QueryService<C> {
    clock: C,
    db: Arc<Database>,
}

impl<C: ClockSource> QueryService<C> {
    pub fn new(clock: C, db: Arc<Database>) -> Self {
        Self { clock, db }
    }

    /// User ids checked in today, in check-in order.
    pub fn todays_attendees(&self) -> Result<Vec<String>> {
        Ok(self.db.list_users(self.clock.today())?)
    }

    /// Today's attendees as a labelled report.
    pub fn today(&self) -> Result<TodayReport> {
        let today = self.clock.today();
        let users = self.db.list_users(today)?;
        Ok(TodayReport {
            date: day_label(today),
            headcount: users.len() as u64,
            users,
        })
    }

    /// Distinct users checked in today.
    pub fn headcount_today(&self) -> Result<u64> {
        Ok(self.db.count_distinct_users(self.clock.today())?)
    }

    /// Top-10 ranking for an explicit month.
    pub fn monthly_ranking(&self, year: i32, month: u32) -> Result<RankingReport> {
        let counts = self.db.monthly_counts(year, month)?;
        let entries = counts
            .into_iter()
            .enumerate()
            .map(|(i, (user_id, days))| RankingEntry {
                rank: i as u32 + 1,
                user_id,
                days,
            })
            .collect();
        Ok(RankingReport {
            month: month_key(year, month),
            entries,
        })
    }

    /// Top-10 ranking for the month containing today.
    pub fn current_month_ranking(&self) -> Result<RankingReport> {
        let (year, month) = month_of(self.clock.today());
        self.monthly_ranking(year, month)
    }
}
