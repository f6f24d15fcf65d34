//! SQLite-backed attendance ledger and streak store.
//!
//! Two tables:
//! - `attendance`: append-only ledger of (user, civil date) check-ins, kept
//!   unique by index so a duplicate check-in is a no-op at the SQL level.
//! - `streaks`: one row per user with the consecutive-day run.
//!
//! The connection lives behind a mutex so one `Database` can be shared
//! through an `Arc` between the check-in path and the scheduler task.
//! Uniqueness is enforced by the database itself via `INSERT OR IGNORE`
//! against the unique index, never by a check-then-insert read.

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use crate::error::DatabaseError;
use crate::streak::{next_streak, StreakState};

use super::data_dir;

/// How many users the monthly ranking reports.
pub const RANKING_LIMIT: u32 = 10;

/// Result of a conditional ledger insert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// The (user, date) pair was new and is now recorded.
    Inserted,
    /// The pair was already in the ledger; nothing changed.
    AlreadyPresent,
}

/// SQLite database holding the attendance ledger and streak records.
pub struct Database {
    conn: Mutex<Connection>,
}

impl Database {
    /// Open the database at `~/.config/rollcall/rollcall.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the data directory or database cannot be opened
    /// or migrated.
    pub fn open() -> crate::error::Result<Self> {
        let path = data_dir()?.join("rollcall.db");
        Ok(Self::open_at(&path)?)
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self, DatabaseError> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database. Used by tests throughout the workspace.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self, DatabaseError> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Mutex::new(conn),
        };
        db.migrate()?;
        Ok(db)
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn migrate(&self) -> Result<(), DatabaseError> {
        self.conn()
            .execute_batch(
                "CREATE TABLE IF NOT EXISTS attendance (
                    id      INTEGER PRIMARY KEY AUTOINCREMENT,
                    user_id TEXT NOT NULL,
                    date    TEXT NOT NULL
                );

                CREATE UNIQUE INDEX IF NOT EXISTS idx_attendance_user_date
                    ON attendance(user_id, date);
                CREATE INDEX IF NOT EXISTS idx_attendance_date
                    ON attendance(date);

                CREATE TABLE IF NOT EXISTS streaks (
                    user_id   TEXT PRIMARY KEY,
                    last_date TEXT NOT NULL,
                    streak    INTEGER NOT NULL
                );",
            )
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))
    }

    /// Record `user_id` for `date` unless that pair is already in the ledger.
    ///
    /// The insert and the uniqueness check are one SQL statement, so two
    /// racing callers cannot both observe `Inserted` for the same pair.
    ///
    /// # Errors
    /// Returns an error if the insert fails.
    pub fn record_if_absent(
        &self,
        user_id: &str,
        date: NaiveDate,
    ) -> Result<RecordOutcome, DatabaseError> {
        let changed = self.conn().execute(
            "INSERT OR IGNORE INTO attendance (user_id, date) VALUES (?1, ?2)",
            params![user_id, date_text(date)],
        )?;
        if changed == 1 {
            Ok(RecordOutcome::Inserted)
        } else {
            Ok(RecordOutcome::AlreadyPresent)
        }
    }

    /// Number of distinct users recorded for `date`.
    pub fn count_distinct_users(&self, date: NaiveDate) -> Result<u64, DatabaseError> {
        let count = self.conn().query_row(
            "SELECT COUNT(DISTINCT user_id) FROM attendance WHERE date = ?1",
            params![date_text(date)],
            |row| row.get::<_, u64>(0),
        )?;
        Ok(count)
    }

    /// Users recorded for `date`, in check-in order.
    pub fn list_users(&self, date: NaiveDate) -> Result<Vec<String>, DatabaseError> {
        let conn = self.conn();
        let mut stmt =
            conn.prepare("SELECT user_id FROM attendance WHERE date = ?1 ORDER BY id")?;
        let rows = stmt.query_map(params![date_text(date)], |row| row.get::<_, String>(0))?;
        let mut users = Vec::new();
        for row in rows {
            users.push(row?);
        }
        Ok(users)
    }

    /// Per-user check-in counts for one month, top [`RANKING_LIMIT`] only.
    ///
    /// Ordered by count descending; ties break toward the user whose first
    /// check-in of the month came earlier (the ledger is append-only, so
    /// row ids order first check-ins).
    pub fn monthly_counts(
        &self,
        year: i32,
        month: u32,
    ) -> Result<Vec<(String, u64)>, DatabaseError> {
        let prefix = format!("{}-%", crate::clock::month_key(year, month));
        let conn = self.conn();
        let mut stmt = conn.prepare(
            "SELECT user_id, COUNT(*) AS cnt
             FROM attendance
             WHERE date LIKE ?1
             GROUP BY user_id
             ORDER BY cnt DESC, MIN(id) ASC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![prefix, RANKING_LIMIT], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u64>(1)?))
        })?;
        let mut counts = Vec::new();
        for row in rows {
            counts.push(row?);
        }
        Ok(counts)
    }

    /// Current streak record for `user_id`, if any.
    pub fn streak_of(&self, user_id: &str) -> Result<Option<StreakState>, DatabaseError> {
        let row = self
            .conn()
            .query_row(
                "SELECT last_date, streak FROM streaks WHERE user_id = ?1",
                params![user_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)),
            )
            .optional()?;
        match row {
            None => Ok(None),
            Some((last_date, streak)) => Ok(Some(StreakState {
                user_id: user_id.to_string(),
                last_date: parse_date(&last_date)?,
                streak,
            })),
        }
    }

    /// Apply the streak transition for a check-in by `user_id` on `today`
    /// and persist the result.
    ///
    /// Read, transition, and upsert run in one transaction so concurrent
    /// check-ins by the same user cannot interleave between the read and
    /// the write. Returns the streak value now stored.
    ///
    /// # Errors
    /// Returns an error if the transaction fails; the stored record is then
    /// unchanged.
    pub fn advance_streak(&self, user_id: &str, today: NaiveDate) -> Result<u32, DatabaseError> {
        let mut conn = self.conn();
        let tx = conn.transaction()?;

        let prev = tx
            .query_row(
                "SELECT last_date, streak FROM streaks WHERE user_id = ?1",
                params![user_id],
                |row| Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?)),
            )
            .optional()?;
        let prev = match prev {
            None => None,
            Some((last_date, streak)) => Some((parse_date(&last_date)?, streak)),
        };

        let next = next_streak(prev, today);

        tx.execute(
            "INSERT INTO streaks (user_id, last_date, streak) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET
                 last_date = excluded.last_date,
                 streak    = excluded.streak",
            params![user_id, date_text(today), next],
        )?;

        tx.commit()?;
        Ok(next)
    }
}

fn date_text(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn parse_date(text: &str) -> Result<NaiveDate, DatabaseError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .map_err(|e| DatabaseError::QueryFailed(format!("bad stored date '{text}': {e}")))
}
