//! # Rollcall Core Library
//!
//! This library provides the core business logic for Rollcall, a daily
//! attendance tracker. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with chat-platform
//! frontends being thin layers over the same core library.
//!
//! ## Architecture
//!
//! - **Clock**: Civil-date derivation in one fixed UTC offset, injected so
//!   tests drive time by hand
//! - **Storage**: SQLite-based attendance ledger and streak store, plus
//!   TOML-based configuration
//! - **Services**: Check-in pipeline and read-only reporting over the ledger
//! - **Scheduler**: Self-correcting daily prompt timer
//! - **Integrations**: Webhook sink for announcements
//!
//! ## Key Components
//!
//! - [`CheckInService`]: Records check-ins and advances streaks
//! - [`QueryService`]: Today's attendees and the monthly ranking
//! - [`DailyScheduler`]: Fires a prompt at each civil-day boundary
//! - [`Database`]: Ledger and streak persistence
//! - [`Config`]: Application configuration management

pub mod checkin;
pub mod clock;
pub mod error;
pub mod integrations;
pub mod query;
pub mod scheduler;
pub mod storage;
pub mod streak;

pub use checkin::{CheckInOutcome, CheckInService};
pub use clock::{ClockSource, ManualClock, SystemClock};
pub use integrations::DiscordWebhook;
pub use query::{QueryService, RankingEntry, RankingReport, TodayReport};
pub use scheduler::{DailyScheduler, SchedulerState};
pub use storage::{Config, Database};
pub use streak::StreakState;
pub use error::{ConfigError, CoreError, DatabaseError, NotifyError};
