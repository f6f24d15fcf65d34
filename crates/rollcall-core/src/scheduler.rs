//! Daily prompt scheduler.
//!
//! Arms a single timer for the next civil-day boundary, fires once, and
//! re-arms. The delay is recomputed from the live clock on every arm, so
//! wake-up latency never accumulates across days the way a fixed 24-hour
//! interval would drift.
//!
//! A failed prompt is logged and dropped; the next attempt is the next day
//! boundary, never a same-day retry.

use chrono::{DateTime, Duration, FixedOffset, NaiveDate, NaiveTime};
use std::future::Future;
use std::sync::Mutex;
use std::time::Duration as StdDuration;

use crate::clock::ClockSource;
use crate::error::NotifyError;

/// Where the scheduler is in its cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Not waiting on a timer.
    Idle,
    /// Timer set for the next day boundary.
    Armed,
}

/// First midnight strictly after `now`, in the same fixed offset.
pub fn next_midnight(now: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let tomorrow = now.date_naive() + Duration::days(1);
    tomorrow
        .and_time(NaiveTime::MIN)
        .and_local_timezone(*now.offset())
        .single()
        // fixed offsets map local times uniquely
        .unwrap_or_else(|| now + Duration::days(1))
}

/// Sleep duration from `now` until the next day boundary.
pub fn delay_until_next_midnight(now: DateTime<FixedOffset>) -> StdDuration {
    (next_midnight(now) - now)
        .to_std()
        .unwrap_or(StdDuration::from_secs(1))
}

/// Fires a prompt callback at each civil-day boundary.
pub struct DailyScheduler<C> {
    clock: C,
    state: Mutex<SchedulerState>,
}

impl<C: ClockSource> DailyScheduler<C> {
    pub fn new(clock: C) -> Self {
        Self {
            clock,
            state: Mutex::new(SchedulerState::Idle),
        }
    }

    pub fn state(&self) -> SchedulerState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: SchedulerState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }

    /// Run the arm/fire cycle forever.
    ///
    /// `send_prompt` receives the civil date of the day that begins at the
    /// boundary being announced. Its failures are logged and swallowed;
    /// they never stop the cycle.
    pub async fn run<F, Fut>(&self, mut send_prompt: F)
    where
        F: FnMut(NaiveDate) -> Fut,
        Fut: Future<Output = Result<(), NotifyError>>,
    {
        loop {
            self.arm_and_fire(&mut send_prompt).await;
        }
    }

    /// One cycle: compute the delay from the live clock, sleep, fire.
    async fn arm_and_fire<F, Fut>(&self, send_prompt: &mut F)
    where
        F: FnMut(NaiveDate) -> Fut,
        Fut: Future<Output = Result<(), NotifyError>>,
    {
        let now = self.clock.now();
        let target = next_midnight(now);
        let delay = delay_until_next_midnight(now);

        self.set_state(SchedulerState::Armed);
        tracing::info!(
            target = %target,
            delay_secs = delay.as_secs(),
            "daily prompt armed"
        );

        tokio::time::sleep(delay).await;

        // The prompt names the day that starts at the boundary, even if the
        // task woke a little late.
        let day = target.date_naive();
        match send_prompt(day).await {
            Ok(()) => tracing::info!(%day, "daily prompt sent"),
            Err(e) => tracing::warn!(
                %day,
                error = %e,
                "daily prompt failed; next attempt at the next day boundary"
            ),
        }
        self.set_state(SchedulerState::Idle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{fixed_offset, ManualClock};
    use chrono::NaiveDate;
    use std::sync::Arc;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<FixedOffset> {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
            .and_local_timezone(fixed_offset(9))
            .unwrap()
    }

    #[test]
    fn next_midnight_is_start_of_tomorrow() {
        let target = next_midnight(at(2024, 1, 15, 12, 0, 0));
        assert_eq!(target, at(2024, 1, 16, 0, 0, 0));
    }

    #[test]
    fn next_midnight_just_before_boundary() {
        let target = next_midnight(at(2024, 1, 15, 23, 59, 59));
        assert_eq!(target, at(2024, 1, 16, 0, 0, 0));
        assert_eq!(
            delay_until_next_midnight(at(2024, 1, 15, 23, 59, 59)),
            StdDuration::from_secs(1)
        );
    }

    #[test]
    fn firing_late_never_schedules_a_same_day_retry() {
        // a timer that woke 5 seconds past midnight re-arms for the *next*
        // boundary, a full day minus those 5 seconds away
        let woke = at(2024, 1, 16, 0, 0, 5);
        assert_eq!(next_midnight(woke), at(2024, 1, 17, 0, 0, 0));
        assert_eq!(
            delay_until_next_midnight(woke),
            StdDuration::from_secs(24 * 3600 - 5)
        );
    }

    #[test]
    fn exact_midnight_arms_for_the_following_day() {
        let boundary = at(2024, 1, 16, 0, 0, 0);
        assert_eq!(next_midnight(boundary), at(2024, 1, 17, 0, 0, 0));
    }

    #[test]
    fn delay_tracks_the_live_clock() {
        // delays computed from two different instants differ by exactly the
        // elapsed time; nothing is carried over from an earlier arm
        let early = delay_until_next_midnight(at(2024, 1, 15, 22, 0, 0));
        let late = delay_until_next_midnight(at(2024, 1, 15, 23, 30, 0));
        assert_eq!(early - late, StdDuration::from_secs(90 * 60));
    }

    #[tokio::test(start_paused = true)]
    async fn fires_with_the_new_day_and_returns_to_idle() {
        let clock = Arc::new(ManualClock::new(at(2024, 1, 15, 23, 0, 0)));
        let scheduler = DailyScheduler::new(Arc::clone(&clock));
        let fired = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&fired);
        scheduler
            .arm_and_fire(&mut |day| {
                let sink = Arc::clone(&sink);
                async move {
                    sink.lock().unwrap().push(day);
                    Ok(())
                }
            })
            .await;

        assert_eq!(
            *fired.lock().unwrap(),
            vec![NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()]
        );
        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn prompt_failure_does_not_poison_the_cycle() {
        let clock = Arc::new(ManualClock::new(at(2024, 1, 15, 23, 0, 0)));
        let scheduler = DailyScheduler::new(Arc::clone(&clock));

        scheduler
            .arm_and_fire(&mut |_| async { Err(NotifyError::NotConfigured) })
            .await;

        assert_eq!(scheduler.state(), SchedulerState::Idle);
    }
}
