//! Integration tests for the check-in flow.
//!
//! Exercises the full pipeline from check-in to reporting: ledger insert,
//! streak transition, headcount, and the monthly ranking, including the
//! many-users-one-instant race on a single shared database.

use chrono::{Duration, NaiveDate};
use std::sync::Arc;
use std::thread;

use rollcall_core::{CheckInOutcome, CheckInService, Database, ManualClock, QueryService};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

#[test]
fn full_day_of_attendance() {
    let clock = Arc::new(ManualClock::at_date(date(2024, 1, 15)));
    let db = Arc::new(Database::open_memory().unwrap());
    let checkin = CheckInService::new(Arc::clone(&clock), Arc::clone(&db));
    let query = QueryService::new(Arc::clone(&clock), Arc::clone(&db));

    assert_eq!(
        checkin.check_in("alice").unwrap(),
        CheckInOutcome::FirstToday {
            streak: 1,
            headcount: 1
        }
    );
    assert_eq!(
        checkin.check_in("bob").unwrap(),
        CheckInOutcome::FirstToday {
            streak: 1,
            headcount: 2
        }
    );
    assert_eq!(
        checkin.check_in("alice").unwrap(),
        CheckInOutcome::AlreadyCheckedIn { headcount: 2 }
    );

    let today = query.today().unwrap();
    assert_eq!(today.date, "2024-01-15 (Mon)");
    assert_eq!(today.headcount, 2);
    assert_eq!(today.users, vec!["alice", "bob"]);
}

#[test]
fn streak_survives_consecutive_days_and_resets_after_a_gap() {
    let clock = Arc::new(ManualClock::at_date(date(2024, 1, 10)));
    let db = Arc::new(Database::open_memory().unwrap());
    let checkin = CheckInService::new(Arc::clone(&clock), Arc::clone(&db));

    for expected in 1..=3 {
        match checkin.check_in("alice").unwrap() {
            CheckInOutcome::FirstToday { streak, .. } => assert_eq!(streak, expected),
            other => panic!("expected first check-in, got {other:?}"),
        }
        clock.advance(Duration::days(1));
    }

    // skip a day
    clock.advance(Duration::days(1));
    assert_eq!(
        checkin.check_in("alice").unwrap(),
        CheckInOutcome::FirstToday {
            streak: 1,
            headcount: 1
        }
    );
}

#[test]
fn monthly_ranking_reflects_a_month_of_activity() {
    let clock = Arc::new(ManualClock::at_date(date(2024, 1, 1)));
    let db = Arc::new(Database::open_memory().unwrap());
    let checkin = CheckInService::new(Arc::clone(&clock), Arc::clone(&db));
    let query = QueryService::new(Arc::clone(&clock), Arc::clone(&db));

    // alice shows up every day, bob every other day, carol once
    for day in 0..6 {
        checkin.check_in("alice").unwrap();
        if day % 2 == 0 {
            checkin.check_in("bob").unwrap();
        }
        if day == 3 {
            checkin.check_in("carol").unwrap();
        }
        clock.advance(Duration::days(1));
    }

    let report = query.current_month_ranking().unwrap();
    assert_eq!(report.month, "2024-01");
    let summary: Vec<(&str, u64)> = report
        .entries
        .iter()
        .map(|e| (e.user_id.as_str(), e.days))
        .collect();
    assert_eq!(summary, vec![("alice", 6), ("bob", 3), ("carol", 1)]);
    assert_eq!(report.entries[0].rank, 1);
    assert_eq!(report.entries[2].rank, 3);
}

#[test]
fn racing_check_ins_by_one_user_yield_exactly_one_first_today() {
    let clock = Arc::new(ManualClock::at_date(date(2024, 1, 15)));
    let db = Arc::new(Database::open_memory().unwrap());
    let service = Arc::new(CheckInService::new(Arc::clone(&clock), Arc::clone(&db)));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.check_in("alice").unwrap())
        })
        .collect();

    let outcomes: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    let first_today = outcomes
        .iter()
        .filter(|o| matches!(o, CheckInOutcome::FirstToday { .. }))
        .count();
    assert_eq!(first_today, 1);
    assert_eq!(outcomes.len(), 8);
    assert_eq!(db.count_distinct_users(date(2024, 1, 15)).unwrap(), 1);

    let state = db.streak_of("alice").unwrap().unwrap();
    assert_eq!(state.streak, 1);
}

#[test]
fn racing_check_ins_by_many_users_all_land() {
    let clock = Arc::new(ManualClock::at_date(date(2024, 1, 15)));
    let db = Arc::new(Database::open_memory().unwrap());
    let service = Arc::new(CheckInService::new(Arc::clone(&clock), Arc::clone(&db)));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let service = Arc::clone(&service);
            thread::spawn(move || service.check_in(&format!("user{i}")).unwrap())
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(db.count_distinct_users(date(2024, 1, 15)).unwrap(), 8);
}

#[test]
fn ledger_persists_across_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("rollcall.db");

    {
        let clock = ManualClock::at_date(date(2024, 1, 15));
        let db = Arc::new(Database::open_at(&path).unwrap());
        let checkin = CheckInService::new(clock, Arc::clone(&db));
        checkin.check_in("alice").unwrap();
    }

    let db = Database::open_at(&path).unwrap();
    assert_eq!(db.count_distinct_users(date(2024, 1, 15)).unwrap(), 1);
    let state = db.streak_of("alice").unwrap().unwrap();
    assert_eq!(state.last_date, date(2024, 1, 15));
    assert_eq!(state.streak, 1);
}
