//! Integration tests for persistence across process restarts.
//!
//! Each test opens a store on a temporary path, works at the desk, saves,
//! then reopens the same path the way a new invocation would.

use chrono::NaiveDate;
use pomodesk_core::events::Event;
use pomodesk_core::{Desk, Mode, Store};

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn open_desk(store: &Store, today: NaiveDate) -> Desk {
    Desk::new(
        store.load_settings(),
        store.load_tasks(),
        store.load_stats(),
        today,
    )
}

fn save_all(store: &Store, desk: &Desk, now_epoch_s: u64) {
    store.save_settings(desk.settings()).unwrap();
    store.save_tasks(desk.tasks()).unwrap();
    store.save_stats(desk.stats()).unwrap();
    store.save_session(&desk.snapshot(now_epoch_s)).unwrap();
}

#[test]
fn test_running_session_resumes_with_wall_clock_catchup() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodesk.db");
    let today = day("2026-08-23");

    {
        let store = Store::open_at(&path).unwrap();
        let mut desk = open_desk(&store, today);
        desk.add_task("ship release", 3, 25, today).unwrap();
        desk.start_timer();
        for _ in 0..120 {
            desk.tick(today);
        }
        save_all(&store, &desk, 10_000);
    }

    // Thirty seconds later, a new invocation picks up where we left off.
    let store = Store::open_at(&path).unwrap();
    let session = store.load_session().unwrap();
    let (desk, events) = Desk::restore(
        store.load_settings(),
        store.load_tasks(),
        store.load_stats(),
        session,
        today,
        10_030,
    );
    assert!(events.is_empty());
    assert!(desk.is_running());
    assert_eq!(desk.remaining_secs(), 25 * 60 - 120 - 30);
    assert_eq!(desk.tasks().len(), 1);
    assert_eq!(desk.active_task().unwrap().title, "ship release");
}

#[test]
fn test_overnight_restart_rolls_day_and_completes_once() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodesk.db");
    let yesterday = day("2026-08-23");
    let today = day("2026-08-24");

    {
        let store = Store::open_at(&path).unwrap();
        let mut desk = open_desk(&store, yesterday);
        // One finished session on the 23rd, then a fresh one left running.
        desk.skip(yesterday);
        desk.switch_mode(Mode::Focus);
        desk.start_timer();
        save_all(&store, &desk, 50_000);
    }

    // Reopened the next day, long after the interval expired.
    let store = Store::open_at(&path).unwrap();
    let session = store.load_session().unwrap();
    let (desk, events) = Desk::restore(
        store.load_settings(),
        store.load_tasks(),
        store.load_stats(),
        session,
        today,
        5_000_000,
    );
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TimerCompleted { mode: Mode::Focus, .. })));

    // The catch-up completion lands on today, not on the day the interval
    // notionally expired.
    let fresh = desk.stats().day(today).unwrap();
    assert_eq!(fresh.pomodoros_completed, 1);
    let old = desk.stats().day(yesterday).unwrap();
    assert_eq!(old.pomodoros_completed, 1);

    assert_eq!(desk.settings().last_active_date, today);
    assert_eq!(desk.settings().streak, 2);
    assert_eq!(desk.mode(), Mode::Break);
    assert!(!desk.is_running());
}

#[test]
fn test_fresh_store_starts_from_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodesk.db");
    let today = day("2026-08-23");

    let store = Store::open_at(&path).unwrap();
    assert!(store.load_session().is_none());
    let desk = open_desk(&store, today);
    assert_eq!(desk.mode(), Mode::Focus);
    assert_eq!(desk.remaining_secs(), 25 * 60);
    assert!(!desk.is_running());
    assert!(desk.tasks().is_empty());
    // Rollover seeded a zero record for today.
    let stat = desk.stats().day(today).unwrap();
    assert_eq!(stat.pomodoros_completed, 0);
}

#[test]
fn test_deleted_task_does_not_dangle_after_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("pomodesk.db");
    let today = day("2026-08-23");

    {
        let store = Store::open_at(&path).unwrap();
        let mut desk = open_desk(&store, today);
        desk.add_task("doomed", 1, 45, today).unwrap();
        save_all(&store, &desk, 10_000);
        // The session now references the task; drop the task but keep the
        // stale session record.
        let id = desk.tasks().iter().next().unwrap().id.clone();
        desk.delete_task(&id).unwrap();
        store.save_tasks(desk.tasks()).unwrap();
    }

    let store = Store::open_at(&path).unwrap();
    let session = store.load_session().unwrap();
    assert!(session.active_task.is_some());
    let (desk, _) = Desk::restore(
        store.load_settings(),
        store.load_tasks(),
        store.load_stats(),
        session,
        today,
        10_000,
    );
    assert!(desk.active_task_id().is_none());
    assert_eq!(desk.remaining_secs(), 25 * 60);
    assert!(!desk.is_running());
}
