//! Integration tests for a full working day at the desk.
//!
//! These drive complete focus/break cycles through `Desk` and verify the
//! task, statistics, and streak bookkeeping along the way.

use chrono::{NaiveDate, TimeZone};
use pomodesk_core::events::Event;
use pomodesk_core::{Desk, Mode, Settings, StatsLedger, TaskList};

fn day(s: &str) -> NaiveDate {
    s.parse().unwrap()
}

fn today() -> NaiveDate {
    day("2026-08-23")
}

fn fresh_desk() -> Desk {
    Desk::new(
        Settings::default(),
        TaskList::new(),
        StatsLedger::new(),
        today(),
    )
}

/// Start the countdown and tick until the interval completes.
fn complete_current(desk: &mut Desk) -> Vec<Event> {
    desk.start_timer();
    loop {
        let events = desk.tick(today());
        if !events.is_empty() {
            return events;
        }
    }
}

#[test]
fn test_two_full_cycles_update_every_record() {
    let mut desk = fresh_desk();
    desk.add_task("draft proposal", 2, 30, today()).unwrap();
    let id = desk.tasks().iter().next().unwrap().id.clone();

    // First focus session: 30 minutes from the task override.
    assert_eq!(desk.remaining_secs(), 30 * 60);
    let events = complete_current(&mut desk);
    assert!(events
        .iter()
        .any(|e| matches!(e, Event::TimerCompleted { mode: Mode::Focus, .. })));
    assert_eq!(desk.tasks().get(&id).unwrap().completed_pomos, 1);
    assert_eq!(desk.settings().streak, 1);
    let stat = desk.stats().day(today()).unwrap();
    assert_eq!(stat.pomodoros_completed, 1);
    assert_eq!(stat.minutes_focused, 30);

    // The break that follows uses the settings break duration.
    assert_eq!(desk.mode(), Mode::Break);
    assert_eq!(desk.remaining_secs(), 5 * 60);
    complete_current(&mut desk);
    assert_eq!(desk.stats().day(today()).unwrap().breaks_taken, 1);

    // Back in focus, the override applies again.
    assert_eq!(desk.mode(), Mode::Focus);
    assert_eq!(desk.remaining_secs(), 30 * 60);
    complete_current(&mut desk);
    assert_eq!(desk.tasks().get(&id).unwrap().completed_pomos, 2);
    assert_eq!(desk.settings().streak, 2);
    let stat = desk.stats().day(today()).unwrap();
    assert_eq!(stat.pomodoros_completed, 2);
    assert_eq!(stat.minutes_focused, 60);

    // Mark the task done and read the day back.
    desk.toggle_task(&id, today()).unwrap();
    let now = chrono::Local
        .from_local_datetime(&today().and_hms_opt(17, 0, 0).unwrap())
        .unwrap();
    let report = desk.day_report(now);
    assert_eq!(report.tasks_completed, 1);
    assert_eq!(report.remaining_pomos, 0);
    assert_eq!(report.completed_minutes, 2 * 30);
    assert!(report.projected_finish.is_none());
    assert!(!report.goal_reached);
}

#[test]
fn test_sessions_credit_the_task_selected_at_completion() {
    let mut desk = fresh_desk();
    desk.add_task("first", 2, 25, today()).unwrap();
    desk.add_task("second", 2, 40, today()).unwrap();
    let (first, second) = {
        let mut it = desk.tasks().iter();
        (it.next().unwrap().id.clone(), it.next().unwrap().id.clone())
    };

    complete_current(&mut desk);
    assert_eq!(desk.tasks().get(&first).unwrap().completed_pomos, 1);
    assert_eq!(desk.tasks().get(&second).unwrap().completed_pomos, 0);

    // Switch to the second task for the next session.
    desk.switch_mode(Mode::Focus);
    desk.select_task(&second).unwrap();
    assert_eq!(desk.remaining_secs(), 40 * 60);
    complete_current(&mut desk);
    assert_eq!(desk.tasks().get(&first).unwrap().completed_pomos, 1);
    assert_eq!(desk.tasks().get(&second).unwrap().completed_pomos, 1);

    let stat = desk.stats().day(today()).unwrap();
    assert_eq!(stat.pomodoros_completed, 2);
    assert_eq!(stat.minutes_focused, 25 + 40);
}

#[test]
fn test_projection_tracks_remaining_workload() {
    let mut desk = fresh_desk();
    desk.add_task("a", 2, 25, today()).unwrap();
    desk.add_task("b", 1, 50, today()).unwrap();
    let now = chrono::Local
        .from_local_datetime(&today().and_hms_opt(9, 0, 0).unwrap())
        .unwrap();

    // 2 x (25 + 5) + 1 x (50 + 5) = 115 minutes of work ahead.
    let report = desk.day_report(now);
    assert_eq!(report.remaining_pomos, 3);
    let finish = report.projected_finish.unwrap();
    assert_eq!(finish - now, chrono::Duration::minutes(115));

    // One completed session shrinks the projection.
    complete_current(&mut desk);
    let report = desk.day_report(now);
    assert_eq!(report.remaining_pomos, 2);
    let finish = report.projected_finish.unwrap();
    assert_eq!(finish - now, chrono::Duration::minutes(30 + 55));
}

#[test]
fn test_skip_heavy_day_reaches_the_goal() {
    let mut desk = fresh_desk();
    desk.set_daily_goal(3).unwrap();
    let mut goal_events = 0;
    for _ in 0..3 {
        let events = desk.skip(today());
        goal_events += events
            .iter()
            .filter(|e| matches!(e, Event::DailyGoalReached { .. }))
            .count();
        // Skip the break too, back to focus.
        desk.skip(today());
    }
    assert_eq!(goal_events, 1);
    let stat = desk.stats().day(today()).unwrap();
    assert_eq!(stat.pomodoros_completed, 3);
    assert_eq!(stat.breaks_taken, 3);
    assert_eq!(desk.settings().streak, 3);
    let now = chrono::Local
        .from_local_datetime(&today().and_hms_opt(12, 0, 0).unwrap())
        .unwrap();
    assert!(desk.day_report(now).goal_reached);
}

#[test]
fn test_pause_and_reset_leave_records_untouched() {
    let mut desk = fresh_desk();
    desk.add_task("t", 1, 25, today()).unwrap();
    desk.start_timer();
    for _ in 0..100 {
        desk.tick(today());
    }
    desk.pause_timer();
    let events = desk.reset_timer();
    assert!(matches!(
        events[0],
        Event::TimerReset {
            progress_lost: true,
            ..
        }
    ));
    // Nothing was credited anywhere.
    let stat = desk.stats().day(today()).unwrap();
    assert_eq!(stat.pomodoros_completed, 0);
    assert_eq!(stat.minutes_focused, 0);
    assert_eq!(desk.settings().streak, 0);
    assert_eq!(desk.tasks().iter().next().unwrap().completed_pomos, 0);
    assert_eq!(desk.remaining_secs(), 25 * 60);
}
