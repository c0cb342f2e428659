//! The desk: one owner for the whole working state.
//!
//! `Desk` holds the settings, the task list, the statistics ledger, and the
//! timer engine, and applies every user intent as a single synchronous
//! mutation. Each operation returns the [`Event`]s it produced; the caller
//! persists the changed records and feeds the events to the audio layer.
//!
//! Time is always passed in (`today`, epoch seconds) rather than read from
//! a clock here, so every transition is testable at a fixed instant. The
//! only exception is the `at` stamp on emitted events.

use chrono::{DateTime, Local, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::settings::{Settings, MINUTES_RANGE};
use crate::stats::{DayReport, StatsLedger};
use crate::task::{Task, TaskList, ESTIMATE_RANGE};
use crate::timer::{Mode, TimerEngine};

/// The timer half of the state, persisted between invocations under the
/// `timer_session` key so a countdown survives process restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerSession {
    pub engine: TimerEngine,
    /// Id of the task currently bound to the timer, if any.
    pub active_task: Option<String>,
    /// Epoch second of the last observed tick; present only while running.
    /// Used to catch the engine up with the wall clock on the next load.
    pub last_tick_epoch_s: Option<u64>,
}

/// Snapshot of the timer for display.
#[derive(Debug, Clone, Serialize)]
pub struct DeskStatus {
    pub mode: Mode,
    pub running: bool,
    pub remaining_secs: u32,
    pub full_secs: u32,
    pub progress: f64,
    pub active_task: Option<Task>,
}

/// Owner and coordinator of settings, tasks, statistics, and the timer.
#[derive(Debug, Clone)]
pub struct Desk {
    settings: Settings,
    tasks: TaskList,
    stats: StatsLedger,
    engine: TimerEngine,
    active_task: Option<String>,
}

impl Desk {
    /// A desk with a fresh, stopped focus timer. Runs day rollover for
    /// `today` before returning.
    pub fn new(mut settings: Settings, tasks: TaskList, stats: StatsLedger, today: NaiveDate) -> Self {
        settings.sanitize();
        let engine = TimerEngine::new(Mode::Focus, settings.focus_secs());
        let mut desk = Self {
            settings,
            tasks,
            stats,
            engine,
            active_task: None,
        };
        desk.roll_day(today);
        desk
    }

    /// Rebuild a desk from a persisted timer session.
    ///
    /// Reconciles a dangling active-task reference, runs day rollover, and
    /// catches a running timer up with the wall clock, applying at most one
    /// completion. Catch-up completions credit `today`, not the day the
    /// interval notionally expired on.
    pub fn restore(
        settings: Settings,
        tasks: TaskList,
        stats: StatsLedger,
        session: TimerSession,
        today: NaiveDate,
        now_epoch_s: u64,
    ) -> (Self, Vec<Event>) {
        let TimerSession {
            engine,
            active_task,
            last_tick_epoch_s,
        } = session;
        let mut desk = Self {
            settings,
            tasks,
            stats,
            engine,
            active_task,
        };
        desk.settings.sanitize();
        // The session may reference a task deleted out from under it; fall
        // back to a stopped timer at the default duration.
        if let Some(id) = desk.active_task.clone() {
            if !desk.tasks.contains(&id) {
                desk.active_task = None;
                if desk.engine.mode() == Mode::Focus {
                    desk.engine.reset(desk.settings.focus_secs());
                }
            }
        }
        desk.roll_day(today);
        let mut events = Vec::new();
        if desk.engine.is_running() {
            if let Some(last) = last_tick_epoch_s {
                let lag = now_epoch_s.saturating_sub(last);
                if let Some(finished) = desk.engine.advance(lag) {
                    events.extend(desk.complete_interval(finished, today));
                }
            }
        }
        (desk, events)
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn stats(&self) -> &StatsLedger {
        &self.stats
    }

    pub fn mode(&self) -> Mode {
        self.engine.mode()
    }

    pub fn is_running(&self) -> bool {
        self.engine.is_running()
    }

    pub fn remaining_secs(&self) -> u32 {
        self.engine.remaining_secs()
    }

    pub fn active_task_id(&self) -> Option<&str> {
        self.active_task.as_deref()
    }

    /// The task currently bound to the timer, resolved to its record.
    pub fn active_task(&self) -> Option<&Task> {
        self.active_task.as_deref().and_then(|id| self.tasks.get(id))
    }

    pub fn status(&self) -> DeskStatus {
        let full = self.current_full_secs();
        DeskStatus {
            mode: self.engine.mode(),
            running: self.engine.is_running(),
            remaining_secs: self.engine.remaining_secs(),
            full_secs: full,
            progress: self.engine.progress(full),
            active_task: self.active_task().cloned(),
        }
    }

    /// Today's counters plus derived metrics, for the stats view.
    pub fn day_report(&self, now: DateTime<Local>) -> DayReport {
        self.stats.day_report(&self.settings, &self.tasks, now)
    }

    /// Session state to persist, stamped with the current epoch second
    /// while running so the next load can catch up.
    pub fn snapshot(&self, now_epoch_s: u64) -> TimerSession {
        TimerSession {
            engine: self.engine.clone(),
            active_task: self.active_task.clone(),
            last_tick_epoch_s: self.engine.is_running().then_some(now_epoch_s),
        }
    }

    /// Full duration of the current interval, resolving the active task's
    /// override in focus mode.
    fn current_full_secs(&self) -> u32 {
        self.full_for(self.engine.mode())
    }

    fn full_for(&self, mode: Mode) -> u32 {
        match mode {
            Mode::Focus => self.focus_full_secs(),
            Mode::Break => self.settings.break_secs(),
        }
    }

    fn focus_full_secs(&self) -> u32 {
        self.active_task()
            .map(Task::duration_secs)
            .unwrap_or_else(|| self.settings.focus_secs())
    }

    /// Start or resume the countdown. No-op while already running.
    pub fn start_timer(&mut self) -> Vec<Event> {
        if !self.engine.start() {
            return Vec::new();
        }
        vec![Event::TimerStarted {
            mode: self.engine.mode(),
            remaining_secs: self.engine.remaining_secs(),
            at: Utc::now(),
        }]
    }

    /// Halt the countdown at the current remaining value.
    pub fn pause_timer(&mut self) -> Vec<Event> {
        if !self.engine.pause() {
            return Vec::new();
        }
        vec![Event::TimerPaused {
            mode: self.engine.mode(),
            remaining_secs: self.engine.remaining_secs(),
            at: Utc::now(),
        }]
    }

    /// Stop and rewind to the full duration of the current mode. The event
    /// marks whether a progressed or running interval was thrown away; a
    /// pristine paused timer resets silently.
    pub fn reset_timer(&mut self) -> Vec<Event> {
        let full = self.current_full_secs();
        let progress_lost = self.engine.reset(full);
        vec![Event::TimerReset {
            mode: self.engine.mode(),
            progress_lost,
            at: Utc::now(),
        }]
    }

    /// Force the current interval to complete, with the same side effects
    /// as running out naturally.
    pub fn skip(&mut self, today: NaiveDate) -> Vec<Event> {
        self.roll_day(today);
        let finished = self.engine.force_complete();
        self.complete_interval(finished, today)
    }

    /// One elapsed second. Applies the completion transition when the
    /// countdown reaches zero.
    pub fn tick(&mut self, today: NaiveDate) -> Vec<Event> {
        self.roll_day(today);
        match self.engine.tick() {
            Some(finished) => self.complete_interval(finished, today),
            None => Vec::new(),
        }
    }

    /// Explicit mode change: stop, switch, rewind to the target mode's
    /// full duration. Records nothing. Selecting the current mode is a
    /// no-op.
    pub fn switch_mode(&mut self, mode: Mode) -> Vec<Event> {
        let from = self.engine.mode();
        if mode == from {
            return Vec::new();
        }
        self.engine.switch(mode, self.full_for(mode));
        vec![Event::ModeSwitched {
            from,
            to: mode,
            at: Utc::now(),
        }]
    }

    /// Change the global focus duration. When stopped, the displayed
    /// remaining is recomputed for the current mode (which still honors an
    /// active task's override in focus mode).
    pub fn set_focus_minutes(&mut self, minutes: u32) -> Result<Vec<Event>> {
        if !self.settings.set_pomodoro_minutes(minutes) {
            return Err(invalid_minutes(minutes));
        }
        if !self.engine.is_running() {
            self.engine.refresh_remaining(self.current_full_secs());
        }
        Ok(Vec::new())
    }

    /// Change the break duration. A stopped break timer shows the new full
    /// duration immediately; an in-progress break is not affected.
    pub fn set_break_minutes(&mut self, minutes: u32) -> Result<Vec<Event>> {
        if !self.settings.set_break_minutes(minutes) {
            return Err(invalid_minutes(minutes));
        }
        if self.engine.mode() == Mode::Break && !self.engine.is_running() {
            self.engine.refresh_remaining(self.settings.break_secs());
        }
        Ok(Vec::new())
    }

    /// Change the daily pomodoro goal.
    pub fn set_daily_goal(&mut self, goal: u32) -> Result<Vec<Event>> {
        if !self.settings.set_daily_goal(goal) {
            return Err(CoreError::InvalidInput(
                "Daily goal must be at least 1".into(),
            ));
        }
        Ok(Vec::new())
    }

    /// Create a task. Becomes the active task if none is selected, without
    /// disturbing the countdown.
    pub fn add_task(
        &mut self,
        title: impl Into<String>,
        estimated_pomos: u32,
        minutes_per_pomo: u32,
        date: NaiveDate,
    ) -> Result<Vec<Event>> {
        if !ESTIMATE_RANGE.contains(&estimated_pomos) {
            return Err(invalid_estimate(estimated_pomos));
        }
        if !MINUTES_RANGE.contains(&minutes_per_pomo) {
            return Err(invalid_minutes(minutes_per_pomo));
        }
        let task = self
            .tasks
            .add(Task::new(title, estimated_pomos, minutes_per_pomo, date));
        let id = task.id.clone();
        let mut events = vec![Event::TaskAdded {
            id: id.clone(),
            title: task.title.clone(),
            at: Utc::now(),
        }];
        if self.active_task.is_none() {
            self.active_task = Some(id.clone());
            events.push(Event::TaskSelected { id, at: Utc::now() });
        }
        Ok(events)
    }

    /// Bind a task to the timer. In focus mode this stops any running
    /// countdown and rewinds to the task's duration override.
    pub fn select_task(&mut self, id: &str) -> Result<Vec<Event>> {
        let duration = self
            .tasks
            .get(id)
            .map(Task::duration_secs)
            .ok_or_else(|| CoreError::UnknownTask(id.to_string()))?;
        self.active_task = Some(id.to_string());
        if self.engine.mode() == Mode::Focus {
            self.engine.switch(Mode::Focus, duration);
        }
        Ok(vec![Event::TaskSelected {
            id: id.to_string(),
            at: Utc::now(),
        }])
    }

    /// Remove a task. Deleting the active one clears the binding and, when
    /// a focus timer is stopped, rewinds it to the global focus duration.
    /// A running countdown is left alone.
    pub fn delete_task(&mut self, id: &str) -> Result<Vec<Event>> {
        if self.tasks.remove(id).is_none() {
            return Err(CoreError::UnknownTask(id.to_string()));
        }
        if self.active_task.as_deref() == Some(id) {
            self.active_task = None;
            if self.engine.mode() == Mode::Focus && !self.engine.is_running() {
                self.engine.refresh_remaining(self.settings.focus_secs());
            }
        }
        Ok(vec![Event::TaskDeleted {
            id: id.to_string(),
            at: Utc::now(),
        }])
    }

    /// Flip a task's done flag. Completion credits today's ledger and
    /// reopening debits it (floored at zero); always today's record,
    /// whatever the task's own scheduled date.
    pub fn toggle_task(&mut self, id: &str, today: NaiveDate) -> Result<Vec<Event>> {
        self.roll_day(today);
        let now_done = self
            .tasks
            .toggle_done(id)
            .ok_or_else(|| CoreError::UnknownTask(id.to_string()))?;
        let event = if now_done {
            self.stats.credit_task_completed(today);
            Event::TaskCompleted {
                id: id.to_string(),
                at: Utc::now(),
            }
        } else {
            self.stats.debit_task_completed(today);
            Event::TaskReopened {
                id: id.to_string(),
                at: Utc::now(),
            }
        };
        Ok(vec![event])
    }

    /// Change a task's per-session duration. When the task is active and a
    /// focus timer is stopped, the displayed remaining follows immediately.
    pub fn set_task_duration(&mut self, id: &str, minutes: u32) -> Result<Vec<Event>> {
        if !self.tasks.contains(id) {
            return Err(CoreError::UnknownTask(id.to_string()));
        }
        if !self.tasks.set_minutes_per_pomo(id, minutes) {
            return Err(invalid_minutes(minutes));
        }
        if self.active_task.as_deref() == Some(id)
            && self.engine.mode() == Mode::Focus
            && !self.engine.is_running()
        {
            self.engine.refresh_remaining(minutes.saturating_mul(60));
        }
        Ok(vec![task_updated(id)])
    }

    /// Change a task's estimated session count. No timer side effects.
    pub fn set_task_estimate(&mut self, id: &str, estimate: u32) -> Result<Vec<Event>> {
        if !self.tasks.contains(id) {
            return Err(CoreError::UnknownTask(id.to_string()));
        }
        if !self.tasks.set_estimate(id, estimate) {
            return Err(invalid_estimate(estimate));
        }
        Ok(vec![task_updated(id)])
    }

    /// Move a task to another scheduled day. No timer side effects.
    pub fn set_task_date(&mut self, id: &str, date: NaiveDate) -> Result<Vec<Event>> {
        if !self.tasks.set_date(id, date) {
            return Err(CoreError::UnknownTask(id.to_string()));
        }
        Ok(vec![task_updated(id)])
    }

    /// Rename a task.
    pub fn set_task_title(&mut self, id: &str, title: impl Into<String>) -> Result<Vec<Event>> {
        if !self.tasks.set_title(id, title) {
            return Err(CoreError::UnknownTask(id.to_string()));
        }
        Ok(vec![task_updated(id)])
    }

    /// Completion transition, shared by natural run-out, skip, and restore
    /// catch-up. A finished focus session credits the active task, the
    /// day's ledger, and the streak, then arms a break; a finished break
    /// arms the next focus session.
    fn complete_interval(&mut self, finished: Mode, today: NaiveDate) -> Vec<Event> {
        let mut events = vec![Event::TimerCompleted {
            mode: finished,
            at: Utc::now(),
        }];
        match finished {
            Mode::Focus => {
                let minutes = self
                    .active_task()
                    .map(|t| t.minutes_per_pomo)
                    .unwrap_or(self.settings.pomodoro_minutes);
                if let Some(id) = self.active_task.clone() {
                    self.tasks.record_pomo(&id);
                }
                self.stats.credit_pomodoro(today, minutes);
                self.settings.streak = self.settings.streak.saturating_add(1);
                events.push(Event::PomodoroRecorded {
                    task_id: self.active_task.clone(),
                    minutes,
                    at: Utc::now(),
                });
                let done_today = self
                    .stats
                    .day(today)
                    .map(|d| d.pomodoros_completed)
                    .unwrap_or(0);
                if done_today == self.settings.daily_goal {
                    events.push(Event::DailyGoalReached {
                        date: today,
                        pomodoros: done_today,
                        at: Utc::now(),
                    });
                }
                self.engine.switch(Mode::Break, self.settings.break_secs());
            }
            Mode::Break => {
                self.stats.credit_break(today);
                self.engine.switch(Mode::Focus, self.focus_full_secs());
            }
        }
        events
    }

    /// Day rollover: move `last_active_date` forward and make sure today's
    /// ledger record exists. Prior days are never touched.
    fn roll_day(&mut self, today: NaiveDate) {
        if self.settings.last_active_date != today {
            self.settings.last_active_date = today;
        }
        self.stats.ensure_day(today);
    }
}

fn task_updated(id: &str) -> Event {
    Event::TaskUpdated {
        id: id.to_string(),
        at: Utc::now(),
    }
}

fn invalid_minutes(minutes: u32) -> CoreError {
    CoreError::InvalidInput(format!(
        "Minutes must be between {} and {}, got {minutes}",
        MINUTES_RANGE.start(),
        MINUTES_RANGE.end()
    ))
}

fn invalid_estimate(estimate: u32) -> CoreError {
    CoreError::InvalidInput(format!(
        "Estimate must be between {} and {}, got {estimate}",
        ESTIMATE_RANGE.start(),
        ESTIMATE_RANGE.end()
    ))
}
