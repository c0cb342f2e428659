//! Per-day statistics and the derived daily metrics.
//!
//! One [`DayStat`] record exists per local calendar day, created lazily the
//! first time that day is observed and never deleted. Session completions
//! and task toggles always move the counters of **today's** record: a task
//! completed today but scheduled for tomorrow still credits today.

use chrono::{DateTime, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::settings::Settings;
use crate::task::TaskList;

/// Fixed gap assumed between sessions when projecting a finish time.
pub const SESSION_GAP_MINUTES: u32 = 5;

/// Aggregate counters for one local calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStat {
    pub date: NaiveDate,
    #[serde(default)]
    pub pomodoros_completed: u32,
    #[serde(default)]
    pub minutes_focused: u32,
    #[serde(default)]
    pub breaks_taken: u32,
    #[serde(default)]
    pub tasks_completed: u32,
}

impl DayStat {
    fn zero(date: NaiveDate) -> Self {
        Self {
            date,
            pomodoros_completed: 0,
            minutes_focused: 0,
            breaks_taken: 0,
            tasks_completed: 0,
        }
    }
}

/// All-time rollup across every recorded day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    pub pomodoros_completed: u32,
    pub minutes_focused: u32,
    pub breaks_taken: u32,
    pub tasks_completed: u32,
    pub days_tracked: usize,
}

/// Today's counters plus the same-day derived metrics, ready for display.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DayReport {
    pub date: NaiveDate,
    pub pomodoros_completed: u32,
    pub minutes_focused: u32,
    pub breaks_taken: u32,
    pub tasks_completed: u32,
    pub daily_goal: u32,
    pub goal_reached: bool,
    /// Sessions still owed by incomplete tasks scheduled today.
    pub remaining_pomos: u32,
    /// Estimated effort of tasks scheduled today and marked done
    /// (estimate x per-task duration, independent of sessions actually run).
    pub completed_minutes: u32,
    /// Local instant the remaining workload would finish, assuming
    /// back-to-back sessions with a fixed 5-minute gap. Absent when nothing
    /// remains.
    pub projected_finish: Option<DateTime<Local>>,
}

/// The per-day statistics collection, persisted under the `daily_stats` key
/// as a JSON array with at most one entry per date.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatsLedger {
    days: Vec<DayStat>,
}

impl StatsLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn iter(&self) -> impl Iterator<Item = &DayStat> {
        self.days.iter()
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayStat> {
        self.days.iter().find(|d| d.date == date)
    }

    /// Guarantee a record for `date` exists, creating a zeroed one if absent.
    /// An existing record is never overwritten.
    pub fn ensure_day(&mut self, date: NaiveDate) -> &mut DayStat {
        if let Some(idx) = self.days.iter().position(|d| d.date == date) {
            return &mut self.days[idx];
        }
        self.days.push(DayStat::zero(date));
        self.days.last_mut().expect("just pushed")
    }

    /// Credit one finished focus session and its minutes to `date`.
    pub fn credit_pomodoro(&mut self, date: NaiveDate, minutes: u32) {
        let day = self.ensure_day(date);
        day.pomodoros_completed = day.pomodoros_completed.saturating_add(1);
        day.minutes_focused = day.minutes_focused.saturating_add(minutes);
    }

    /// Credit one finished break to `date`.
    pub fn credit_break(&mut self, date: NaiveDate) {
        let day = self.ensure_day(date);
        day.breaks_taken = day.breaks_taken.saturating_add(1);
    }

    /// Credit one completed task to `date`.
    pub fn credit_task_completed(&mut self, date: NaiveDate) {
        let day = self.ensure_day(date);
        day.tasks_completed = day.tasks_completed.saturating_add(1);
    }

    /// Debit one completed task from `date`, floored at zero.
    pub fn debit_task_completed(&mut self, date: NaiveDate) {
        let day = self.ensure_day(date);
        day.tasks_completed = day.tasks_completed.saturating_sub(1);
    }

    /// All-time sums across every recorded day.
    pub fn totals(&self) -> Totals {
        let mut t = Totals {
            days_tracked: self.days.len(),
            ..Totals::default()
        };
        for day in &self.days {
            t.pomodoros_completed += day.pomodoros_completed;
            t.minutes_focused += day.minutes_focused;
            t.breaks_taken += day.breaks_taken;
            t.tasks_completed += day.tasks_completed;
        }
        t
    }

    /// The most recent `limit` day records, newest first.
    pub fn recent(&self, limit: usize) -> Vec<DayStat> {
        let mut days = self.days.clone();
        days.sort_by(|a, b| b.date.cmp(&a.date));
        days.truncate(limit);
        days
    }

    /// Build the full today view: stored counters plus derived metrics.
    pub fn day_report(&self, settings: &Settings, tasks: &TaskList, now: DateTime<Local>) -> DayReport {
        let today = now.date_naive();
        let stat = self.day(today).cloned().unwrap_or_else(|| DayStat::zero(today));
        DayReport {
            date: today,
            pomodoros_completed: stat.pomodoros_completed,
            minutes_focused: stat.minutes_focused,
            breaks_taken: stat.breaks_taken,
            tasks_completed: stat.tasks_completed,
            daily_goal: settings.daily_goal,
            goal_reached: stat.pomodoros_completed >= settings.daily_goal,
            remaining_pomos: remaining_workload(tasks, today),
            completed_minutes: completed_minutes(tasks, today),
            projected_finish: projected_finish(tasks, now),
        }
    }
}

/// Sessions still owed today: `max(0, estimate - completed)` summed over
/// incomplete tasks scheduled on `today`.
pub fn remaining_workload(tasks: &TaskList, today: NaiveDate) -> u32 {
    tasks
        .scheduled_on(today)
        .filter(|t| !t.done)
        .map(|t| t.remaining_pomos())
        .sum()
}

/// Estimated minutes of finished work today: `estimate x duration` summed
/// over tasks scheduled on `today` that are marked done. A completed task
/// counts its full estimated effort, whatever its actual session count.
pub fn completed_minutes(tasks: &TaskList, today: NaiveDate) -> u32 {
    tasks
        .scheduled_on(today)
        .filter(|t| t.done)
        .map(|t| t.estimated_pomos.saturating_mul(t.minutes_per_pomo))
        .sum()
}

/// Project when today's remaining workload would finish: each owed session
/// costs its task's duration plus the fixed inter-session gap. Returns None
/// when no sessions remain.
pub fn projected_finish(tasks: &TaskList, now: DateTime<Local>) -> Option<DateTime<Local>> {
    let today = now.date_naive();
    let total_minutes: u32 = tasks
        .scheduled_on(today)
        .filter(|t| !t.done)
        .map(|t| {
            t.remaining_pomos()
                .saturating_mul(t.minutes_per_pomo.saturating_add(SESSION_GAP_MINUTES))
        })
        .sum();
    if total_minutes == 0 {
        return None;
    }
    Some(now + Duration::minutes(i64::from(total_minutes)))
}
