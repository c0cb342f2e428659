//! Task records and the ordered task list.
//!
//! Tasks are the unit of planning: each carries an estimated session count,
//! a per-task session duration that overrides the global focus duration while
//! the task is active, and the local calendar day it is scheduled for.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::settings::MINUTES_RANGE;

/// Valid range for a task's estimated session count.
pub const ESTIMATE_RANGE: std::ops::RangeInclusive<u32> = 0..=1000;

/// A single task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique identifier, generated at creation, immutable.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub done: bool,
    /// Target number of focus sessions.
    #[serde(default = "default_estimate")]
    pub estimated_pomos: u32,
    /// Focus sessions finished against this task. May exceed the estimate.
    #[serde(default)]
    pub completed_pomos: u32,
    /// Per-task session duration in minutes, overriding the global setting
    /// while this task is active.
    #[serde(default = "default_minutes_per_pomo")]
    pub minutes_per_pomo: u32,
    /// Scheduled local calendar day.
    pub date: NaiveDate,
}

fn default_estimate() -> u32 {
    1
}
fn default_minutes_per_pomo() -> u32 {
    25
}

impl Task {
    /// Create a task with a fresh id, not done, zero completed sessions.
    pub fn new(title: impl Into<String>, estimated_pomos: u32, minutes_per_pomo: u32, date: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            done: false,
            estimated_pomos,
            completed_pomos: 0,
            minutes_per_pomo,
            date,
        }
    }

    /// Session duration in whole seconds.
    pub fn duration_secs(&self) -> u32 {
        self.minutes_per_pomo.saturating_mul(60)
    }

    /// Sessions still owed against the estimate, floored at zero.
    pub fn remaining_pomos(&self) -> u32 {
        self.estimated_pomos.saturating_sub(self.completed_pomos)
    }
}

/// Ordered task collection, persisted under the `tasks` key as a JSON array.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    /// Append a new task and return a reference to it.
    pub fn add(&mut self, task: Task) -> &Task {
        self.tasks.push(task);
        self.tasks.last().expect("just pushed")
    }

    /// Remove a task by id, returning it if present.
    pub fn remove(&mut self, id: &str) -> Option<Task> {
        let idx = self.tasks.iter().position(|t| t.id == id)?;
        Some(self.tasks.remove(idx))
    }

    /// Flip a task's done flag, returning the new state.
    pub fn toggle_done(&mut self, id: &str) -> Option<bool> {
        let task = self.get_mut(id)?;
        task.done = !task.done;
        Some(task.done)
    }

    /// Record one finished focus session against a task.
    pub fn record_pomo(&mut self, id: &str) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.completed_pomos = task.completed_pomos.saturating_add(1);
                true
            }
            None => false,
        }
    }

    /// Update a task's per-session duration. Out-of-range minutes keep the
    /// prior value and return `false`.
    pub fn set_minutes_per_pomo(&mut self, id: &str, minutes: u32) -> bool {
        if !MINUTES_RANGE.contains(&minutes) {
            return false;
        }
        match self.get_mut(id) {
            Some(task) => {
                task.minutes_per_pomo = minutes;
                true
            }
            None => false,
        }
    }

    /// Update a task's estimated session count. Out-of-range estimates keep
    /// the prior value and return `false`.
    pub fn set_estimate(&mut self, id: &str, estimate: u32) -> bool {
        if !ESTIMATE_RANGE.contains(&estimate) {
            return false;
        }
        match self.get_mut(id) {
            Some(task) => {
                task.estimated_pomos = estimate;
                true
            }
            None => false,
        }
    }

    /// Move a task to another scheduled day.
    pub fn set_date(&mut self, id: &str, date: NaiveDate) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.date = date;
                true
            }
            None => false,
        }
    }

    /// Rename a task.
    pub fn set_title(&mut self, id: &str, title: impl Into<String>) -> bool {
        match self.get_mut(id) {
            Some(task) => {
                task.title = title.into();
                true
            }
            None => false,
        }
    }

    /// Tasks scheduled on the given day, in list order.
    pub fn scheduled_on(&self, date: NaiveDate) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.date == date)
    }
}
