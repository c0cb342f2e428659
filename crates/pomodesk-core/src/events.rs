use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::Mode;

/// Every state change on the desk produces an Event.
/// The CLI prints them; the audio layer maps them to cues.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        mode: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerPaused {
        mode: Mode,
        remaining_secs: u32,
        at: DateTime<Utc>,
    },
    TimerReset {
        mode: Mode,
        /// True when the reset discarded a running or partly elapsed
        /// interval rather than an untouched one.
        progress_lost: bool,
        at: DateTime<Utc>,
    },
    /// An interval ran down to zero, or was skipped to the same effect.
    TimerCompleted {
        mode: Mode,
        at: DateTime<Utc>,
    },
    /// Explicit user mode change, as opposed to the automatic advance
    /// after a completion.
    ModeSwitched {
        from: Mode,
        to: Mode,
        at: DateTime<Utc>,
    },
    /// A focus interval was credited to the day (and to a task, when one
    /// was active).
    PomodoroRecorded {
        task_id: Option<String>,
        minutes: u32,
        at: DateTime<Utc>,
    },
    /// The day's completed pomodoro count reached the configured goal.
    DailyGoalReached {
        date: NaiveDate,
        pomodoros: u32,
        at: DateTime<Utc>,
    },
    TaskAdded {
        id: String,
        title: String,
        at: DateTime<Utc>,
    },
    TaskSelected {
        id: String,
        at: DateTime<Utc>,
    },
    TaskUpdated {
        id: String,
        at: DateTime<Utc>,
    },
    TaskDeleted {
        id: String,
        at: DateTime<Utc>,
    },
    TaskCompleted {
        id: String,
        at: DateTime<Utc>,
    },
    TaskReopened {
        id: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short lowercase label for log lines and CLI summaries.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerReset { .. } => "timer_reset",
            Event::TimerCompleted { .. } => "timer_completed",
            Event::ModeSwitched { .. } => "mode_switched",
            Event::PomodoroRecorded { .. } => "pomodoro_recorded",
            Event::DailyGoalReached { .. } => "daily_goal_reached",
            Event::TaskAdded { .. } => "task_added",
            Event::TaskSelected { .. } => "task_selected",
            Event::TaskUpdated { .. } => "task_updated",
            Event::TaskDeleted { .. } => "task_deleted",
            Event::TaskCompleted { .. } => "task_completed",
            Event::TaskReopened { .. } => "task_reopened",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::TimerCompleted {
            mode: Mode::Focus,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "TimerCompleted");
        assert_eq!(json["mode"], "focus");
    }

    #[test]
    fn kind_labels_are_stable() {
        let event = Event::TaskAdded {
            id: "t1".into(),
            title: "write report".into(),
            at: Utc::now(),
        };
        assert_eq!(event.kind(), "task_added");
    }
}
