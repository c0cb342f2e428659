//! The persisted Settings record.
//!
//! One singleton per installation, stored under the `settings` key. Holds the
//! global focus/break durations, the daily pomodoro goal, the focus streak
//! counter, and the last day the app was active (for rollover detection).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::clock;

/// Valid range for focus/break durations, in minutes.
pub const MINUTES_RANGE: std::ops::RangeInclusive<u32> = 1..=600;

/// Global settings record.
///
/// Unknown or malformed fields deserialize to the defaults; numeric fields
/// are additionally run through [`Settings::sanitize`] on load so an
/// out-of-range duration can never reach the timer as a zero or absurd
/// remaining time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    /// Focus session length in minutes.
    #[serde(default = "default_pomodoro_minutes")]
    pub pomodoro_minutes: u32,
    /// Break length in minutes.
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u32,
    /// Target number of focus sessions per day.
    #[serde(default = "default_daily_goal")]
    pub daily_goal: u32,
    /// Completed-focus-session counter, increment-only.
    #[serde(default)]
    pub streak: u32,
    /// Last local calendar day the app was active.
    #[serde(default = "default_last_active_date")]
    pub last_active_date: NaiveDate,
}

fn default_pomodoro_minutes() -> u32 {
    25
}
fn default_break_minutes() -> u32 {
    5
}
fn default_daily_goal() -> u32 {
    8
}
fn default_last_active_date() -> NaiveDate {
    clock::today()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_minutes: default_pomodoro_minutes(),
            break_minutes: default_break_minutes(),
            daily_goal: default_daily_goal(),
            streak: 0,
            last_active_date: default_last_active_date(),
        }
    }
}

impl Settings {
    /// Focus duration in whole seconds.
    pub fn focus_secs(&self) -> u32 {
        self.pomodoro_minutes.saturating_mul(60)
    }

    /// Break duration in whole seconds.
    pub fn break_secs(&self) -> u32 {
        self.break_minutes.saturating_mul(60)
    }

    /// Clamp out-of-range values back to the defaults.
    ///
    /// Applied after loading a record from the store, so a hand-edited or
    /// corrupted record cannot put the timer into a zero-duration state.
    pub fn sanitize(&mut self) {
        if !MINUTES_RANGE.contains(&self.pomodoro_minutes) {
            self.pomodoro_minutes = default_pomodoro_minutes();
        }
        if !MINUTES_RANGE.contains(&self.break_minutes) {
            self.break_minutes = default_break_minutes();
        }
        if self.daily_goal == 0 {
            self.daily_goal = default_daily_goal();
        }
    }

    /// Update the focus duration. Out-of-range input keeps the prior value
    /// and returns `false`.
    pub fn set_pomodoro_minutes(&mut self, minutes: u32) -> bool {
        if MINUTES_RANGE.contains(&minutes) {
            self.pomodoro_minutes = minutes;
            true
        } else {
            false
        }
    }

    /// Update the break duration. Out-of-range input keeps the prior value
    /// and returns `false`.
    pub fn set_break_minutes(&mut self, minutes: u32) -> bool {
        if MINUTES_RANGE.contains(&minutes) {
            self.break_minutes = minutes;
            true
        } else {
            false
        }
    }

    /// Update the daily goal. Zero keeps the prior value and returns `false`.
    pub fn set_daily_goal(&mut self, goal: u32) -> bool {
        if goal == 0 {
            return false;
        }
        self.daily_goal = goal;
        true
    }
}
