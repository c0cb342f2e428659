//! Countdown state machine.
//!
//! The engine is deliberately pure: it knows nothing about tasks, settings,
//! or storage. It holds a mode, a remaining-seconds counter, and a running
//! flag, and the caller drives it with one-second `tick()` calls; the tick
//! is the sole mutator of `remaining_secs`. Full durations are resolved by
//! the caller and passed in, because they depend on the active task.
//!
//! ## State transitions
//!
//! ```text
//! Idle -(start)-> Running -(pause)-> Idle
//! Running -(tick hits zero)-> stopped, completion reported to the caller
//! ```
//!
//! The caller (the [`Desk`](crate::Desk)) applies completion side effects
//! and moves the engine to the next mode.

use serde::{Deserialize, Serialize};

/// The two interval kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Focus,
    Break,
}

impl Mode {
    /// The mode that follows a completed interval.
    pub fn next(self) -> Mode {
        match self {
            Mode::Focus => Mode::Break,
            Mode::Break => Mode::Focus,
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Focus => write!(f, "focus"),
            Mode::Break => write!(f, "break"),
        }
    }
}

/// Core countdown engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimerEngine {
    mode: Mode,
    /// Remaining whole seconds in the current interval.
    remaining_secs: u32,
    #[serde(default)]
    running: bool,
}

impl TimerEngine {
    /// A stopped engine in `mode` with a full interval ahead of it.
    pub fn new(mode: Mode, full_secs: u32) -> Self {
        Self {
            mode,
            remaining_secs: full_secs,
            running: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// 0.0 .. 1.0 progress against the given full duration.
    ///
    /// Defined as 0 for a zero-length interval; clamped so a stale
    /// `remaining` larger than `full_secs` cannot push it out of range.
    pub fn progress(&self, full_secs: u32) -> f64 {
        if full_secs == 0 {
            return 0.0;
        }
        let done = full_secs.saturating_sub(self.remaining_secs) as f64;
        (done / full_secs as f64).clamp(0.0, 1.0)
    }

    /// Idle -> Running. Returns `false` (no-op) when already running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.running = true;
        true
    }

    /// Running -> Idle at the current remaining value. Returns `false`
    /// when not running.
    pub fn pause(&mut self) -> bool {
        if !self.running {
            return false;
        }
        self.running = false;
        true
    }

    /// Stop and rewind to `full_secs`. Returns `true` when progress was
    /// discarded: the interval had ticked (remaining differed from the full
    /// duration) or was still running.
    pub fn reset(&mut self, full_secs: u32) -> bool {
        let discarded = self.running || self.remaining_secs != full_secs;
        self.running = false;
        self.remaining_secs = full_secs;
        discarded
    }

    /// Stop and move to `mode` with a full interval.
    pub fn switch(&mut self, mode: Mode, full_secs: u32) {
        self.running = false;
        self.mode = mode;
        self.remaining_secs = full_secs;
    }

    /// Recompute the displayed remaining after a duration edit. Only applies
    /// when stopped; an in-progress interval is never shortened or extended.
    pub fn refresh_remaining(&mut self, full_secs: u32) -> bool {
        if self.running {
            return false;
        }
        self.remaining_secs = full_secs;
        true
    }

    /// One elapsed second. Returns `Some(mode)` exactly when the interval
    /// completes: remaining reached zero while running. The engine stops
    /// itself; the caller finishes the transition.
    pub fn tick(&mut self) -> Option<Mode> {
        if !self.running {
            return None;
        }
        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            self.running = false;
            return Some(self.mode);
        }
        None
    }

    /// Apply up to `secs` one-second ticks, stopping at the first
    /// completion. Used to catch a detached running timer up with the
    /// wall clock.
    pub fn advance(&mut self, secs: u64) -> Option<Mode> {
        for _ in 0..secs {
            if let Some(done) = self.tick() {
                return Some(done);
            }
            if !self.running {
                break;
            }
        }
        None
    }

    /// Force the completion transition regardless of remaining time (skip).
    pub fn force_complete(&mut self) -> Mode {
        self.running = false;
        self.remaining_secs = 0;
        self.mode
    }
}
