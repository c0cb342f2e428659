//! # Pomodesk Core Library
//!
//! Core business logic for the pomodesk Pomodoro timer and daily task
//! list. All operations are available through the standalone CLI binary;
//! this crate owns the state, the rules, and the persistence.
//!
//! ## Architecture
//!
//! - **Desk**: single owner of settings, tasks, statistics, and the timer
//!   engine; every user intent is one synchronous `Desk` call returning
//!   the events it produced
//! - **Timer**: a pure countdown state machine driven by caller-invoked
//!   `tick()`, plus a tokio-based one-second tick source
//! - **Storage**: SQLite-backed key-value store for the persisted records
//!   and TOML-based preferences
//! - **Audio**: capped cue playback mapped from desk events
//!
//! ## Key Components
//!
//! - [`Desk`]: state owner and coordinator
//! - [`TimerEngine`]: countdown state machine
//! - [`Store`]: durable record persistence
//! - [`Config`]: preferences management

pub mod audio;
pub mod clock;
pub mod desk;
pub mod error;
pub mod events;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod task;
pub mod timer;

pub use desk::{Desk, DeskStatus, TimerSession};
pub use error::{ConfigError, CoreError, StorageError};
pub use events::Event;
pub use settings::Settings;
pub use stats::{DayReport, DayStat, StatsLedger, Totals};
pub use storage::{Config, Store};
pub use task::{Task, TaskList};
pub use timer::{Mode, Ticker, TimerEngine};
