//! Wall-clock tick source.
//!
//! The engine itself never looks at a clock; something has to feed it
//! one-second ticks. `Ticker` runs a background tokio task that sends a
//! message per second on a channel, and the owner forwards each message
//! to [`TimerEngine::tick`](super::TimerEngine::tick).

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Emits one message per second on a channel while running.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Begin emitting. Starting an already running ticker replaces it:
    /// the previous task is aborted first, so two emitters never run at
    /// once and the old receiver simply closes.
    pub fn start(&mut self) -> mpsc::Receiver<()> {
        self.start_with_period(Duration::from_secs(1))
    }

    /// Same as [`start`](Self::start) with a custom period. Tests use a
    /// short period to avoid real one-second waits.
    pub fn start_with_period(&mut self, period: Duration) -> mpsc::Receiver<()> {
        self.stop();
        let (tx, rx) = mpsc::channel(8);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            // A stalled receiver should not cause a burst of catch-up
            // ticks; skipped seconds are reconciled from the wall clock
            // on the next load instead.
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick resolves immediately; swallow it so ticks
            // arrive one full period after start.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        self.handle = Some(handle);
        rx
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }

    /// Abort the emitting task. Safe to call when already stopped.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}
