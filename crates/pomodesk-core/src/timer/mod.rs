mod engine;
mod ticker;

pub use engine::{Mode, TimerEngine};
pub use ticker::Ticker;
