use std::error::Error;

use clap::Subcommand;
use pomodesk_core::clock;
use pomodesk_core::{Desk, Event, Mode, Store, Ticker};

use super::common;

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start the countdown
    Start,
    /// Pause the countdown, keeping remaining time
    Pause,
    /// Rewind the current interval to its full duration
    Reset,
    /// End the current interval now, as if it ran out
    Skip,
    /// Print the timer state as JSON
    Status,
    /// Switch between focus and break
    Mode {
        /// Target mode (focus | break)
        mode: String,
    },
    /// Run the countdown in the foreground until the interval completes
    Run,
}

fn print_events_or_status(desk: &Desk, events: &[Event]) -> Result<(), Box<dyn Error>> {
    if events.is_empty() {
        println!("{}", serde_json::to_string_pretty(&desk.status())?);
    } else {
        println!("{}", serde_json::to_string_pretty(events)?);
    }
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn Error>> {
    let store = Store::open()?;
    let (mut desk, _) = common::open_desk(&store);
    let mut cues: Vec<Event> = Vec::new();

    match action {
        TimerAction::Start => {
            let events = desk.start_timer();
            print_events_or_status(&desk, &events)?;
        }
        TimerAction::Pause => {
            let events = desk.pause_timer();
            print_events_or_status(&desk, &events)?;
        }
        TimerAction::Reset => {
            let events = desk.reset_timer();
            print_events_or_status(&desk, &events)?;
            cues = events;
        }
        TimerAction::Skip => {
            let events = desk.skip(clock::today());
            print_events_or_status(&desk, &events)?;
            cues = events;
        }
        TimerAction::Status => {
            println!("{}", serde_json::to_string_pretty(&desk.status())?);
        }
        TimerAction::Mode { mode } => {
            let target = match mode.as_str() {
                "focus" => Mode::Focus,
                "break" => Mode::Break,
                other => {
                    return Err(format!("unknown mode: {other} (expected focus or break)").into())
                }
            };
            let events = desk.switch_mode(target);
            print_events_or_status(&desk, &events)?;
        }
        TimerAction::Run => {
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(run_foreground(&store, &mut desk))?;
        }
    }

    // save before ringing; the cue join can block up to the playback cap
    common::save_desk(&store, &desk)?;
    common::play_cues(&cues);
    Ok(())
}

/// Drive one interval to completion, painting a countdown on stderr.
/// Ctrl-C pauses and saves instead of losing the session.
async fn run_foreground(store: &Store, desk: &mut Desk) -> Result<(), Box<dyn Error>> {
    let events = desk.start_timer();
    common::save_desk(store, desk)?;
    common::print_events(&events)?;

    let mut ticker = Ticker::new();
    let mut ticks = ticker.start();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                let events = desk.pause_timer();
                common::save_desk(store, desk)?;
                eprintln!();
                common::print_events(&events)?;
                break;
            }
            tick = ticks.recv() => {
                if tick.is_none() {
                    break;
                }
                let events = desk.tick(clock::today());
                common::save_desk(store, desk)?;
                let status = desk.status();
                eprint!(
                    "\r{} {:02}:{:02}  ",
                    status.mode,
                    status.remaining_secs / 60,
                    status.remaining_secs % 60
                );
                if !events.is_empty() {
                    eprintln!();
                    common::print_events(&events)?;
                    common::play_cues(&events);
                    break;
                }
            }
        }
    }

    ticker.stop();
    Ok(())
}
