use std::error::Error;

use clap::Subcommand;
use pomodesk_core::clock;
use pomodesk_core::{Config, Store};

use super::common;

#[derive(Subcommand)]
pub enum StatsAction {
    /// Today's counters, goal progress, and projected finish time
    Today,
    /// Lifetime totals across every tracked day
    All,
    /// Per-day counters for the most recent days
    History {
        /// How many days back to include
        #[arg(long, default_value_t = 7)]
        days: usize,
    },
}

pub fn run(action: StatsAction) -> Result<(), Box<dyn Error>> {
    let store = Store::open()?;
    let (desk, _) = common::open_desk(&store);
    common::save_desk(&store, &desk)?;

    match action {
        StatsAction::Today => {
            let report = desk.day_report(clock::now_local());
            println!("{}", serde_json::to_string_pretty(&report)?);
            if let Some(finish) = report.projected_finish {
                let config = Config::load_or_default();
                let stamp = if config.display.clock_24h {
                    finish.format("%H:%M")
                } else {
                    finish.format("%I:%M %p")
                };
                eprintln!("projected finish: {stamp}");
            }
        }
        StatsAction::All => {
            println!("{}", serde_json::to_string_pretty(&desk.stats().totals())?);
        }
        StatsAction::History { days } => {
            println!("{}", serde_json::to_string_pretty(&desk.stats().recent(days))?);
        }
    }

    Ok(())
}
