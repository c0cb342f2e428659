use std::error::Error;

use clap::Subcommand;
use pomodesk_core::Store;

use super::common;

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the current settings
    Show,
    /// Set the default focus duration in minutes
    Focus {
        /// Minutes per focus interval (1-600)
        minutes: u32,
    },
    /// Set the break duration in minutes
    Break {
        /// Minutes per break interval (1-600)
        minutes: u32,
    },
    /// Set the daily pomodoro goal
    Goal {
        /// Sessions per day
        sessions: u32,
    },
}

pub fn run(action: SettingsAction) -> Result<(), Box<dyn Error>> {
    let store = Store::open()?;
    let (mut desk, _) = common::open_desk(&store);

    match action {
        SettingsAction::Show => {}
        SettingsAction::Focus { minutes } => {
            desk.set_focus_minutes(minutes)?;
        }
        SettingsAction::Break { minutes } => {
            desk.set_break_minutes(minutes)?;
        }
        SettingsAction::Goal { sessions } => {
            desk.set_daily_goal(sessions)?;
        }
    }

    common::save_desk(&store, &desk)?;
    println!("{}", serde_json::to_string_pretty(desk.settings())?);
    Ok(())
}
