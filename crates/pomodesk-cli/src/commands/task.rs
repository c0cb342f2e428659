//! Task management commands.

use std::error::Error;

use chrono::NaiveDate;
use clap::Subcommand;
use pomodesk_core::clock;
use pomodesk_core::{Event, Store, Task};

use super::common;

#[derive(Subcommand)]
pub enum TaskAction {
    /// Add a task, selecting it when nothing is active yet
    Add {
        /// Task title
        title: String,
        /// Estimated pomodoros (default: 1)
        #[arg(long, default_value = "1")]
        estimate: u32,
        /// Minutes one pomodoro of this task takes (default: 25)
        #[arg(long, default_value = "25")]
        duration: u32,
        /// Scheduled date, YYYY-MM-DD (default: today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// List tasks scheduled for today, or another selection
    List {
        /// Show every task regardless of date
        #[arg(long)]
        all: bool,
        /// Only tasks scheduled on this date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "all")]
        date: Option<NaiveDate>,
    },
    /// Make a task the active one
    Select {
        /// Task ID
        id: String,
    },
    /// Toggle a task between done and open
    Done {
        /// Task ID
        id: String,
    },
    /// Delete a task
    Delete {
        /// Task ID
        id: String,
    },
    /// Edit fields of an existing task
    Edit {
        /// Task ID
        id: String,
        /// New title
        #[arg(long)]
        title: Option<String>,
        /// New estimated pomodoros
        #[arg(long)]
        estimate: Option<u32>,
        /// New minutes per pomodoro
        #[arg(long)]
        duration: Option<u32>,
        /// New scheduled date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn Error>> {
    let store = Store::open()?;
    let (mut desk, _) = common::open_desk(&store);
    let mut cues: Vec<Event> = Vec::new();

    match action {
        TaskAction::Add {
            title,
            estimate,
            duration,
            date,
        } => {
            let date = date.unwrap_or_else(clock::today);
            let events = desk.add_task(title, estimate, duration, date)?;
            if let Some(Event::TaskAdded { id, .. }) = events.first() {
                println!("Task created: {id}");
                if let Some(task) = desk.tasks().get(id) {
                    println!("{}", serde_json::to_string_pretty(task)?);
                }
            }
        }
        TaskAction::List { all, date } => {
            let tasks: Vec<&Task> = if all {
                desk.tasks().iter().collect()
            } else {
                let date = date.unwrap_or_else(clock::today);
                desk.tasks().scheduled_on(date).collect()
            };
            println!("{}", serde_json::to_string_pretty(&tasks)?);
        }
        TaskAction::Select { id } => {
            desk.select_task(&id)?;
            if let Some(task) = desk.tasks().get(&id) {
                println!("{}", serde_json::to_string_pretty(task)?);
            }
        }
        TaskAction::Done { id } => {
            let events = desk.toggle_task(&id, clock::today())?;
            common::print_events(&events)?;
            cues = events;
        }
        TaskAction::Delete { id } => {
            desk.delete_task(&id)?;
            println!("Task deleted: {id}");
        }
        TaskAction::Edit {
            id,
            title,
            estimate,
            duration,
            date,
        } => {
            if let Some(title) = title {
                desk.set_task_title(&id, title)?;
            }
            if let Some(estimate) = estimate {
                desk.set_task_estimate(&id, estimate)?;
            }
            if let Some(duration) = duration {
                desk.set_task_duration(&id, duration)?;
            }
            if let Some(date) = date {
                desk.set_task_date(&id, date)?;
            }
            println!("Task updated:");
            if let Some(task) = desk.tasks().get(&id) {
                println!("{}", serde_json::to_string_pretty(task)?);
            }
        }
    }

    // save before ringing; the cue join can block up to the playback cap
    common::save_desk(&store, &desk)?;
    common::play_cues(&cues);
    Ok(())
}
