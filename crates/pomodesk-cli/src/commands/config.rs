use std::error::Error;

use clap::Subcommand;
use pomodesk_core::Config;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print one configuration value
    Get {
        /// Dotted key, e.g. sounds.enabled
        key: String,
    },
    /// Set one configuration value
    Set {
        /// Dotted key, e.g. display.clock_24h
        key: String,
        /// New value
        value: String,
    },
    /// Print the whole configuration
    List,
    /// Restore the default configuration
    Reset,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn Error>> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            match config.get(&key) {
                Some(value) => println!("{value}"),
                None => {
                    eprintln!("unknown key: {key}");
                    std::process::exit(1);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config = Config::load()?;
            config.set(&key, &value)?;
            println!("ok");
        }
        ConfigAction::List => {
            let config = Config::load()?;
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        ConfigAction::Reset => {
            Config::reset()?;
            println!("config reset to defaults");
        }
    }

    Ok(())
}
