mod config;
mod store;

pub use config::{Config, DisplayConfig, SoundsConfig};
pub use store::{Store, KEY_DAILY_STATS, KEY_SETTINGS, KEY_TASKS, KEY_TIMER_SESSION};

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/pomodesk[-dev]/` based on POMODESK_ENV.
///
/// Set POMODESK_ENV=dev to keep development data away from the real store.
///
/// # Errors
/// Returns an error if the directory cannot be created.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("POMODESK_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("pomodesk-dev")
    } else {
        base_dir.join("pomodesk")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
