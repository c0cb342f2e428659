//! SQLite-backed durable store.
//!
//! Every record is a JSON value in a single `kv` table, keyed by the
//! constants below. Loads never fail the caller: a missing or malformed
//! record falls back to its default so a damaged store degrades to a fresh
//! start for that record instead of a crash.

use std::path::Path;

use rusqlite::{params, Connection};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::data_dir;
use crate::desk::TimerSession;
use crate::error::{Result, StorageError};
use crate::settings::Settings;
use crate::stats::StatsLedger;
use crate::task::TaskList;

pub const KEY_SETTINGS: &str = "settings";
pub const KEY_TASKS: &str = "tasks";
pub const KEY_DAILY_STATS: &str = "daily_stats";
pub const KEY_TIMER_SESSION: &str = "timer_session";

/// Durable key-value store for the persisted records.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open the store at `~/.config/pomodesk/pomodesk.db`, creating the
    /// file and schema on first use.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("pomodesk.db");
        Self::open_at(&path)
    }

    /// Open the store at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StorageError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let store = Self { conn };
        store
            .migrate()
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(store)
    }

    /// Open an in-memory store (for tests).
    #[cfg(test)]
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        let store = Self { conn };
        store
            .migrate()
            .map_err(|e| StorageError::MigrationFailed(e.to_string()))?;
        Ok(store)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Get a raw value from the kv table.
    pub fn kv_get(&self, key: &str) -> Result<Option<String>, rusqlite::Error> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, String>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Set a raw value in the kv table.
    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), rusqlite::Error> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }

    fn load_or<T: DeserializeOwned>(&self, key: &str, fallback: impl FnOnce() -> T) -> T {
        self.kv_get(key)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_else(fallback)
    }

    fn save_json<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv_set(key, &raw)
            .map_err(|e| StorageError::QueryFailed(e.to_string()))?;
        Ok(())
    }

    /// Load the settings record, defaulting when missing or malformed.
    pub fn load_settings(&self) -> Settings {
        self.load_or(KEY_SETTINGS, Settings::default)
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        self.save_json(KEY_SETTINGS, settings)
    }

    /// Load the task list, empty when missing or malformed.
    pub fn load_tasks(&self) -> TaskList {
        self.load_or(KEY_TASKS, TaskList::new)
    }

    pub fn save_tasks(&self, tasks: &TaskList) -> Result<()> {
        self.save_json(KEY_TASKS, tasks)
    }

    /// Load the statistics ledger, empty when missing or malformed.
    pub fn load_stats(&self) -> StatsLedger {
        self.load_or(KEY_DAILY_STATS, StatsLedger::new)
    }

    pub fn save_stats(&self, stats: &StatsLedger) -> Result<()> {
        self.save_json(KEY_DAILY_STATS, stats)
    }

    /// Load the persisted timer session, if one is present and readable.
    /// There is no meaningful default; the caller builds a fresh desk
    /// when this returns `None`.
    pub fn load_session(&self) -> Option<TimerSession> {
        self.kv_get(KEY_TIMER_SESSION)
            .ok()
            .flatten()
            .and_then(|raw| serde_json::from_str(&raw).ok())
    }

    pub fn save_session(&self, session: &TimerSession) -> Result<()> {
        self.save_json(KEY_TIMER_SESSION, session)
    }
}
