//! Core error types for pomodesk-core.
//!
//! A small thiserror hierarchy: storage and preferences get their own enums,
//! everything else funnels through [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for pomodesk-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Durable store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Preferences file errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Referenced task id does not exist
    #[error("No task with id {0}")]
    UnknownTask(String),

    /// Rejected numeric input (kept the prior value)
    #[error("{0}")]
    InvalidInput(String),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Durable-store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Failed to open the store database
    #[error("Failed to open store at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema creation failed
    #[error("Store migration failed: {0}")]
    MigrationFailed(String),

    /// Database is locked
    #[error("Store is locked")]
    Locked,
}

/// Preferences-file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load preferences
    #[error("Failed to load preferences from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save preferences
    #[error("Failed to save preferences to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid preference value
    #[error("Invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown preference key
    #[error("Unknown preference key: {0}")]
    UnknownKey(String),
}

impl From<rusqlite::Error> for StorageError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StorageError::Locked
                } else {
                    StorageError::QueryFailed(err.to_string())
                }
            }
            _ => StorageError::QueryFailed(err.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Storage(err.into())
    }
}

impl From<Box<dyn std::error::Error + Send + Sync>> for CoreError {
    fn from(err: Box<dyn std::error::Error + Send + Sync>) -> Self {
        CoreError::Custom(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
