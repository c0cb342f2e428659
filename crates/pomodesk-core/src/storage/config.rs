//! TOML preferences file.
//!
//! Presentation preferences only: audio cues and display choices. The
//! timer durations, daily goal, and streak are domain records living in
//! the [`Store`](super::Store), not here, so there is a single source of
//! truth for each. Stored at `~/.config/pomodesk/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::data_dir;
use crate::audio::SoundPrefs;
use crate::error::{ConfigError, Result};

/// Audio cue preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Path to a custom alarm sound (optional).
    #[serde(default)]
    pub alarm: Option<String>,
    /// Path to a custom task-completion sound (optional).
    #[serde(default)]
    pub success: Option<String>,
    /// Path to a custom discarded-session sound (optional).
    #[serde(default)]
    pub fail: Option<String>,
}

/// Display preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Render projected times on a 24-hour clock.
    #[serde(default = "default_true")]
    pub clock_24h: bool,
}

/// Application preferences.
///
/// Serialized to/from TOML at `~/.config/pomodesk/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sounds: SoundsConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

fn default_true() -> bool {
    true
}

impl Default for SoundsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            alarm: None,
            success: None,
            fail: None,
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { clock_24h: true }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sounds: SoundsConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Config {
    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk; a missing file is written out with the defaults.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be parsed, or if
    /// the default config cannot be written.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).map_err(|e| {
                ConfigError::LoadFailed {
                    path,
                    message: e.to_string(),
                }
                .into()
            }),
            Err(_) => {
                let cfg = Self::default();
                cfg.save()?;
                Ok(cfg)
            }
        }
    }

    /// Load from disk, returning the defaults on any error.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    /// Persist to disk.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.clone(),
            message: e.to_string(),
        })?;
        std::fs::write(&path, content).map_err(|e| ConfigError::SaveFailed {
            path,
            message: e.to_string(),
        })?;
        Ok(())
    }

    /// Overwrite the file with the defaults and return them.
    pub fn reset() -> Result<Self> {
        let cfg = Self::default();
        cfg.save()?;
        Ok(cfg)
    }

    /// Get a value as a string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let value = value_at(&json, key)?;
        match value {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a value by dot-separated key, coercing the string to the
    /// field's current type, then persist.
    ///
    /// # Errors
    /// Returns an error for an unknown key, an unparseable value, or a
    /// failed save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        set_value_at(&mut json, key, value)?;
        *self = serde_json::from_value(json)?;
        self.save()?;
        Ok(())
    }

    /// All leaf entries as (dotted key, rendered value) pairs.
    pub fn entries(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        if let Ok(json) = serde_json::to_value(self) {
            collect_entries("", &json, &mut out);
        }
        out
    }

    /// Bridge to the audio layer.
    pub fn sound_prefs(&self) -> SoundPrefs {
        SoundPrefs {
            enabled: self.sounds.enabled,
            alarm: self.sounds.alarm.as_ref().map(PathBuf::from),
            success: self.sounds.success.as_ref().map(PathBuf::from),
            fail: self.sounds.fail.as_ref().map(PathBuf::from),
        }
    }
}

fn value_at<'a>(root: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    if key.is_empty() {
        return None;
    }
    key.split('.').try_fold(root, |node, part| node.get(part))
}

fn set_value_at(
    root: &mut serde_json::Value,
    key: &str,
    raw: &str,
) -> Result<(), ConfigError> {
    let unknown = || ConfigError::UnknownKey(key.to_string());
    let (parent_path, leaf) = match key.rsplit_once('.') {
        Some((parent, leaf)) => (Some(parent), leaf),
        None => (None, key),
    };
    if leaf.is_empty() {
        return Err(unknown());
    }
    let parent = match parent_path {
        Some(path) => path
            .split('.')
            .try_fold(&mut *root, |node, part| node.get_mut(part))
            .ok_or_else(unknown)?,
        None => root,
    };
    let obj = parent.as_object_mut().ok_or_else(unknown)?;
    let existing = obj.get(leaf).ok_or_else(unknown)?;
    let new_value = coerce_like(existing, raw).map_err(|message| ConfigError::InvalidValue {
        key: key.to_string(),
        message,
    })?;
    obj.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Parse `raw` into the same JSON type as `existing`. Null fields accept a
/// plain string, which is how an unset optional path gets its first value.
fn coerce_like(existing: &serde_json::Value, raw: &str) -> Result<serde_json::Value, String> {
    use serde_json::Value;
    match existing {
        Value::Bool(_) => raw
            .parse::<bool>()
            .map(Value::Bool)
            .map_err(|_| format!("cannot parse '{raw}' as bool")),
        Value::Number(_) => {
            if let Ok(n) = raw.parse::<u64>() {
                Ok(Value::Number(n.into()))
            } else if let Ok(n) = raw.parse::<f64>() {
                serde_json::Number::from_f64(n)
                    .map(Value::Number)
                    .ok_or_else(|| format!("cannot parse '{raw}' as number"))
            } else {
                Err(format!("cannot parse '{raw}' as number"))
            }
        }
        Value::Object(_) | Value::Array(_) => {
            serde_json::from_str(raw).map_err(|e| e.to_string())
        }
        _ => Ok(Value::String(raw.to_string())),
    }
}

fn collect_entries(prefix: &str, value: &serde_json::Value, out: &mut Vec<(String, String)>) {
    match value {
        serde_json::Value::Object(map) => {
            for (k, v) in map {
                let path = if prefix.is_empty() {
                    k.clone()
                } else {
                    format!("{prefix}.{k}")
                };
                collect_entries(&path, v, out);
            }
        }
        serde_json::Value::String(s) => out.push((prefix.to_string(), s.clone())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}
