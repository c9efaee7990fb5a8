//! TOML-based engine configuration.
//!
//! Stores the tunable rule parameters:
//! - Operating hours used for after-hours detection
//! - The year-independent holiday table
//! - Rapid-revisit thresholds and the emergency re-check cadence
//! - Reveal timing ranges
//! - Output and history limits
//!
//! Configuration is stored at `~/.config/wayfinder/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::clock::Holiday;
use crate::error::ConfigError;

/// Operating hours. Outside `[open_hour, close_hour)` counts as after hours.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoursConfig {
    #[serde(default = "default_open_hour")]
    pub open_hour: u32,
    #[serde(default = "default_close_hour")]
    pub close_hour: u32,
}

/// Calendar configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default = "default_holidays")]
    pub holidays: Vec<Holiday>,
}

/// Emergency detection configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyConfig {
    /// Sessions younger than this count as "fresh" for rapid-revisit detection.
    #[serde(default = "default_rapid_window")]
    pub rapid_revisit_window_secs: u64,
    /// Visits to a single route above this, within a fresh session, signal distress.
    #[serde(default = "default_rapid_threshold")]
    pub rapid_revisit_threshold: u32,
    #[serde(default = "default_recheck_interval")]
    pub recheck_interval_secs: u64,
}

/// Reveal timing configuration (milliseconds).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevealConfig {
    #[serde(default = "default_urgent_delay")]
    pub urgent_delay_ms: u64,
    #[serde(default = "default_base_min")]
    pub base_delay_min_ms: u64,
    #[serde(default = "default_base_max")]
    pub base_delay_max_ms: u64,
    #[serde(default = "default_stagger_min")]
    pub stagger_min_ms: u64,
    #[serde(default = "default_stagger_max")]
    pub stagger_max_ms: u64,
    /// How often the session driver polls pending reveals.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_ms: u64,
}

/// Output and history bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimitsConfig {
    #[serde(default = "default_max_actions")]
    pub max_actions: usize,
    #[serde(default = "default_max_frequent_actions")]
    pub max_frequent_actions: usize,
    #[serde(default = "default_max_suggestions")]
    pub max_suggestions: usize,
    #[serde(default = "default_max_suggestions_extended")]
    pub max_suggestions_extended: usize,
    #[serde(default = "default_history_len")]
    pub history_len: usize,
    #[serde(default = "default_frequent_len")]
    pub frequent_len: usize,
    #[serde(default = "default_frequent_threshold")]
    pub frequent_threshold: u32,
    #[serde(default = "default_preferred_len")]
    pub preferred_len: usize,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/wayfinder/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub hours: HoursConfig,
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub emergency: EmergencyConfig,
    #[serde(default)]
    pub reveal: RevealConfig,
    #[serde(default)]
    pub limits: LimitsConfig,
}

/// Emergency mode is re-checked at least once a minute.
const MAX_RECHECK_INTERVAL_SECS: u64 = 60;
const MAX_WINDOW_SECS: u64 = 86_400;
const MAX_DELAY_MS: u64 = 3_600_000;

// Default functions
fn default_open_hour() -> u32 {
    7
}
fn default_close_hour() -> u32 {
    23
}
fn default_holidays() -> Vec<Holiday> {
    crate::clock::default_holidays()
}
fn default_rapid_window() -> u64 {
    120
}
fn default_rapid_threshold() -> u32 {
    3
}
fn default_recheck_interval() -> u64 {
    60
}
fn default_urgent_delay() -> u64 {
    500
}
fn default_base_min() -> u64 {
    3000
}
fn default_base_max() -> u64 {
    5000
}
fn default_stagger_min() -> u64 {
    5000
}
fn default_stagger_max() -> u64 {
    7000
}
fn default_poll_interval() -> u64 {
    100
}
fn default_max_actions() -> usize {
    6
}
fn default_max_frequent_actions() -> usize {
    2
}
fn default_max_suggestions() -> usize {
    2
}
fn default_max_suggestions_extended() -> usize {
    3
}
fn default_history_len() -> usize {
    5
}
fn default_frequent_len() -> usize {
    5
}
fn default_frequent_threshold() -> u32 {
    2
}
fn default_preferred_len() -> usize {
    10
}

impl Default for HoursConfig {
    fn default() -> Self {
        Self {
            open_hour: default_open_hour(),
            close_hour: default_close_hour(),
        }
    }
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            holidays: default_holidays(),
        }
    }
}

impl Default for EmergencyConfig {
    fn default() -> Self {
        Self {
            rapid_revisit_window_secs: 120,
            rapid_revisit_threshold: 3,
            recheck_interval_secs: 60,
        }
    }
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            urgent_delay_ms: 500,
            base_delay_min_ms: 3000,
            base_delay_max_ms: 5000,
            stagger_min_ms: 5000,
            stagger_max_ms: 7000,
            poll_interval_ms: 100,
        }
    }
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_actions: 6,
            max_frequent_actions: 2,
            max_suggestions: 2,
            max_suggestions_extended: 3,
            history_len: 5,
            frequent_len: 5,
            frequent_threshold: 2,
            preferred_len: 10,
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().is_none() || key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value
                        .parse::<bool>()
                        .map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => serde_json::Value::Number(
                    value
                        .parse::<u64>()
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?
                        .into(),
                ),
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                _ => serde_json::Value::String(value.into()),
            };
            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    /// Default location of the configuration file.
    pub fn path() -> Result<PathBuf, ConfigError> {
        let dir = data_dir().map_err(|e| ConfigError::LoadFailed {
            path: PathBuf::from("~/.config/wayfinder"),
            message: e.to_string(),
        })?;
        Ok(dir.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load and validate a configuration file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config = toml::from_str(&content)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))
    }

    /// Load from disk, returning default on error.
    pub fn load_or_default() -> Self {
        match Self::load() {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::warn!(error = %e, "falling back to default configuration");
                Self::default()
            }
        }
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Set a config value by dot-separated key without persisting it.
    ///
    /// The updated configuration must still pass [`Config::validate`].
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json =
            serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config =
            serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };

        if self.hours.open_hour > 23 {
            return invalid("hours.open_hour", "must be between 0 and 23");
        }
        if self.hours.close_hour > 24 || self.hours.close_hour <= self.hours.open_hour {
            return invalid("hours.close_hour", "must be after open_hour and at most 24");
        }
        for holiday in &self.calendar.holidays {
            if chrono::NaiveDate::from_ymd_opt(2024, holiday.month, holiday.day).is_none() {
                return invalid("calendar.holidays", "contains an impossible month/day");
            }
        }
        if self.reveal.base_delay_min_ms >= self.reveal.base_delay_max_ms {
            return invalid("reveal.base_delay_min_ms", "must be below base_delay_max_ms");
        }
        if self.reveal.stagger_min_ms >= self.reveal.stagger_max_ms {
            return invalid("reveal.stagger_min_ms", "must be below stagger_max_ms");
        }
        if self.reveal.poll_interval_ms == 0 {
            return invalid("reveal.poll_interval_ms", "must be positive");
        }
        if self.emergency.recheck_interval_secs == 0
            || self.emergency.recheck_interval_secs > MAX_RECHECK_INTERVAL_SECS
        {
            return invalid("emergency.recheck_interval_secs", "must be between 1 and 60");
        }
        if self.emergency.rapid_revisit_window_secs > MAX_WINDOW_SECS {
            return invalid("emergency.rapid_revisit_window_secs", "must be at most 86400");
        }
        for (key, value) in [
            ("reveal.urgent_delay_ms", self.reveal.urgent_delay_ms),
            ("reveal.base_delay_min_ms", self.reveal.base_delay_min_ms),
            ("reveal.base_delay_max_ms", self.reveal.base_delay_max_ms),
            ("reveal.stagger_min_ms", self.reveal.stagger_min_ms),
            ("reveal.stagger_max_ms", self.reveal.stagger_max_ms),
            ("reveal.poll_interval_ms", self.reveal.poll_interval_ms),
        ] {
            if value > MAX_DELAY_MS {
                return invalid(key, "must be at most 3600000");
            }
        }
        if self.limits.max_actions == 0 || self.limits.history_len == 0 {
            return invalid("limits", "output and history limits must be positive");
        }
        if self.limits.max_suggestions_extended < self.limits.max_suggestions {
            return invalid(
                "limits.max_suggestions_extended",
                "must be at least max_suggestions",
            );
        }
        Ok(())
    }
}
