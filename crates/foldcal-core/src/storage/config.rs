//! TOML-based engine configuration.
//!
//! Holds the constants the renderer and the engine have to agree on:
//! - Drag distance and snap thresholds for the gesture tracker
//! - Collapsed/expanded heights and fade tuning for the layout
//! - Month and weekday names for the header
//!
//! Configuration is stored at `~/.config/foldcal/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::error::{ConfigError, CoreError, Result, ValidationError};

/// Gesture tracker tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GestureConfig {
    /// Pointer travel (px) that maps to a full 0 -> 1 sweep.
    #[serde(default = "default_max_drag_distance")]
    pub max_drag_distance: f64,
    #[serde(default = "default_snap_low")]
    pub snap_low: f64,
    #[serde(default = "default_snap_high")]
    pub snap_high: f64,
    /// Delay between release and snap evaluation.
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,
}

/// Layout and per-cell animation tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Container height at progress 0.
    #[serde(default = "default_base_height")]
    pub base_height: f64,
    /// Fixed part of the expanded height (header, weekday labels, handle).
    #[serde(default = "default_header_height")]
    pub header_height: f64,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    /// Fade band width as a fraction of the revealed additional-date count.
    #[serde(default = "default_fade_band_ratio")]
    pub fade_band_ratio: f64,
    #[serde(default = "default_min_cell_scale")]
    pub min_cell_scale: f64,
    /// Out-of-month cells are dimmed only past this progress.
    #[serde(default = "default_other_month_threshold")]
    pub other_month_threshold: f64,
}

/// Header labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocaleConfig {
    #[serde(default = "default_month_names")]
    pub month_names: Vec<String>,
    /// Monday first.
    #[serde(default = "default_weekday_names")]
    pub weekday_names: Vec<String>,
}

/// Engine configuration.
///
/// Serialized to/from TOML at `~/.config/foldcal/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub gesture: GestureConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub locale: LocaleConfig,
}

// Default functions
fn default_max_drag_distance() -> f64 {
    100.0
}
fn default_snap_low() -> f64 {
    0.3
}
fn default_snap_high() -> f64 {
    0.7
}
fn default_settle_delay_ms() -> u64 {
    50
}
fn default_base_height() -> f64 {
    220.0
}
fn default_header_height() -> f64 {
    180.0
}
fn default_row_height() -> f64 {
    50.0
}
fn default_fade_band_ratio() -> f64 {
    0.2
}
fn default_min_cell_scale() -> f64 {
    0.8
}
fn default_other_month_threshold() -> f64 {
    0.3
}
fn default_month_names() -> Vec<String> {
    [
        "Январь", "Февраль", "Март", "Апрель", "Май", "Июнь", "Июль", "Август", "Сентябрь",
        "Октябрь", "Ноябрь", "Декабрь",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
fn default_weekday_names() -> Vec<String> {
    ["Пн", "Вт", "Ср", "Чт", "Пт", "Сб", "Вс"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            max_drag_distance: default_max_drag_distance(),
            snap_low: default_snap_low(),
            snap_high: default_snap_high(),
            settle_delay_ms: default_settle_delay_ms(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_height: default_base_height(),
            header_height: default_header_height(),
            row_height: default_row_height(),
            fade_band_ratio: default_fade_band_ratio(),
            min_cell_scale: default_min_cell_scale(),
            other_month_threshold: default_other_month_threshold(),
        }
    }
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            month_names: default_month_names(),
            weekday_names: default_weekday_names(),
        }
    }
}

impl GestureConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(self.max_drag_distance > 0.0 && self.max_drag_distance.is_finite()) {
            return Err(ValidationError::InvalidValue {
                field: "gesture.max_drag_distance".into(),
                message: format!("must be a positive number, got {}", self.max_drag_distance),
            });
        }
        check_unit("gesture.snap_low", self.snap_low)?;
        check_unit("gesture.snap_high", self.snap_high)?;
        if self.snap_low > self.snap_high {
            return Err(ValidationError::InvalidValue {
                field: "gesture.snap_low".into(),
                message: format!(
                    "snap_low ({}) must not exceed snap_high ({})",
                    self.snap_low, self.snap_high
                ),
            });
        }
        Ok(())
    }
}

impl LayoutConfig {
    /// Container height when every row of a `rows`-row grid is visible.
    pub fn expanded_height(&self, rows: usize) -> f64 {
        self.header_height + rows as f64 * self.row_height
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        check_non_negative("layout.base_height", self.base_height)?;
        check_non_negative("layout.header_height", self.header_height)?;
        check_non_negative("layout.row_height", self.row_height)?;
        if !(self.fade_band_ratio > 0.0 && self.fade_band_ratio.is_finite()) {
            return Err(ValidationError::InvalidValue {
                field: "layout.fade_band_ratio".into(),
                message: format!("must be a positive number, got {}", self.fade_band_ratio),
            });
        }
        if !(self.min_cell_scale > 0.0 && self.min_cell_scale <= 1.0) {
            return Err(ValidationError::OutOfRange {
                field: "layout.min_cell_scale".into(),
                value: self.min_cell_scale,
                min: 0.0,
                max: 1.0,
            });
        }
        check_unit("layout.other_month_threshold", self.other_month_threshold)
    }
}

impl LocaleConfig {
    /// Name for a 1-based month number.
    pub fn month_name(&self, month: u32) -> &str {
        month
            .checked_sub(1)
            .and_then(|i| self.month_names.get(i as usize))
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.month_names.len() != 12 {
            return Err(ValidationError::InvalidValue {
                field: "locale.month_names".into(),
                message: format!("expected 12 names, got {}", self.month_names.len()),
            });
        }
        if self.weekday_names.len() != 7 {
            return Err(ValidationError::InvalidValue {
                field: "locale.weekday_names".into(),
                message: format!("expected 7 names, got {}", self.weekday_names.len()),
            });
        }
        Ok(())
    }
}

fn check_unit(field: &str, value: f64) -> Result<(), ValidationError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field: field.into(),
            value,
            min: 0.0,
            max: 1.0,
        })
    }
}

fn check_non_negative(field: &str, value: f64) -> Result<(), ValidationError> {
    if value >= 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::InvalidValue {
            field: field.into(),
            message: format!("must be a non-negative number, got {value}"),
        })
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
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(n) if n.is_u64() => {
                        let parsed = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as integer")))?;
                        serde_json::Value::Number(parsed.into())
                    }
                    serde_json::Value::Number(_) => value
                        .parse::<f64>()
                        .ok()
                        .and_then(serde_json::Number::from_f64)
                        .map(serde_json::Value::Number)
                        .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?,
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Check every section against its allowed ranges.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.gesture.validate()?;
        self.layout.validate()?;
        self.locale.validate()
    }

    /// Load from disk, writing and returning the default if no file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed or
    /// fails validation, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate a config file at an explicit path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        if let Err(err) = cfg.validate() {
            tracing::warn!(path = %path.display(), error = %err, "rejecting invalid configuration");
            return Err(CoreError::Config(err.into()));
        }
        Ok(cfg)
    }

    /// Persist to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        Ok(())
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

    /// Set a config value by key without persisting it.
    ///
    /// The value keeps the type of the field it replaces, and the whole
    /// config is re-validated; on error `self` is left untouched.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate().map_err(ConfigError::from)?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }
}
