//! Indicator settings and their on-disk representation.

use crate::sensor::SensorSet;
use serde::{Deserialize, Serialize};

/// Default format string shown on first start
pub const DEFAULT_CUSTOM_TEXT: &str = "cpu: {cpu} mem: {mem}";

/// Default refresh interval in seconds
pub const DEFAULT_INTERVAL: f64 = 2.0;

/// Smallest accepted refresh interval in seconds
pub const MIN_INTERVAL: f64 = 1.0;

/// Whether `interval` is an acceptable refresh interval
pub fn is_valid_interval(interval: f64) -> bool {
    interval.is_finite() && interval >= MIN_INTERVAL
}

/// Complete indicator settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Format string with `{sensor}` placeholders
    pub custom_text: String,
    /// Refresh interval in seconds (fractional allowed, minimum 1)
    pub interval: f64,
    /// Start automatically with the desktop session
    pub on_startup: bool,
    /// Built-in and custom sensors
    pub sensors: SensorSet,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            custom_text: DEFAULT_CUSTOM_TEXT.to_string(),
            interval: DEFAULT_INTERVAL,
            on_startup: false,
            sensors: SensorSet::new(),
        }
    }
}

impl Settings {
    /// Merge previously saved settings over these ones.
    ///
    /// Missing keys keep the current values. Saved sensors extend or override
    /// the current set, except that a built-in entry is never replaced by a
    /// custom command.
    pub fn merge(&mut self, saved: SavedSettings) {
        if let Some(custom_text) = saved.custom_text {
            self.custom_text = custom_text;
        }

        if let Some(interval) = saved.interval {
            if is_valid_interval(interval) {
                self.interval = interval;
            } else {
                log::warn!(
                    "Ignoring saved interval {} (must be >= {}), keeping {}",
                    interval,
                    MIN_INTERVAL,
                    self.interval
                );
            }
        }

        if let Some(on_startup) = saved.on_startup {
            self.on_startup = on_startup;
        }

        for (name, definition) in saved.sensors.unwrap_or_default() {
            match self.sensors.get(&name) {
                Some(existing) if existing.is_builtin() && !definition.is_builtin() => {
                    log::warn!("Saved sensor '{}' shadows a built-in sensor, ignoring", name);
                }
                Some(existing) if existing.is_builtin() => {
                    // Keep the shipped description for built-ins
                }
                _ => {
                    self.sensors.insert(name, definition);
                }
            }
        }
    }
}

/// Settings as read from disk, where every top-level key is optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SavedSettings {
    #[serde(default)]
    pub custom_text: Option<String>,
    #[serde(default)]
    pub interval: Option<f64>,
    #[serde(default)]
    pub on_startup: Option<bool>,
    #[serde(default)]
    pub sensors: Option<SensorSet>,
}
