//! Settings file on disk

use anyhow::{anyhow, Context, Result};
use log::{info, warn};
use std::path::{Path, PathBuf};
use sysmon_types::{SavedSettings, Settings};

const SETTINGS_FILE: &str = "settings.json";

/// Per-user configuration directory for sysmon-indicator
pub fn config_dir() -> Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("com", "github.sysmon", "sysmon-indicator")
        .ok_or_else(|| anyhow!("Could not determine config directory"))?;
    Ok(dirs.config_dir().to_path_buf())
}

/// Reads and writes the JSON settings file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default per-user location
    pub fn default_location() -> Result<Self> {
        Ok(Self::new(config_dir()?.join(SETTINGS_FILE)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read saved settings; `Ok(None)` when no file exists yet
    pub fn try_load(&self) -> Result<Option<SavedSettings>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        let saved = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))?;
        info!("Loaded settings from {:?}", self.path);
        Ok(Some(saved))
    }

    /// Read saved settings, logging and ignoring any failure
    pub fn load(&self) -> Option<SavedSettings> {
        match self.try_load() {
            Ok(saved) => saved,
            Err(e) => {
                warn!("Reading settings failed, using defaults: {:#}", e);
                None
            }
        }
    }

    /// Overwrite the settings file
    pub fn save(&self, settings: &Settings) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(settings)?;
        std::fs::write(&self.path, content)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        info!("Saved settings to {:?}", self.path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysmon_types::SensorDefinition;

    #[test]
    fn test_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("settings.json"));
        assert!(store.try_load().unwrap().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = SettingsStore::new(dir.path().join("nested").join("settings.json"));

        let mut settings = Settings::default();
        settings.custom_text = "up: {weather}".to_string();
        settings.interval = 5.0;
        settings
            .sensors
            .insert("weather".to_string(), SensorDefinition::custom("Weather", "echo sunny"));
        settings.sensors.insert("mem".to_string(), SensorDefinition::builtin("Memory"));
        store.save(&settings).unwrap();

        let saved = store.load().unwrap();
        assert_eq!(saved.custom_text.as_deref(), Some("up: {weather}"));
        assert_eq!(saved.interval, Some(5.0));
        assert_eq!(saved.on_startup, Some(false));
        let sensors = saved.sensors.unwrap();
        assert_eq!(sensors["weather"].command.shell(), Some("echo sunny"));
        assert!(sensors["mem"].is_builtin());
    }

    #[test]
    fn test_malformed_file_falls_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = SettingsStore::new(&path);
        assert!(store.try_load().is_err());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_partial_file_loads() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        std::fs::write(&path, r#"{"interval": 3, "custom_text": null}"#).unwrap();

        let saved = SettingsStore::new(&path).load().unwrap();
        assert_eq!(saved.interval, Some(3.0));
        assert!(saved.custom_text.is_none());
        assert!(saved.sensors.is_none());
    }
}
