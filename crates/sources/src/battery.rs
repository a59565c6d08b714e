//! Battery capacity sensor (`bat`, `bat0`, `bat1`, ...)

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use sysmon_core::{format_percent, FetchContext, Sensor, SensorError, SensorMetadata, NOT_AVAILABLE};

const POWER_SUPPLY_ROOT: &str = "/sys/class/power_supply";

/// Remaining battery capacity by index (default 0)
pub struct BatterySensor {
    metadata: SensorMetadata,
    root: PathBuf,
}

impl BatterySensor {
    pub fn new() -> Self {
        Self::with_root(POWER_SUPPLY_ROOT)
    }

    /// Use a different power supply class directory (for tests)
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            metadata: SensorMetadata::new(r"bat\d*", "Battery capacity"),
            root: root.into(),
        }
    }

    /// Battery index named by `token`, `None` if the token is not a battery token.
    /// An unparseable (overflowing) index maps to `u64::MAX`, which never exists.
    fn battery_index(token: &str) -> Option<u64> {
        let suffix = token.strip_prefix("bat")?;
        if !suffix.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        if suffix.is_empty() {
            Some(0)
        } else {
            Some(suffix.parse().unwrap_or(u64::MAX))
        }
    }

    fn device_path(&self, index: u64) -> PathBuf {
        self.root.join(format!("BAT{}", index))
    }

    fn read_capacity(device: &Path) -> Result<f64> {
        let content = fs::read_to_string(device.join("capacity"))?;
        Ok(content.trim().parse::<f64>()?)
    }
}

impl Default for BatterySensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for BatterySensor {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn check(&self, token: &str) -> Result<bool, SensorError> {
        let Some(index) = Self::battery_index(token) else {
            return Ok(false);
        };
        if !self.device_path(index).exists() {
            return Err(SensorError::BatteryNotFound(token.to_string()));
        }
        Ok(true)
    }

    fn fetch(&self, token: &str, _ctx: &FetchContext) -> Result<String> {
        let index = Self::battery_index(token).unwrap_or(0);
        match Self::read_capacity(&self.device_path(index)) {
            Ok(capacity) => Ok(format_percent(capacity)),
            Err(e) => {
                log::debug!("Battery {} capacity unavailable: {}", index, e);
                Ok(NOT_AVAILABLE.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fake_battery(root: &Path, name: &str, capacity: Option<&str>) {
        let device = root.join(name);
        fs::create_dir_all(&device).unwrap();
        if let Some(capacity) = capacity {
            fs::write(device.join("capacity"), capacity).unwrap();
        }
    }

    #[test]
    fn test_check_requires_device() {
        let dir = tempfile::tempdir().unwrap();
        fake_battery(dir.path(), "BAT0", Some("87\n"));
        let sensor = BatterySensor::with_root(dir.path());

        assert_eq!(sensor.check("bat"), Ok(true));
        assert_eq!(sensor.check("bat0"), Ok(true));
        assert_eq!(
            sensor.check("bat1"),
            Err(SensorError::BatteryNotFound("bat1".to_string()))
        );
        assert_eq!(sensor.check("battery"), Ok(false));
        assert_eq!(sensor.check("mem"), Ok(false));
    }

    #[test]
    fn test_fetch_capacity() {
        let dir = tempfile::tempdir().unwrap();
        fake_battery(dir.path(), "BAT0", Some("87\n"));
        fake_battery(dir.path(), "BAT1", Some("5\n"));
        let sensor = BatterySensor::with_root(dir.path());
        let ctx = FetchContext::default();

        assert_eq!(sensor.fetch("bat", &ctx).unwrap(), "87%");
        assert_eq!(sensor.fetch("bat1", &ctx).unwrap(), "05%");
    }

    #[test]
    fn test_unreadable_capacity_is_not_available() {
        let dir = tempfile::tempdir().unwrap();
        fake_battery(dir.path(), "BAT0", None);
        let sensor = BatterySensor::with_root(dir.path());

        assert_eq!(sensor.fetch("bat0", &FetchContext::default()).unwrap(), NOT_AVAILABLE);
    }
}
