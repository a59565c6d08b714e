//! CPU temperature sensor (`cputemp`)

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use sysinfo::Components;
use sysmon_core::{format_celsius, FetchContext, Sensor, SensorMetadata, NOT_AVAILABLE};

const THERMAL_ZONE: &str = "/sys/class/thermal/thermal_zone0";
const HWMON_ROOT: &str = "/sys/class/hwmon";

/// Read a sysfs temperature file (millidegrees Celsius)
fn read_millidegrees(path: &Path) -> Option<f64> {
    let content = fs::read_to_string(path).ok()?;
    let milli: f64 = content.trim().parse().ok()?;
    Some(milli / 1000.0)
}

/// CPU temperature in degrees Celsius.
///
/// Tries the first thermal zone, then `temp1_input` of each hwmon device in
/// name order, then sysinfo's component list.
pub struct CpuTempSensor {
    metadata: SensorMetadata,
    thermal_zone: PathBuf,
    hwmon_root: PathBuf,
    use_components: bool,
}

impl CpuTempSensor {
    pub fn new() -> Self {
        Self {
            use_components: true,
            ..Self::with_paths(THERMAL_ZONE, HWMON_ROOT)
        }
    }

    /// Read from other sysfs locations only (for tests)
    pub fn with_paths(thermal_zone: impl Into<PathBuf>, hwmon_root: impl Into<PathBuf>) -> Self {
        Self {
            metadata: SensorMetadata::new("cputemp", "CPU temperature"),
            thermal_zone: thermal_zone.into(),
            hwmon_root: hwmon_root.into(),
            use_components: false,
        }
    }

    fn from_hwmon(&self) -> Option<f64> {
        let mut devices: Vec<PathBuf> = fs::read_dir(&self.hwmon_root)
            .ok()?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .collect();
        devices.sort();

        devices
            .iter()
            .find_map(|device| read_millidegrees(&device.join("temp1_input")))
    }

    fn from_components() -> Option<f64> {
        let components = Components::new_with_refreshed_list();
        components
            .iter()
            .find(|c| {
                let label = c.label().to_lowercase();
                label.contains("cpu") || label.contains("package") || label.contains("tctl")
            })
            .map(|c| c.temperature() as f64)
    }

    fn read_celsius(&self) -> Option<f64> {
        // A zone reporting exactly 0 is treated as missing
        if let Some(celsius) =
            read_millidegrees(&self.thermal_zone.join("temp")).filter(|&c| c != 0.0)
        {
            return Some(celsius);
        }
        if let Some(celsius) = self.from_hwmon() {
            return Some(celsius);
        }
        if self.use_components {
            return Self::from_components();
        }
        None
    }
}

impl Default for CpuTempSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for CpuTempSensor {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn fetch(&self, _token: &str, _ctx: &FetchContext) -> Result<String> {
        Ok(self
            .read_celsius()
            .map(format_celsius)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thermal_zone_first() {
        let dir = tempfile::tempdir().unwrap();
        let zone = dir.path().join("thermal_zone0");
        fs::create_dir_all(&zone).unwrap();
        fs::write(zone.join("temp"), "45000\n").unwrap();

        let sensor = CpuTempSensor::with_paths(&zone, dir.path().join("hwmon"));
        assert_eq!(sensor.fetch("cputemp", &FetchContext::default()).unwrap(), "45\u{00B0}C");
    }

    #[test]
    fn test_hwmon_fallback_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        let hwmon = dir.path().join("hwmon");
        for (name, temp) in [("hwmon1", "61000"), ("hwmon0", "52400")] {
            let device = hwmon.join(name);
            fs::create_dir_all(&device).unwrap();
            fs::write(device.join("temp1_input"), temp).unwrap();
        }
        fs::create_dir_all(hwmon.join("hwmon2")).unwrap();

        let sensor = CpuTempSensor::with_paths(dir.path().join("missing_zone"), &hwmon);
        assert_eq!(sensor.fetch("cputemp", &FetchContext::default()).unwrap(), "52\u{00B0}C");
    }

    #[test]
    fn test_no_hardware_is_not_available() {
        let dir = tempfile::tempdir().unwrap();
        let sensor =
            CpuTempSensor::with_paths(dir.path().join("zone"), dir.path().join("hwmon"));
        assert_eq!(sensor.fetch("cputemp", &FetchContext::default()).unwrap(), NOT_AVAILABLE);
    }
}
