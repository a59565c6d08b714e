//! Memory (`mem`) and swap (`swap`) usage sensors

use anyhow::{anyhow, Context, Result};
use std::fs;
use std::path::PathBuf;
use sysinfo::System;
use sysmon_core::{format_percent, FetchContext, Sensor, SensorMetadata, NOT_AVAILABLE};

const MEMINFO_PATH: &str = "/proc/meminfo";
const SWAPS_PATH: &str = "/proc/swaps";

/// Running kernel version (major.minor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelVersion {
    pub major: u32,
    pub minor: u32,
}

impl KernelVersion {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse a release string such as `6.8.0-45-generic` or `3.16-rc1`
    pub fn parse(release: &str) -> Option<Self> {
        let mut parts = release.split('.');
        let major = parts.next()?.trim().parse().ok()?;
        let minor_part = parts.next()?;
        let digits: String = minor_part
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();
        let minor = digits.parse().ok()?;
        Some(Self { major, minor })
    }

    /// Version of the running kernel, if it can be determined
    pub fn current() -> Option<Self> {
        System::kernel_version().as_deref().and_then(Self::parse)
    }

    /// `MemAvailable` was added to /proc/meminfo in Linux 3.16
    pub fn has_mem_available(&self) -> bool {
        (self.major == 3 && self.minor >= 16) || self.major > 3
    }
}

/// First number on the first line of `meminfo` starting with `field`
fn meminfo_kb(meminfo: &str, field: &str) -> Result<u64> {
    let line = meminfo
        .lines()
        .find(|line| line.starts_with(field))
        .ok_or_else(|| anyhow!("{} not found in meminfo", field))?;
    let digits: String = line
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits
        .parse()
        .with_context(|| format!("Failed to parse {} from '{}'", field, line))
}

/// Percentage of physical memory in use.
///
/// Kernels since 3.16 expose `MemAvailable`; older ones are approximated with
/// `MemFree + Cached`.
pub fn memory_used_percent(meminfo: &str, kernel: KernelVersion) -> Result<f64> {
    let total = meminfo_kb(meminfo, "MemTotal")? as f64;
    if total <= 0.0 {
        return Err(anyhow!("MemTotal is zero"));
    }

    let available = if kernel.has_mem_available() {
        meminfo_kb(meminfo, "MemAvailable")?
    } else {
        meminfo_kb(meminfo, "MemFree")? + meminfo_kb(meminfo, "Cached")?
    };

    Ok(100.0 - 100.0 * available as f64 / total)
}

/// Physical memory in use
pub struct MemSensor {
    metadata: SensorMetadata,
    meminfo_path: PathBuf,
    kernel: KernelVersion,
}

impl MemSensor {
    pub fn new() -> Self {
        let kernel = KernelVersion::current().unwrap_or_else(|| {
            log::warn!("Could not determine kernel version, assuming MemAvailable is present");
            KernelVersion::new(3, 16)
        });
        Self::with_source(MEMINFO_PATH, kernel)
    }

    pub fn with_source(meminfo_path: impl Into<PathBuf>, kernel: KernelVersion) -> Self {
        Self {
            metadata: SensorMetadata::new("mem", "Physical memory in use"),
            meminfo_path: meminfo_path.into(),
            kernel,
        }
    }
}

impl Default for MemSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for MemSensor {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn fetch(&self, _token: &str, _ctx: &FetchContext) -> Result<String> {
        let meminfo = fs::read_to_string(&self.meminfo_path)
            .with_context(|| format!("Failed to read {}", self.meminfo_path.display()))?;
        Ok(format_percent(memory_used_percent(&meminfo, self.kernel)?))
    }
}

/// Percentage of swap in use from the contents of /proc/swaps
pub fn swap_used_percent(swaps: &str) -> Result<f64> {
    let mut total: u64 = 0;
    let mut used: u64 = 0;

    // Filename Type Size Used Priority
    for line in swaps.lines().skip(1).filter(|l| !l.trim().is_empty()) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            return Err(anyhow!("Malformed swaps line: '{}'", line));
        }
        total += fields[2].parse::<u64>()?;
        used += fields[3].parse::<u64>()?;
    }

    if total == 0 {
        Ok(0.0)
    } else {
        Ok(used as f64 * 100.0 / total as f64)
    }
}

/// Swap usage; reports "N/A" when swap accounting can't be read
pub struct SwapSensor {
    metadata: SensorMetadata,
    swaps_path: PathBuf,
}

impl SwapSensor {
    pub fn new() -> Self {
        Self::with_source(SWAPS_PATH)
    }

    pub fn with_source(swaps_path: impl Into<PathBuf>) -> Self {
        Self {
            metadata: SensorMetadata::new("swap", "Average swap usage"),
            swaps_path: swaps_path.into(),
        }
    }
}

impl Default for SwapSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for SwapSensor {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn fetch(&self, _token: &str, _ctx: &FetchContext) -> Result<String> {
        let percent = fs::read_to_string(&self.swaps_path)
            .map_err(anyhow::Error::from)
            .and_then(|swaps| swap_used_percent(&swaps));

        match percent {
            Ok(percent) => Ok(format_percent(percent)),
            Err(e) => {
                log::debug!("Swap usage unavailable: {}", e);
                Ok(NOT_AVAILABLE.to_string())
            }
        }
    }
}
