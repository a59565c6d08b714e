//! CPU utilization sensor (`cpu`, `cpu0`, `cpu1`, ...)

use crate::lock_shared;
use anyhow::Result;
use once_cell::sync::Lazy;
use std::sync::Mutex;
use sysinfo::{CpuRefreshKind, RefreshKind, System};
use sysmon_core::{format_percent, FetchContext, Sensor, SensorError, SensorMetadata};

/// Shared sysinfo::System used for CPU load sampling.
///
/// sysinfo computes usage from the difference between two refreshes, so the
/// instance must live for the whole process.
static SHARED_CPU_SYSTEM: Lazy<Mutex<System>> = Lazy::new(|| {
    log::info!("Creating shared CPU sysinfo::System instance");
    Mutex::new(System::new_with_specifics(
        RefreshKind::new().with_cpu(CpuRefreshKind::everything()),
    ))
});

/// Take one per-core load sample (percent per logical core).
///
/// Called once per fetch cycle; every `cpu*` token in that cycle reads from
/// the same sample.
pub fn sample_cpu_load() -> Vec<f32> {
    let mut system = lock_shared(&SHARED_CPU_SYSTEM, "CPU system");
    system.refresh_cpu_all();
    system.cpus().iter().map(|cpu| cpu.cpu_usage()).collect()
}

/// Number of logical cores on this machine
pub fn logical_core_count() -> usize {
    let count = lock_shared(&SHARED_CPU_SYSTEM, "CPU system").cpus().len();
    if count > 0 {
        count
    } else {
        std::thread::available_parallelism().map_or(1, |n| n.get())
    }
}

/// Average or per-core CPU utilization
pub struct CpuSensor {
    metadata: SensorMetadata,
    core_count: usize,
}

impl CpuSensor {
    pub fn new() -> Self {
        Self::with_core_count(logical_core_count())
    }

    pub fn with_core_count(core_count: usize) -> Self {
        Self {
            metadata: SensorMetadata::new(r"cpu\d*", "Average CPU usage"),
            core_count,
        }
    }

    /// Core index named by `token`: `None` for the aggregate `cpu` token
    fn core_index(token: &str) -> Option<Option<&str>> {
        let suffix = token.strip_prefix("cpu")?;
        if !suffix.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(if suffix.is_empty() { None } else { Some(suffix) })
    }

    fn ensure_core(&self, token: &str, index: usize) -> Result<(), SensorError> {
        if index >= self.core_count {
            return Err(SensorError::InvalidCpuIndex {
                token: token.to_string(),
                cores: self.core_count,
            });
        }
        Ok(())
    }

    fn average(&self, load: &[f32]) -> f64 {
        let total: f64 = load.iter().map(|&l| l as f64).sum();
        total / self.core_count.max(1) as f64
    }
}

impl Default for CpuSensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Sensor for CpuSensor {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn check(&self, token: &str) -> Result<bool, SensorError> {
        let Some(index) = Self::core_index(token) else {
            return Ok(false);
        };

        let index = match index {
            None => 0,
            Some(digits) => digits.parse::<usize>().unwrap_or(usize::MAX),
        };
        self.ensure_core(token, index)?;
        Ok(true)
    }

    fn fetch(&self, token: &str, ctx: &FetchContext) -> Result<String> {
        let value = match Self::core_index(token) {
            Some(Some(digits)) => {
                let index: usize = digits.parse()?;
                self.ensure_core(token, index)?;
                ctx.cpu_load.get(index).copied().unwrap_or(0.0) as f64
            }
            _ => self.average(&ctx.cpu_load),
        };
        Ok(format_percent(value))
    }
}
