//! NVIDIA GPU sensors (`nvgpu`, `nvgputemp`)
//!
//! Reads device 0 through NVML when built with the `nvidia` feature and the
//! driver library loads. Otherwise falls back to parsing `nvidia-smi` CSV
//! output.

use anyhow::{anyhow, Result};
use sysmon_core::{format_percent, run_program, FetchContext, Sensor, SensorMetadata, PROBE_TIMEOUT};

#[cfg(feature = "nvidia")]
use nvml_wrapper::{enum_wrappers::device::TemperatureSensor, Nvml};
#[cfg(feature = "nvidia")]
use once_cell::sync::Lazy;

/// NVML handle, initialized once on first use
#[cfg(feature = "nvidia")]
static NVML: Lazy<Option<Nvml>> = Lazy::new(|| match Nvml::init() {
    Ok(nvml) => {
        log::info!("NVML initialized");
        Some(nvml)
    }
    Err(e) => {
        log::info!("NVML unavailable, falling back to nvidia-smi: {}", e);
        None
    }
});

/// Which GPU figure to report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpuQuery {
    Utilization,
    Temperature,
}

impl GpuQuery {
    fn smi_field(self) -> &'static str {
        match self {
            GpuQuery::Utilization => "utilization.gpu",
            GpuQuery::Temperature => "temperature.gpu",
        }
    }

    fn format(self, value: u32) -> String {
        match self {
            GpuQuery::Utilization => format_percent(value as f64),
            GpuQuery::Temperature => format!("{}\u{00B0}C", value),
        }
    }

    #[cfg(feature = "nvidia")]
    fn read_nvml(self) -> Option<u32> {
        let nvml = NVML.as_ref()?;
        let device = nvml
            .device_by_index(0)
            .map_err(|e| log::debug!("Failed to get NVIDIA GPU device: {}", e))
            .ok()?;
        match self {
            GpuQuery::Utilization => device.utilization_rates().ok().map(|u| u.gpu),
            GpuQuery::Temperature => device.temperature(TemperatureSensor::Gpu).ok(),
        }
    }

    #[cfg(not(feature = "nvidia"))]
    fn read_nvml(self) -> Option<u32> {
        None
    }

    fn read_smi(self) -> Result<u32> {
        let query = format!("--query-gpu={}", self.smi_field());
        let outcome = run_program("nvidia-smi", &[query.as_str(), "--format=csv"], PROBE_TIMEOUT);
        let stdout = outcome
            .success_stdout()
            .ok_or_else(|| anyhow!("nvidia-smi failed: {:?}", outcome))?;
        parse_smi_csv(stdout)
    }
}

/// Parse the first data row of `nvidia-smi --format=csv` output.
///
/// The first line is the header. Utilization rows carry a trailing `%`.
pub fn parse_smi_csv(output: &str) -> Result<u32> {
    let row = output
        .lines()
        .nth(1)
        .ok_or_else(|| anyhow!("nvidia-smi printed no data row"))?;
    let value = row.trim().trim_end_matches('%').trim();
    value
        .parse()
        .map_err(|e| anyhow!("Unexpected nvidia-smi value '{}': {}", value, e))
}

/// GPU utilization or temperature of the first NVIDIA device
pub struct NvidiaSensor {
    metadata: SensorMetadata,
    query: GpuQuery,
}

impl NvidiaSensor {
    pub fn utilization() -> Self {
        Self {
            metadata: SensorMetadata::new("nvgpu", "Nvidia GPU utilization"),
            query: GpuQuery::Utilization,
        }
    }

    pub fn temperature() -> Self {
        Self {
            metadata: SensorMetadata::new("nvgputemp", "Nvidia GPU Temperature"),
            query: GpuQuery::Temperature,
        }
    }

    pub fn query(&self) -> GpuQuery {
        self.query
    }
}

impl Sensor for NvidiaSensor {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn fetch(&self, _token: &str, _ctx: &FetchContext) -> Result<String> {
        let value = match self.query.read_nvml() {
            Some(value) => value,
            None => self.query.read_smi()?,
        };
        Ok(self.query.format(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_utilization() {
        let output = "utilization.gpu [%]\n37 %\n";
        assert_eq!(parse_smi_csv(output).unwrap(), 37);
    }

    #[test]
    fn test_parse_temperature() {
        let output = "temperature.gpu\n64\n";
        assert_eq!(parse_smi_csv(output).unwrap(), 64);
    }

    #[test]
    fn test_parse_rejects_missing_row() {
        assert!(parse_smi_csv("temperature.gpu\n").is_err());
        assert!(parse_smi_csv("utilization.gpu [%]\n[N/A]\n").is_err());
    }

    #[test]
    fn test_formatting() {
        assert_eq!(GpuQuery::Utilization.format(7), "07%");
        assert_eq!(GpuQuery::Temperature.format(64), "64\u{00B0}C");
    }

    #[test]
    fn test_names() {
        assert_eq!(NvidiaSensor::utilization().metadata().pattern, "nvgpu");
        assert_eq!(NvidiaSensor::temperature().metadata().pattern, "nvgputemp");
        assert_eq!(NvidiaSensor::temperature().query(), GpuQuery::Temperature);
    }
}
