//! The fixed set of built-in sensors

use crate::{
    BatterySensor, CpuSensor, CpuTempSensor, FsSensor, MemSensor, NetMode, NetSensor,
    NvidiaSensor, ProbeSensor, SwapSensor,
};
use anyhow::Result;
use sysmon_core::{FetchContext, Sensor, SensorError, SensorMetadata};
use sysmon_types::SensorDefinition;

/// One built-in sensor.
///
/// An enum instead of `Box<dyn Sensor>` so the registry can hold the whole
/// set in a plain `Vec` with a single indirection.
pub enum BuiltinSensor {
    Cpu(CpuSensor),
    NvGpu(NvidiaSensor),
    Mem(MemSensor),
    Net(NetSensor),
    NetComp(NetSensor),
    TotalNet(NetSensor),
    Bat(BatterySensor),
    Fs(FsSensor),
    Swap(SwapSensor),
    UpOrDown(ProbeSensor),
    PublicIp(ProbeSensor),
    CpuTemp(CpuTempSensor),
    NvGpuTemp(NvidiaSensor),
}

impl BuiltinSensor {
    pub fn as_sensor(&self) -> &dyn Sensor {
        match self {
            BuiltinSensor::Cpu(s) => s,
            BuiltinSensor::NvGpu(s) | BuiltinSensor::NvGpuTemp(s) => s,
            BuiltinSensor::Mem(s) => s,
            BuiltinSensor::Net(s) | BuiltinSensor::NetComp(s) | BuiltinSensor::TotalNet(s) => s,
            BuiltinSensor::Bat(s) => s,
            BuiltinSensor::Fs(s) => s,
            BuiltinSensor::Swap(s) => s,
            BuiltinSensor::UpOrDown(s) | BuiltinSensor::PublicIp(s) => s,
            BuiltinSensor::CpuTemp(s) => s,
        }
    }

    /// Name or name pattern, e.g. `cpu\d*`
    pub fn name(&self) -> &str {
        &self.metadata().pattern
    }

    /// Entry for the sensor table
    pub fn definition(&self) -> SensorDefinition {
        SensorDefinition::builtin(self.metadata().description.clone())
    }
}

impl Sensor for BuiltinSensor {
    fn metadata(&self) -> &SensorMetadata {
        self.as_sensor().metadata()
    }

    fn check(&self, token: &str) -> Result<bool, SensorError> {
        self.as_sensor().check(token)
    }

    fn fetch(&self, token: &str, ctx: &FetchContext) -> Result<String> {
        self.as_sensor().fetch(token, ctx)
    }
}

/// All built-in sensors, in the order tokens are probed against them
pub fn builtin_sensors() -> Vec<BuiltinSensor> {
    vec![
        BuiltinSensor::Cpu(CpuSensor::new()),
        BuiltinSensor::NvGpu(NvidiaSensor::utilization()),
        BuiltinSensor::Mem(MemSensor::new()),
        BuiltinSensor::Net(NetSensor::new(NetMode::Split)),
        BuiltinSensor::NetComp(NetSensor::new(NetMode::Compact)),
        BuiltinSensor::TotalNet(NetSensor::new(NetMode::Total)),
        BuiltinSensor::Bat(BatterySensor::new()),
        BuiltinSensor::Fs(FsSensor::new()),
        BuiltinSensor::Swap(SwapSensor::new()),
        BuiltinSensor::UpOrDown(ProbeSensor::upordown()),
        BuiltinSensor::PublicIp(ProbeSensor::publicip()),
        BuiltinSensor::CpuTemp(CpuTempSensor::new()),
        BuiltinSensor::NvGpuTemp(NvidiaSensor::temperature()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_order() {
        let names: Vec<String> = builtin_sensors().iter().map(|s| s.name().to_string()).collect();
        assert_eq!(
            names,
            vec![
                r"cpu\d*", "nvgpu", "mem", "net", "netcomp", "totalnet", r"bat\d*", "fs//.+",
                "swap", "upordown", "publicip", "cputemp", "nvgputemp",
            ]
        );
    }

    #[test]
    fn test_definitions_are_builtin() {
        for sensor in builtin_sensors() {
            let definition = sensor.definition();
            assert!(definition.is_builtin());
            assert!(!definition.description.is_empty());
        }
    }

    #[test]
    fn test_first_claim_wins() {
        let sensors = builtin_sensors();
        let claimant = |token: &str| {
            sensors
                .iter()
                .find(|s| s.check(token).unwrap_or(true))
                .map(|s| s.name().to_string())
        };
        assert_eq!(claimant("netcomp").as_deref(), Some("netcomp"));
        assert_eq!(claimant("cpu").as_deref(), Some(r"cpu\d*"));
        assert_eq!(claimant("fs///").as_deref(), Some("fs//.+"));
        assert_eq!(claimant("bogus"), None);
    }
}
