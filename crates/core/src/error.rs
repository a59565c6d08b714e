//! Validation errors surfaced to the settings editor

use std::path::PathBuf;
use thiserror::Error;

/// Configuration and sensor validation failures.
///
/// These are reported synchronously to whoever edits the settings and never
/// stop a running fetch loop.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SensorError {
    #[error("Sensor name already in use: {0}")]
    NameInUse(String),

    #[error("Sensor is not defined: {0}")]
    NotDefined(String),

    #[error("Can not edit default sensors: {0}")]
    CannotEditBuiltIn(String),

    #[error("Can not delete default sensors: {0}")]
    CannotDeleteBuiltIn(String),

    #[error("Invalid sensor name: '{0}'")]
    InvalidName(String),

    #[error("Invalid number of CPUs: {token} (this machine has {cores})")]
    InvalidCpuIndex { token: String, cores: usize },

    #[error("Invalid number returned for the Battery sensor: {0}")]
    BatteryNotFound(String),

    #[error("Path: {} doesn't exist", .0.display())]
    PathNotFound(PathBuf),

    #[error("{{{0}}} sensor not supported")]
    UnsupportedSensor(String),

    #[error("Interval value should be a number greater than or equal to 1, got {0}")]
    InvalidInterval(String),
}
