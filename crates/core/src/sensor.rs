//! Sensor trait and related types

use crate::error::SensorError;
use anyhow::Result;

/// Metadata about a sensor
#[derive(Debug, Clone)]
pub struct SensorMetadata {
    /// Literal name (`mem`) or name pattern (`cpu\d*`, `fs//.+`) this sensor serves.
    /// Patterns use regex syntax and are anchored by the registry.
    pub pattern: String,
    /// Human-readable description shown in the sensor list
    pub description: String,
}

impl SensorMetadata {
    pub fn new(pattern: &str, description: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            description: description.to_string(),
        }
    }
}

/// Values shared by every token within one fetch cycle
#[derive(Debug, Clone, Default)]
pub struct FetchContext {
    /// Per-core CPU load in percent, sampled once per cycle
    pub cpu_load: Vec<f32>,
    /// Configured refresh interval in seconds
    pub interval: f64,
}

impl FetchContext {
    pub fn new(cpu_load: Vec<f32>, interval: f64) -> Self {
        Self { cpu_load, interval }
    }
}

/// Trait for all built-in sensors
///
/// A sensor owns a namespace of tokens (`cpu`, `cpu3`, `fs///home`, ...).
/// The registry probes sensors in a fixed order with [`Sensor::check`] and
/// hands the token to the first one that claims it.
pub trait Sensor: Send + Sync {
    /// Get metadata about this sensor
    fn metadata(&self) -> &SensorMetadata;

    /// Validate a token against this sensor's namespace.
    ///
    /// - `Ok(true)`: the token belongs to this sensor and is well-formed
    /// - `Ok(false)`: the token is not this sensor's concern
    /// - `Err(_)`: the token belongs here but is malformed (bad index, missing
    ///   device or path)
    fn check(&self, token: &str) -> Result<bool, SensorError> {
        Ok(token == self.metadata().pattern)
    }

    /// Produce the formatted value for `token`.
    ///
    /// Called from the fetch worker only, so implementations may block on file
    /// reads or short subprocesses. Errors are turned into a sentinel value by
    /// the caller. Sensors that keep state between cycles guard it themselves.
    fn fetch(&self, token: &str, ctx: &FetchContext) -> Result<String>;
}
