//! sysmon-core: Core trait and shared helpers for sysmon-indicator.
//!
//! This crate contains the [`Sensor`] trait every built-in sensor implements,
//! the validation error type, shared constants, value formatting, the
//! freshness cache used by network probes and timed subprocess execution.

pub mod cache;
pub mod constants;
mod error;
mod sensor;
pub mod subprocess;
pub mod units;

pub use cache::FreshValue;
pub use constants::{
    CONNECTIVITY_REFRESH, CUSTOM_COMMAND_TIMEOUT, EXEC_ERROR, NOT_AVAILABLE, NO_OUTPUT,
    PROBE_TIMEOUT, PUBLIC_IP_REFRESH,
};
pub use error::SensorError;
pub use sensor::{FetchContext, Sensor, SensorMetadata};
pub use subprocess::{run_program, run_shell, CommandOutcome};
pub use units::{bytes_to_human, format_binary_size, format_celsius, format_percent};
