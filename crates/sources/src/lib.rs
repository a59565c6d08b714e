//! sysmon-sources: Built-in sensor implementations for sysmon-indicator.

mod battery;
mod builtin;
mod connectivity;
mod cpu;
mod custom;
mod filesystem;
mod memory;
mod network;
mod nvidia;
mod temperature;

pub use battery::BatterySensor;
pub use builtin::{builtin_sensors, BuiltinSensor};
pub use connectivity::ProbeSensor;
pub use cpu::{logical_core_count, sample_cpu_load, CpuSensor};
pub use custom::{run_custom_command, run_custom_command_with_timeout};
pub use filesystem::{available_bytes, FsSensor};
pub use memory::{memory_used_percent, swap_used_percent, KernelVersion, MemSensor, SwapSensor};
pub use network::{NetCounters, NetMode, NetSensor};
pub use nvidia::{parse_smi_csv, GpuQuery, NvidiaSensor};
pub use temperature::CpuTempSensor;

use std::sync::{Mutex, MutexGuard};

/// Lock a shared sysinfo instance, recovering from a poisoned mutex
pub(crate) fn lock_shared<'a, T>(mutex: &'a Mutex<T>, what: &str) -> MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(|poisoned| {
        log::warn!("{} mutex was poisoned, recovering", what);
        poisoned.into_inner()
    })
}

/// Initialize shared sensor state (call once at startup).
///
/// Takes a first CPU sample and network reading so the first real fetch has
/// a baseline to compare against.
pub fn initialize_sensors() {
    let cores = sample_cpu_load().len();
    let counters = NetCounters::read();
    log::debug!(
        "Sensors initialized: {} cores, {} bytes received so far",
        cores,
        counters.received
    );
}
