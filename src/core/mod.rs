//! Sensor registry, template engine and fetch scheduling

mod display;
mod monitor;
mod registry;
mod scheduler;
pub mod template;

pub use display::{ChannelSink, DisplaySink, DisplayUpdate, IconUpdate};
pub use monitor::Monitor;
pub use registry::{
    lock_registry, FetchCycle, FetchJob, Resolved, SensorInfo, SensorRegistry, SharedRegistry,
    UnresolvedToken,
};
pub use scheduler::{CpuSampler, FetchScheduler, SchedulerState};
pub use template::{Rendered, Template};
