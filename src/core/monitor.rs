//! Indicator facade tying the registry, scheduler and display sink together

use super::display::DisplaySink;
use super::registry::{lock_registry, SensorRegistry, SharedRegistry};
use super::scheduler::{FetchScheduler, SchedulerState};
use anyhow::Result;
use std::sync::{Arc, MutexGuard};
use std::time::Duration;
use sysmon_core::SensorError;
use sysmon_types::is_valid_interval;

/// Owns the one registry instance and the running scheduler.
///
/// Every settings change goes through here so that the old scheduler is
/// stopped before the new one starts.
pub struct Monitor {
    registry: SharedRegistry,
    sink: Arc<dyn DisplaySink>,
    scheduler: Option<FetchScheduler>,
}

impl Monitor {
    pub fn new(registry: SensorRegistry, sink: Arc<dyn DisplaySink>) -> Self {
        Self {
            registry: registry.into_shared(),
            sink,
            scheduler: None,
        }
    }

    /// Lock the registry for reading or editing. Never waits on a running
    /// fetch cycle for longer than it takes to plan one.
    pub fn lock(&self) -> MutexGuard<'_, SensorRegistry> {
        lock_registry(&self.registry)
    }

    pub fn is_running(&self) -> bool {
        self.scheduler
            .as_ref()
            .is_some_and(|s| s.state() == SchedulerState::Running)
    }

    /// Stop the current scheduler (if any) and start a fresh one with the
    /// registry's current interval
    pub fn restart(&mut self) -> Result<()> {
        if let Some(mut old) = self.scheduler.take() {
            old.stop();
        }

        let interval = Duration::from_secs_f64(self.lock().settings().interval);
        let mut scheduler = FetchScheduler::new(self.registry.clone(), self.sink.clone(), interval);
        scheduler.start()?;
        self.scheduler = Some(scheduler);
        Ok(())
    }

    /// Validate and commit a new format string and interval, then restart
    pub fn apply_settings(&mut self, custom_text: &str, interval: f64) -> Result<()> {
        if !is_valid_interval(interval) {
            return Err(SensorError::InvalidInterval(interval.to_string()).into());
        }
        {
            let mut registry = self.lock();
            registry.set_custom_text(custom_text)?;
            registry.set_interval(interval)?;
        }
        self.restart()
    }

    /// Stop fetching for good
    pub fn shutdown(&mut self) {
        if let Some(mut scheduler) = self.scheduler.take() {
            scheduler.stop();
        }
    }
}

impl Drop for Monitor {
    fn drop(&mut self) {
        self.shutdown();
    }
}
