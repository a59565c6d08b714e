//! Periodic fetch scheduler
//!
//! Each scheduler runs one worker thread with its own tokio runtime. Ticks
//! run the fetch cycle on the blocking pool, one at a time, and hand the
//! rendered label to the display sink through a delivery gate that `stop`
//! closes. The registry is locked only while a cycle is being planned.

use super::display::{DisplaySink, DisplayUpdate, IconUpdate};
use super::registry::{lock_registry, SharedRegistry};
use super::template::{unknown_error_label, Rendered};
use anyhow::{anyhow, bail, Result};
use log::{debug, error, info, trace};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;
use sysmon_sources::sample_cpu_load;
use tokio::sync::oneshot;
use tokio::time::MissedTickBehavior;

/// Takes one per-core CPU load sample
pub type CpuSampler = fn() -> Vec<f32>;

/// Scheduler lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Open until the scheduler stops. Deliveries happen while holding the
/// lock, so once `close` returns nothing more reaches the sink.
struct DeliveryGate {
    open: Mutex<bool>,
}

impl DeliveryGate {
    fn new() -> Self {
        Self {
            open: Mutex::new(true),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, bool> {
        self.open.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn is_open(&self) -> bool {
        *self.lock()
    }

    fn close(&self) {
        *self.lock() = false;
    }

    /// Deliver a rendered cycle if still open. Returns false once closed.
    fn deliver(&self, sink: &dyn DisplaySink, rendered: Rendered) -> bool {
        let open = self.lock();
        if !*open {
            debug!("Scheduler stopped, dropping label '{}'", rendered.label);
            return false;
        }
        if let Some(icon) = rendered.icon {
            sink.deliver(DisplayUpdate::Icon(IconUpdate::from(icon)));
        }
        sink.deliver(DisplayUpdate::Label(rendered.label));
        true
    }
}

/// Runs fetch cycles at a fixed interval and delivers the rendered labels.
///
/// A scheduler is started once and stopped once. Changing the interval or
/// format string means stopping this one and starting a new one.
pub struct FetchScheduler {
    registry: SharedRegistry,
    sink: Arc<dyn DisplaySink>,
    interval: Duration,
    sampler: CpuSampler,
    state: SchedulerState,
    gate: Arc<DeliveryGate>,
    shutdown: Option<oneshot::Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl FetchScheduler {
    pub fn new(registry: SharedRegistry, sink: Arc<dyn DisplaySink>, interval: Duration) -> Self {
        Self::with_sampler(registry, sink, interval, sample_cpu_load)
    }

    pub fn with_sampler(
        registry: SharedRegistry,
        sink: Arc<dyn DisplaySink>,
        interval: Duration,
        sampler: CpuSampler,
    ) -> Self {
        Self {
            registry,
            sink,
            interval,
            sampler,
            state: SchedulerState::Idle,
            gate: Arc::new(DeliveryGate::new()),
            shutdown: None,
            worker: None,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Spawn the worker. The first cycle runs immediately, then one per interval.
    pub fn start(&mut self) -> Result<()> {
        if self.state != SchedulerState::Idle {
            bail!("Scheduler cannot be started from state {:?}", self.state);
        }
        if self.interval.is_zero() {
            bail!("Scheduler interval must be positive");
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let registry = self.registry.clone();
        let sink = self.sink.clone();
        let gate = self.gate.clone();
        let interval = self.interval;
        let sampler = self.sampler;

        let worker = std::thread::Builder::new()
            .name("sysmon-fetch".to_string())
            .spawn(move || {
                let rt = match tokio::runtime::Builder::new_current_thread()
                    .enable_time()
                    .build()
                {
                    Ok(rt) => rt,
                    Err(e) => {
                        error!("Failed to create tokio runtime: {}", e);
                        return;
                    }
                };
                rt.block_on(run_loop(registry, sink, gate, interval, sampler, shutdown_rx));
            })
            .map_err(|e| anyhow!("Failed to spawn fetch thread: {}", e))?;

        self.shutdown = Some(shutdown_tx);
        self.worker = Some(worker);
        self.state = SchedulerState::Running;
        info!("Fetch scheduler started ({:?} interval)", interval);
        Ok(())
    }

    /// Stop ticking and block any further delivery, including the result of
    /// a cycle that is still running. Does not wait for that cycle.
    pub fn stop(&mut self) {
        if self.state != SchedulerState::Running {
            self.state = SchedulerState::Stopped;
            return;
        }

        self.gate.close();
        if let Some(shutdown) = self.shutdown.take() {
            // The worker may already have exited; nothing to signal then
            let _ = shutdown.send(());
        }
        // Detach: a slow command in flight finishes on its own
        self.worker.take();
        self.state = SchedulerState::Stopped;
        info!("Fetch scheduler stopped");
    }
}

impl Drop for FetchScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run_loop(
    registry: SharedRegistry,
    sink: Arc<dyn DisplaySink>,
    gate: Arc<DeliveryGate>,
    period: Duration,
    sampler: CpuSampler,
    mut shutdown: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {}
            _ = &mut shutdown => break,
        }
        if !gate.is_open() {
            break;
        }

        let registry = registry.clone();
        let cycle = tokio::task::spawn_blocking(move || {
            let cpu_load = sampler();
            let job = lock_registry(&registry).fetch_job();
            job.render(cpu_load)
        });

        let rendered = match cycle.await {
            Ok(rendered) => rendered,
            Err(e) => {
                error!("Fetch cycle panicked: {}", e);
                Rendered::diagnostic(unknown_error_label(&e.to_string()))
            }
        };
        trace!("Fetched label '{}'", rendered.label);
        if !gate.deliver(sink.as_ref(), rendered) {
            break;
        }
    }

    debug!("Fetch loop exited");
}
