//! Network throughput sensors (`net`, `netcomp`, `totalnet`)

use crate::lock_shared;
use anyhow::Result;
use once_cell::sync::Lazy;
use std::sync::Mutex;
use sysinfo::Networks;
use sysmon_core::{bytes_to_human, FetchContext, Sensor, SensorMetadata};

/// Shared Networks instance for all network sensors.
static SHARED_NETWORKS: Lazy<Mutex<Networks>> = Lazy::new(|| {
    log::info!("Creating shared Networks sysinfo instance");
    Mutex::new(Networks::new_with_refreshed_list())
});

/// Cumulative byte counters summed over every interface
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NetCounters {
    pub received: u64,
    pub sent: u64,
}

impl NetCounters {
    pub fn new(received: u64, sent: u64) -> Self {
        Self { received, sent }
    }

    /// Read the current totals from the system
    pub fn read() -> Self {
        let mut networks = lock_shared(&SHARED_NETWORKS, "Networks");
        networks.refresh();
        networks.iter().fold(Self::default(), |acc, (_, data)| Self {
            received: acc.received + data.total_received(),
            sent: acc.sent + data.total_transmitted(),
        })
    }
}

/// Which figure a network sensor reports
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetMode {
    /// `↓ X/s ↑ Y/s`
    Split,
    /// `⇵ Z/s` (download + upload)
    Compact,
    /// ` Σ Z`, cumulative totals
    Total,
}

/// Network activity sensor.
///
/// Rates are `(current - previous) / interval`. The previous snapshot starts
/// at zero, so the first reading after start is the whole counter divided by
/// the interval.
pub struct NetSensor {
    metadata: SensorMetadata,
    mode: NetMode,
    previous: Mutex<NetCounters>,
}

impl NetSensor {
    pub fn new(mode: NetMode) -> Self {
        let metadata = match mode {
            NetMode::Split => SensorMetadata::new("net", "Network activity"),
            NetMode::Compact => SensorMetadata::new("netcomp", "Network activity in compact form"),
            NetMode::Total => SensorMetadata::new("totalnet", "Total network activity"),
        };
        Self {
            metadata,
            mode,
            previous: Mutex::new(NetCounters::default()),
        }
    }

    /// Format a reading from `current` counters and update the snapshot
    pub fn format_counters(&self, current: NetCounters, interval: f64) -> String {
        let interval = if interval > 0.0 { interval } else { 1.0 };

        match self.mode {
            NetMode::Split | NetMode::Compact => {
                let previous = {
                    let mut snapshot = lock_shared(&self.previous, "Network snapshot");
                    std::mem::replace(&mut *snapshot, current)
                };
                let down = (current.received as f64 - previous.received as f64) / interval;
                let up = (current.sent as f64 - previous.sent as f64) / interval;

                if self.mode == NetMode::Split {
                    format!(
                        "\u{2193} {:>9}/s \u{2191} {:>9}/s",
                        bytes_to_human(down),
                        bytes_to_human(up)
                    )
                } else {
                    format!("\u{21f5} {:>9}/s", bytes_to_human(down + up))
                }
            }
            // Cumulative totals are divided by the interval too
            NetMode::Total => {
                let total = (current.received as f64 + current.sent as f64) / interval;
                format!(" \u{03a3} {:>9}", bytes_to_human(total))
            }
        }
    }
}

impl Sensor for NetSensor {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn fetch(&self, _token: &str, ctx: &FetchContext) -> Result<String> {
        Ok(self.format_counters(NetCounters::read(), ctx.interval))
    }
}
