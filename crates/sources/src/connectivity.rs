//! Network probes with a freshness window (`upordown`, `publicip`)

use crate::custom::run_custom_command_with_timeout;
use crate::lock_shared;
use anyhow::Result;
use std::sync::Mutex;
use std::time::Duration;
use sysmon_core::{
    FetchContext, FreshValue, Sensor, SensorMetadata, CONNECTIVITY_REFRESH, PROBE_TIMEOUT,
    PUBLIC_IP_REFRESH,
};

const CONNECTIVITY_COMMAND: &str =
    "if wget -qO /dev/null google.com > /dev/null; then echo \"\u{263a}\"; else echo \"\u{2639}\"; fi";

const PUBLIC_IP_COMMAND: &str = "curl -s ipv4.icanhazip.com";

/// Sensor whose value comes from an external probe command, cached for a
/// fixed window so short refresh intervals don't hit the network every tick.
pub struct ProbeSensor {
    metadata: SensorMetadata,
    command: String,
    cache: Mutex<FreshValue>,
}

impl ProbeSensor {
    pub fn new(metadata: SensorMetadata, command: impl Into<String>, window: Duration) -> Self {
        Self {
            metadata,
            command: command.into(),
            cache: Mutex::new(FreshValue::new(window)),
        }
    }

    /// Internet reachability indicator, refreshed every 10 seconds
    pub fn upordown() -> Self {
        Self::new(
            SensorMetadata::new("upordown", "Whether the internet connection is up or down"),
            CONNECTIVITY_COMMAND,
            CONNECTIVITY_REFRESH,
        )
    }

    /// Public IPv4 address, refreshed every 10 minutes
    pub fn publicip() -> Self {
        Self::new(
            SensorMetadata::new("publicip", "Public IP address"),
            PUBLIC_IP_COMMAND,
            PUBLIC_IP_REFRESH,
        )
    }

    pub fn window(&self) -> Duration {
        lock_shared(&self.cache, "Probe cache").window()
    }
}

impl Sensor for ProbeSensor {
    fn metadata(&self) -> &SensorMetadata {
        &self.metadata
    }

    fn fetch(&self, _token: &str, _ctx: &FetchContext) -> Result<String> {
        let command = &self.command;
        let mut cache = lock_shared(&self.cache, "Probe cache");
        let value = cache.get_or_refresh(|| run_custom_command_with_timeout(command, PROBE_TIMEOUT));
        Ok(value.to_string())
    }
}
