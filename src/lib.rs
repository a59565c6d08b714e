//! sysmon-indicator: a templated system status line for desktop panels
//!
//! This library provides:
//! - The sensor registry (built-in and custom shell-command sensors)
//! - The template engine that renders `{sensor}` placeholders
//! - The fetch scheduler that refreshes the label off the UI thread
//! - Settings persistence and the autostart entry

pub mod config;
pub mod core;

// Re-export commonly used types
pub use config::{Autostart, SettingsStore};
pub use core::{ChannelSink, DisplaySink, DisplayUpdate, FetchScheduler, Monitor, SensorRegistry};
