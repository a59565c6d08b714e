//! sysmon-types: Shared data types for the sysmon-indicator status line.
//!
//! This crate contains pure data types (sensor definitions, settings, icon
//! directives) shared by every other crate. It has no system dependencies.

pub mod icon;
pub mod sensor;
pub mod settings;

pub use icon::{IconDirective, CLEAR_ICON_MARKER, USE_ICON_MARKER};
pub use sensor::{SensorCommand, SensorDefinition, SensorSet};
pub use settings::{
    is_valid_interval, SavedSettings, Settings, DEFAULT_CUSTOM_TEXT, DEFAULT_INTERVAL,
    MIN_INTERVAL,
};
