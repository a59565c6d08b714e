//! Shared constants for sensors and rendering

use std::time::Duration;

/// Value shown when a reading is not available on this machine
pub const NOT_AVAILABLE: &str = "N/A";

/// Value shown when a command produced no output
pub const NO_OUTPUT: &str = "(no output)";

/// Value shown when a command could not be run or failed
pub const EXEC_ERROR: &str = "Error";

/// Unit suffixes for human readable byte counts
pub const BYTE_UNITS: [&str; 8] = ["B", "KB", "MB", "GB", "TB", "PB", "EB", "ZB"];

/// Step between byte units for network traffic (SI)
pub const DECIMAL_STEP: f64 = 1000.0;

/// Step between byte units for filesystem sizes (binary)
pub const BINARY_STEP: f64 = 1024.0;

/// Freshness window for the connectivity probe
pub const CONNECTIVITY_REFRESH: Duration = Duration::from_secs(10);

/// Freshness window for the public IP lookup
pub const PUBLIC_IP_REFRESH: Duration = Duration::from_secs(600);

/// Hard limit for user-defined sensor commands
pub const CUSTOM_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Hard limit for network probes and vendor query tools
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(15);
