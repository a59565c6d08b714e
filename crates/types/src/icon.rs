//! Icon control directives carried inside sensor output.

use std::path::PathBuf;

/// Marker requesting the display to show an icon: `use_icon:<path>`
pub const USE_ICON_MARKER: &str = "use_icon";

/// Marker requesting the display to drop its icon
pub const CLEAR_ICON_MARKER: &str = "clear_icon";

/// Icon change requested by a sensor value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconDirective {
    /// Show the icon at this path
    Use(PathBuf),
    /// Restore the default (no) icon
    Clear,
}
