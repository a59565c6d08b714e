//! Configuration management

mod autostart;
mod store;

pub use autostart::Autostart;
pub use store::{config_dir, SettingsStore};
