//! XDG autostart entry for starting with the desktop session

use anyhow::{anyhow, Context, Result};
use log::{debug, info};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const DESKTOP_FILE: &str = "sysmon-indicator.desktop";

/// Manages `<autostart dir>/sysmon-indicator.desktop`
#[derive(Debug, Clone)]
pub struct Autostart {
    dir: PathBuf,
}

impl Autostart {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The per-user XDG autostart directory (`~/.config/autostart`)
    pub fn user() -> Result<Self> {
        let base = directories::BaseDirs::new()
            .ok_or_else(|| anyhow!("Could not determine home directory"))?;
        Ok(Self::new(base.config_dir().join("autostart")))
    }

    pub fn entry_path(&self) -> PathBuf {
        self.dir.join(DESKTOP_FILE)
    }

    pub fn is_enabled(&self) -> bool {
        self.entry_path().exists()
    }

    /// Write or remove the entry so it matches `enabled`
    pub fn sync(&self, enabled: bool, exec: &Path) -> Result<()> {
        if enabled {
            self.enable(exec)
        } else {
            self.disable()
        }
    }

    pub fn enable(&self, exec: &Path) -> Result<()> {
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;
        let path = self.entry_path();
        std::fs::write(&path, desktop_entry(exec))
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Autostart enabled ({:?})", path);
        Ok(())
    }

    /// Remove the entry. A missing entry is not an error.
    pub fn disable(&self) -> Result<()> {
        let path = self.entry_path();
        match std::fs::remove_file(&path) {
            Ok(()) => {
                info!("Autostart disabled");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No autostart entry at {:?}", path);
                Ok(())
            }
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }
}

fn desktop_entry(exec: &Path) -> String {
    format!(
        "[Desktop Entry]\n\
         Type=Application\n\
         Name=System Monitor Indicator\n\
         Comment=Show system information in the panel\n\
         Exec=\"{}\" run\n\
         Terminal=false\n\
         X-GNOME-Autostart-enabled=true\n",
        exec.display()
    )
}
