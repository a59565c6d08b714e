use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::{debug, error, info, warn};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use sysmon_indicator::config::{Autostart, SettingsStore};
use sysmon_indicator::core::{ChannelSink, DisplayUpdate, IconUpdate, Monitor, SensorRegistry};
use sysmon_sources::{initialize_sensors, sample_cpu_load};

/// Time between the baseline CPU sample and the one used by `once`
const ONE_SHOT_SAMPLE_DELAY: Duration = Duration::from_millis(250);

/// sysmon-indicator - system information in a single templated status line
#[derive(Parser, Debug)]
#[command(name = "sysmon-indicator")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Debug verbosity level (0=quiet, 1=info, 2=debug, 3=trace)
    #[arg(short = 'd', long = "debug", value_name = "LEVEL", default_value = "0")]
    debug: u8,

    /// Settings file to use instead of the per-user default
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Refresh the label periodically, printing each one to stdout (default)
    Run,
    /// Print the label once and exit
    Once,
    /// List available sensors
    Sensors,
    /// Add a custom sensor backed by a shell command
    Add {
        name: String,
        description: String,
        command: String,
    },
    /// Change a custom sensor
    Edit {
        name: String,
        /// New name; `{NAME}` in the format string is rewritten
        #[arg(long = "name", value_name = "NEW_NAME")]
        rename: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        command: Option<String>,
    },
    /// Delete a custom sensor and drop it from the format string
    Delete { name: String },
    /// Change settings
    Set {
        /// Format string, e.g. "cpu: {cpu} mem: {mem}"
        #[arg(long)]
        text: Option<String>,
        /// Refresh interval in seconds (>= 1)
        #[arg(long)]
        interval: Option<f64>,
        /// Start with the desktop session
        #[arg(long, value_name = "BOOL")]
        on_startup: Option<bool>,
    },
    /// Validate a format string
    Check { format: String },
}

fn main() {
    let cli = Cli::parse();

    let log_level = match cli.debug {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // Allow RUST_LOG to override CLI setting
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    info!("Starting sysmon-indicator v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let store = match cli.config {
        Some(path) => SettingsStore::new(path),
        None => SettingsStore::default_location()?,
    };
    debug!("Settings file: {}", store.path().display());

    let mut registry = SensorRegistry::new();
    if let Some(saved) = store.load() {
        registry.load(saved);
    }

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => run_indicator(registry),
        Command::Once => print_once(registry),
        Command::Sensors => {
            list_sensors(&registry);
            Ok(())
        }
        Command::Add {
            name,
            description,
            command,
        } => {
            registry.add(&name, &description, &command)?;
            store.save(registry.settings())
        }
        Command::Edit {
            name,
            rename,
            description,
            command,
        } => {
            let current = registry
                .definitions()
                .into_iter()
                .find(|info| info.name == name)
                .map(|info| info.description)
                .unwrap_or_default();
            let description = description.unwrap_or(current);
            let command = command
                .or_else(|| registry.command(&name).map(str::to_string))
                .unwrap_or_default();
            let new_name = rename.unwrap_or_else(|| name.clone());

            registry.edit(&name, &new_name, &description, &command)?;
            store.save(registry.settings())
        }
        Command::Delete { name } => {
            registry.delete(&name)?;
            registry.strip_token(&name);
            store.save(registry.settings())
        }
        Command::Set {
            text,
            interval,
            on_startup,
        } => {
            if let Some(text) = text {
                registry.set_custom_text(&text)?;
            }
            if let Some(interval) = interval {
                registry.set_interval(interval)?;
            }
            if let Some(on_startup) = on_startup {
                registry.set_on_startup(on_startup);
                let exe = std::env::current_exe().context("Could not locate executable")?;
                Autostart::user()?.sync(on_startup, &exe)?;
            }
            store.save(registry.settings())
        }
        Command::Check { format } => {
            registry.check_format(&format)?;
            println!("OK");
            Ok(())
        }
    }
}

/// Act as the panel: apply display updates in order on this thread
fn run_indicator(registry: SensorRegistry) -> Result<()> {
    initialize_sensors();

    let (sink, updates) = ChannelSink::new();
    let mut monitor = Monitor::new(registry, Arc::new(sink));
    monitor.restart()?;

    let stdout = std::io::stdout();
    for update in updates.iter() {
        match update {
            DisplayUpdate::Label(label) => {
                let mut out = stdout.lock();
                if let Err(e) = writeln!(out, "{}", label).and_then(|_| out.flush()) {
                    warn!("stdout closed ({}), stopping", e);
                    break;
                }
            }
            DisplayUpdate::Icon(IconUpdate::Use(path)) => info!("Icon set to {:?}", path),
            DisplayUpdate::Icon(IconUpdate::Clear) => info!("Icon cleared"),
        }
    }

    monitor.shutdown();
    Ok(())
}

fn print_once(registry: SensorRegistry) -> Result<()> {
    initialize_sensors();
    std::thread::sleep(ONE_SHOT_SAMPLE_DELAY);

    let rendered = registry.fetch_label(sample_cpu_load());
    if let Some(icon) = rendered.icon {
        info!("Icon directive: {:?}", icon);
    }
    println!("{}", rendered.label);
    Ok(())
}

fn list_sensors(registry: &SensorRegistry) {
    for info in registry.definitions() {
        if info.builtin {
            println!("{:<14} {:<8} {}", info.name, "builtin", info.description);
        } else {
            println!("{:<14} {:<8} {}", info.name, "custom", info.description);
            if let Some(command) = registry.command(&info.name) {
                println!("{:<14} {:<8} $ {}", "", "", command);
            }
        }
    }
}
