//! Sensor registry: built-in sensors, custom sensors and the settings they live in

use super::template::{invalid_sensor_label, remove_token, rename_token, Rendered, Template};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Instant;
use sysmon_core::{FetchContext, Sensor, SensorError, NOT_AVAILABLE};
use sysmon_sources::{builtin_sensors, run_custom_command, BuiltinSensor};
use sysmon_types::{is_valid_interval, SavedSettings, SensorDefinition, Settings};

/// Registry handle shared by the scheduler and the settings editor
pub type SharedRegistry = Arc<Mutex<SensorRegistry>>;

/// Lock the shared registry, recovering from a poisoned mutex
pub fn lock_registry(registry: &SharedRegistry) -> MutexGuard<'_, SensorRegistry> {
    registry.lock().unwrap_or_else(|poisoned| {
        log::warn!("Registry mutex was poisoned, recovering");
        poisoned.into_inner()
    })
}

/// What serves a token
pub enum Resolved<'a> {
    BuiltIn(&'a BuiltinSensor),
    Custom(&'a str),
}

impl Resolved<'_> {
    pub fn is_builtin(&self) -> bool {
        matches!(self, Resolved::BuiltIn(_))
    }
}

/// Resolution result that does not borrow the registry
#[derive(Debug, Clone)]
enum Target {
    BuiltIn(usize),
    Custom(String),
}

/// A token that no sensor serves
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedToken(pub String);

/// Values of one fetch cycle, keyed by token
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FetchCycle {
    pub values: HashMap<String, String>,
}

/// One fetch cycle, detached from the registry.
///
/// Built while holding the registry lock, run without it, so slow commands
/// never keep an editor waiting.
pub struct FetchJob {
    template: Template,
    interval: f64,
    builtins: Arc<Vec<BuiltinSensor>>,
    targets: Result<Vec<(String, Target)>, UnresolvedToken>,
}

impl FetchJob {
    /// Fetch a value for every token.
    ///
    /// A sensor that fails while fetching contributes "N/A" instead.
    pub fn fetch_values(&self, cpu_load: Vec<f32>) -> Result<FetchCycle, UnresolvedToken> {
        let targets = self.targets.as_ref().map_err(Clone::clone)?;
        let ctx = FetchContext::new(cpu_load, self.interval);
        let mut cycle = FetchCycle::default();

        for (token, target) in targets {
            let value = match target {
                Target::BuiltIn(index) => match self.builtins[*index].fetch(token, &ctx) {
                    Ok(value) => value,
                    Err(e) => {
                        log::warn!("Sensor '{}' failed: {}", token, e);
                        NOT_AVAILABLE.to_string()
                    }
                },
                Target::Custom(command) => run_custom_command(command),
            };
            cycle.values.insert(token.clone(), value);
        }

        Ok(cycle)
    }

    /// Fetch every token and render the label
    pub fn render(&self, cpu_load: Vec<f32>) -> Rendered {
        let start = Instant::now();

        let rendered = match self.fetch_values(cpu_load) {
            Ok(cycle) => self.template.render(&cycle.values),
            Err(UnresolvedToken(token)) => {
                log::warn!("Invalid sensor in format string: {}", token);
                Rendered::diagnostic(invalid_sensor_label(&token))
            }
        };

        log::trace!("Fetch cycle took {:?}", start.elapsed());
        rendered
    }
}

/// One row of the sensor catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorInfo {
    pub name: String,
    pub description: String,
    pub builtin: bool,
}

/// Owns the built-in sensor instances and the settings (format string,
/// interval and the built-in plus custom sensor table).
///
/// Built-ins are probed in a fixed order and the first one that claims a
/// token serves it. Tokens no built-in claims are looked up among the custom
/// sensors by exact name.
pub struct SensorRegistry {
    builtins: Arc<Vec<BuiltinSensor>>,
    settings: Settings,
    /// `\A(?:name|pattern|...)\z` over every known sensor
    matcher: Option<Regex>,
}

impl SensorRegistry {
    pub fn new() -> Self {
        Self::with_sensors(builtin_sensors())
    }

    /// Registry over a specific set of built-in sensors, with default settings
    pub fn with_sensors(builtins: Vec<BuiltinSensor>) -> Self {
        let mut settings = Settings::default();
        for sensor in &builtins {
            settings
                .sensors
                .insert(sensor.name().to_string(), sensor.definition());
        }

        let mut registry = Self {
            builtins: Arc::new(builtins),
            settings,
            matcher: None,
        };
        registry.rebuild_matcher();
        registry
    }

    /// Shareable handle to this registry
    pub fn into_shared(self) -> SharedRegistry {
        Arc::new(Mutex::new(self))
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Merge saved settings over the current ones.
    ///
    /// Custom entries whose name falls in a built-in sensor's namespace are
    /// dropped, since they could never be resolved. So are entries marked
    /// built-in that no built-in sensor backs.
    pub fn load(&mut self, saved: SavedSettings) {
        self.settings.merge(saved);

        let stale: Vec<String> = self
            .settings
            .sensors
            .iter()
            .filter(|(name, def)| {
                if def.is_builtin() {
                    !self.builtins.iter().any(|sensor| sensor.name() == name.as_str())
                } else {
                    self.claimed_by_builtin(name)
                }
            })
            .map(|(name, _)| name.clone())
            .collect();
        for name in stale {
            log::warn!("Saved sensor '{}' does not match the built-in sensors, dropping", name);
            self.settings.sensors.remove(&name);
        }

        self.rebuild_matcher();
    }

    /// Recompile the sensor-name matcher from the current sensor table
    pub fn rebuild_matcher(&mut self) {
        let alternatives: Vec<String> = self
            .settings
            .sensors
            .iter()
            .map(|(name, def)| {
                if def.is_builtin() {
                    format!("(?:{})", name)
                } else {
                    regex::escape(name)
                }
            })
            .collect();

        let pattern = format!(r"\A(?:{})\z", alternatives.join("|"));
        match Regex::new(&pattern) {
            Ok(matcher) => self.matcher = Some(matcher),
            Err(e) => {
                log::error!("Failed to compile sensor matcher '{}': {}", pattern, e);
                self.matcher = None;
            }
        }
    }

    /// Whether `token` names a known sensor (built-in pattern or custom name)
    pub fn exists(&self, token: &str) -> bool {
        self.matcher.as_ref().is_some_and(|m| m.is_match(token))
    }

    /// Run every built-in's validation over `token`
    pub fn check(&self, token: &str) -> Result<(), SensorError> {
        for sensor in self.builtins.iter() {
            sensor.check(token)?;
        }
        Ok(())
    }

    /// Validate a candidate format string before committing it
    pub fn check_format(&self, format: &str) -> Result<(), SensorError> {
        for token in Template::parse(format).tokens() {
            if !self.exists(token) {
                return Err(SensorError::UnsupportedSensor(token.clone()));
            }
            self.check(token)?;
        }
        Ok(())
    }

    fn claimed_by_builtin(&self, token: &str) -> bool {
        self.builtins
            .iter()
            .any(|sensor| !matches!(sensor.check(token), Ok(false)))
    }

    fn resolve_target(&self, token: &str) -> Result<Option<Target>, SensorError> {
        for (index, sensor) in self.builtins.iter().enumerate() {
            if sensor.check(token)? {
                return Ok(Some(Target::BuiltIn(index)));
            }
        }

        Ok(self.custom_target(token))
    }

    fn custom_target(&self, token: &str) -> Option<Target> {
        self.command(token)
            .map(|command| Target::Custom(command.to_string()))
    }

    /// Like `resolve_target`, but a token a built-in claims and rejects still
    /// goes to that built-in, whose fetch reports it as unavailable
    fn fetch_target(&self, token: &str) -> Option<Target> {
        for (index, sensor) in self.builtins.iter().enumerate() {
            match sensor.check(token) {
                Ok(true) => return Some(Target::BuiltIn(index)),
                Ok(false) => {}
                Err(e) => {
                    log::warn!("Sensor '{}' is unavailable: {}", token, e);
                    return Some(Target::BuiltIn(index));
                }
            }
        }
        self.custom_target(token)
    }

    /// Find what serves `token`: the first built-in that claims it, else a
    /// custom sensor with that exact name
    pub fn resolve(&self, token: &str) -> Result<Option<Resolved<'_>>, SensorError> {
        Ok(self.resolve_target(token)?.map(|target| match target {
            Target::BuiltIn(index) => Resolved::BuiltIn(&self.builtins[index]),
            Target::Custom(_) => Resolved::Custom(self.command(token).unwrap_or_default()),
        }))
    }

    fn validate_name(name: &str) -> Result<(), SensorError> {
        if name.trim().is_empty() || name.contains(['{', '}']) {
            return Err(SensorError::InvalidName(name.to_string()));
        }
        Ok(())
    }

    /// Add a custom sensor
    pub fn add(&mut self, name: &str, description: &str, command: &str) -> Result<(), SensorError> {
        Self::validate_name(name)?;
        if self.exists(name) || self.claimed_by_builtin(name) {
            return Err(SensorError::NameInUse(name.to_string()));
        }

        self.settings
            .sensors
            .insert(name.to_string(), SensorDefinition::custom(description, command));
        self.rebuild_matcher();
        log::info!("Added custom sensor '{}'", name);
        Ok(())
    }

    /// Replace a custom sensor, renaming it if `new_name` differs.
    ///
    /// A rename rewrites every `{name}` in the format string to `{new_name}`.
    pub fn edit(
        &mut self,
        name: &str,
        new_name: &str,
        description: &str,
        command: &str,
    ) -> Result<(), SensorError> {
        match self.settings.sensors.get(name) {
            Some(def) if def.is_builtin() => {
                return Err(SensorError::CannotEditBuiltIn(name.to_string()))
            }
            Some(_) => {}
            None if self.claimed_by_builtin(name) => {
                return Err(SensorError::CannotEditBuiltIn(name.to_string()))
            }
            None => return Err(SensorError::NotDefined(name.to_string())),
        }

        if new_name != name {
            Self::validate_name(new_name)?;
            if self.exists(new_name) || self.claimed_by_builtin(new_name) {
                return Err(SensorError::NameInUse(new_name.to_string()));
            }
        }

        self.settings.sensors.remove(name);
        self.settings
            .sensors
            .insert(new_name.to_string(), SensorDefinition::custom(description, command));

        if new_name != name {
            self.settings.custom_text = rename_token(&self.settings.custom_text, name, new_name);
            log::info!("Renamed custom sensor '{}' to '{}'", name, new_name);
        }

        self.rebuild_matcher();
        Ok(())
    }

    /// Remove a custom sensor.
    ///
    /// The format string is left alone; callers strip `{name}` themselves.
    pub fn delete(&mut self, name: &str) -> Result<(), SensorError> {
        match self.settings.sensors.get(name) {
            Some(def) if def.is_builtin() => {
                return Err(SensorError::CannotDeleteBuiltIn(name.to_string()))
            }
            Some(_) => {}
            None if self.claimed_by_builtin(name) => {
                return Err(SensorError::CannotDeleteBuiltIn(name.to_string()))
            }
            None => return Err(SensorError::NotDefined(name.to_string())),
        }

        self.settings.sensors.remove(name);
        self.rebuild_matcher();
        log::info!("Deleted custom sensor '{}'", name);
        Ok(())
    }

    /// Validate and store a new format string
    pub fn set_custom_text(&mut self, custom_text: &str) -> Result<(), SensorError> {
        self.check_format(custom_text)?;
        self.settings.custom_text = custom_text.to_string();
        Ok(())
    }

    /// Store the format string without validation
    pub(crate) fn replace_custom_text(&mut self, custom_text: String) {
        self.settings.custom_text = custom_text;
    }

    /// Remove `{name}` from the format string, e.g. after deleting that sensor
    pub fn strip_token(&mut self, name: &str) {
        self.settings.custom_text = remove_token(&self.settings.custom_text, name);
    }

    pub fn set_interval(&mut self, interval: f64) -> Result<(), SensorError> {
        if !is_valid_interval(interval) {
            return Err(SensorError::InvalidInterval(interval.to_string()));
        }
        self.settings.interval = interval;
        Ok(())
    }

    pub fn set_on_startup(&mut self, on_startup: bool) {
        self.settings.on_startup = on_startup;
    }

    /// Sensor catalogue in name order
    pub fn definitions(&self) -> Vec<SensorInfo> {
        self.settings
            .sensors
            .iter()
            .map(|(name, def)| SensorInfo {
                name: name.clone(),
                description: def.description.clone(),
                builtin: def.is_builtin(),
            })
            .collect()
    }

    /// Shell command of a custom sensor
    pub fn command(&self, name: &str) -> Option<&str> {
        self.settings
            .sensors
            .get(name)
            .and_then(|def| def.command.shell())
    }

    /// Snapshot the current format string and sensors for one fetch cycle
    pub fn fetch_job(&self) -> FetchJob {
        let template = Template::parse(&self.settings.custom_text);
        let targets: Result<Vec<_>, _> = template
            .tokens()
            .iter()
            .map(|token| {
                self.fetch_target(token)
                    .map(|target| (token.clone(), target))
                    .ok_or_else(|| UnresolvedToken(token.clone()))
            })
            .collect();

        FetchJob {
            template,
            interval: self.settings.interval,
            builtins: self.builtins.clone(),
            targets,
        }
    }

    /// Run one full fetch cycle over the current format string and render it
    pub fn fetch_label(&self, cpu_load: Vec<f32>) -> Rendered {
        self.fetch_job().render(cpu_load)
    }
}

impl Default for SensorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sysmon_sources::{BatterySensor, CpuSensor, FsSensor, MemSensor, NetMode, NetSensor};
    use sysmon_types::SensorSet;

    fn registry() -> SensorRegistry {
        SensorRegistry::with_sensors(vec![
            BuiltinSensor::Cpu(CpuSensor::with_core_count(4)),
            BuiltinSensor::Mem(MemSensor::new()),
            BuiltinSensor::Net(NetSensor::new(NetMode::Split)),
            BuiltinSensor::NetComp(NetSensor::new(NetMode::Compact)),
            BuiltinSensor::Bat(BatterySensor::with_root("/nonexistent/power_supply")),
            BuiltinSensor::Fs(FsSensor::new()),
        ])
    }

    #[test]
    fn test_every_registered_name_exists_and_resolves() {
        let mut reg = registry();
        reg.add("weather", "Weather", "echo sunny").unwrap();

        for token in ["cpu", "cpu3", "mem", "net", "netcomp", "fs///", "weather"] {
            assert!(reg.exists(token), "{} should exist", token);
            assert!(reg.resolve(token).unwrap().is_some(), "{} should resolve", token);
        }
        assert!(!reg.exists("unknownsensor"));
        assert!(reg.resolve("unknownsensor").unwrap().is_none());
    }

    #[test]
    fn test_resolve_prefers_builtins_in_order() {
        let mut reg = registry();
        reg.add("uptime", "Uptime", "uptime -p").unwrap();

        assert!(reg.resolve("netcomp").unwrap().unwrap().is_builtin());
        match reg.resolve("uptime").unwrap() {
            Some(Resolved::Custom(command)) => assert_eq!(command, "uptime -p"),
            _ => panic!("expected custom sensor"),
        }
    }

    #[test]
    fn test_add_rejects_collisions() {
        let mut reg = registry();
        reg.add("weather", "Weather", "echo sunny").unwrap();

        for name in ["cpu", "cpu2", "mem", "fs///tmp", "weather"] {
            assert_eq!(
                reg.add(name, "dup", "true"),
                Err(SensorError::NameInUse(name.to_string())),
                "{} should collide",
                name
            );
        }
    }

    #[test]
    fn test_add_rejects_bad_names() {
        let mut reg = registry();
        assert!(matches!(reg.add("", "d", "true"), Err(SensorError::InvalidName(_))));
        assert!(matches!(reg.add("a{b}", "d", "true"), Err(SensorError::InvalidName(_))));
    }

    #[test]
    fn test_custom_names_are_matched_literally() {
        let mut reg = registry();
        reg.add("a.b", "Dotted", "true").unwrap();
        assert!(reg.exists("a.b"));
        assert!(!reg.exists("axb"));
    }

    #[test]
    fn test_rename_rewrites_format_string() {
        let mut reg = registry();
        reg.add("old", "Old", "echo 1").unwrap();
        reg.replace_custom_text("cpu {old} mem".to_string());

        reg.edit("old", "new", "New", "echo 2").unwrap();

        assert_eq!(reg.settings().custom_text, "cpu {new} mem");
        assert!(reg.exists("new"));
        assert!(!reg.exists("old"));
        assert_eq!(reg.command("new"), Some("echo 2"));
    }

    #[test]
    fn test_edit_rename_onto_existing_name_fails() {
        let mut reg = registry();
        reg.add("one", "One", "echo 1").unwrap();
        reg.add("two", "Two", "echo 2").unwrap();
        assert_eq!(
            reg.edit("one", "two", "One", "echo 1"),
            Err(SensorError::NameInUse("two".to_string()))
        );
        assert_eq!(reg.command("one"), Some("echo 1"));
    }

    #[test]
    fn test_builtins_cannot_be_edited_or_deleted() {
        let mut reg = registry();
        for name in [r"cpu\d*", "cpu", "cpu1", "mem", "net"] {
            assert!(matches!(
                reg.edit(name, "renamed", "d", "true"),
                Err(SensorError::CannotEditBuiltIn(_))
            ));
            assert!(matches!(reg.delete(name), Err(SensorError::CannotDeleteBuiltIn(_))));
        }
        assert!(reg.exists("mem"));
    }

    #[test]
    fn test_unknown_sensor_edit_and_delete() {
        let mut reg = registry();
        assert_eq!(
            reg.edit("ghost", "ghost", "d", "true"),
            Err(SensorError::NotDefined("ghost".to_string()))
        );
        assert_eq!(reg.delete("ghost"), Err(SensorError::NotDefined("ghost".to_string())));
    }

    #[test]
    fn test_delete_custom_sensor() {
        let mut reg = registry();
        reg.add("weather", "Weather", "echo sunny").unwrap();
        reg.set_custom_text("cpu {cpu} {weather}").unwrap();

        reg.delete("weather").unwrap();
        assert!(!reg.exists("weather"));
        assert_eq!(reg.settings().custom_text, "cpu {cpu} {weather}");

        reg.strip_token("weather");
        assert_eq!(reg.settings().custom_text, "cpu {cpu}");
    }

    #[test]
    fn test_check_format() {
        let reg = registry();
        assert_eq!(reg.check_format("cpu: {cpu} mem: {mem}"), Ok(()));
        assert_eq!(
            reg.check_format("{bogus}"),
            Err(SensorError::UnsupportedSensor("bogus".to_string()))
        );
        assert!(matches!(
            reg.check_format("{cpu99}"),
            Err(SensorError::InvalidCpuIndex { cores: 4, .. })
        ));
        assert!(matches!(
            reg.check_format("{fs///no/such/dir}"),
            Err(SensorError::PathNotFound(_))
        ));
    }

    #[test]
    fn test_set_custom_text_validates() {
        let mut reg = registry();
        assert!(reg.set_custom_text("{nope}").is_err());
        assert_eq!(reg.settings().custom_text, "cpu: {cpu} mem: {mem}");

        reg.set_custom_text("load {cpu}").unwrap();
        assert_eq!(reg.settings().custom_text, "load {cpu}");
    }

    #[test]
    fn test_set_interval() {
        let mut reg = registry();
        assert!(matches!(reg.set_interval(0.5), Err(SensorError::InvalidInterval(_))));
        assert!(matches!(reg.set_interval(f64::NAN), Err(SensorError::InvalidInterval(_))));
        reg.set_interval(1.5).unwrap();
        assert_eq!(reg.settings().interval, 1.5);
    }

    #[test]
    fn test_load_merges_and_drops_shadowing_customs() {
        let mut reg = registry();
        let mut sensors = SensorSet::new();
        sensors.insert("weather".to_string(), SensorDefinition::custom("Weather", "echo sunny"));
        sensors.insert("cpu2".to_string(), SensorDefinition::custom("Bad", "echo 1"));
        sensors.insert("mem".to_string(), SensorDefinition::custom("Bad", "echo 1"));

        reg.load(SavedSettings {
            custom_text: Some("{weather}".to_string()),
            interval: None,
            on_startup: Some(true),
            sensors: Some(sensors),
        });

        assert_eq!(reg.settings().custom_text, "{weather}");
        assert_eq!(reg.settings().interval, 2.0);
        assert!(reg.settings().on_startup);
        assert_eq!(reg.command("weather"), Some("echo sunny"));
        assert_eq!(reg.command("cpu2"), None);
        assert!(reg.settings().sensors["mem"].is_builtin());
        assert!(reg.exists("weather"));
    }

    #[test]
    fn test_load_drops_unbacked_builtin_entries() {
        let mut reg = registry();
        let saved: SavedSettings =
            serde_json::from_str(r#"{"sensors": {"a(": ["x", true], "weather": ["W", "echo sun"]}}"#)
                .unwrap();
        reg.load(saved);

        assert!(!reg.exists("a("));
        assert!(reg.definitions().iter().all(|d| d.name != "a("));
        assert!(reg.exists("mem"));
        assert!(reg.exists("cpu"));
        assert!(reg.exists("weather"));
        assert_eq!(reg.check_format("{mem} {weather}"), Ok(()));
        assert_eq!(reg.delete("a("), Err(SensorError::NotDefined("a(".to_string())));
    }

    #[test]
    fn test_definitions_in_name_order() {
        let mut reg = registry();
        reg.add("aaa", "First", "true").unwrap();
        let defs = reg.definitions();
        let names: Vec<&str> = defs.iter().map(|d| d.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        assert_eq!(names, sorted);
        assert!(defs.iter().any(|d| d.name == "aaa" && !d.builtin));
        assert!(defs.iter().any(|d| d.name == "mem" && d.builtin));
    }

    #[test]
    fn test_fetch_label_with_custom_and_cpu() {
        let mut reg = registry();
        reg.add("greeting", "Greeting", "echo hi").unwrap();
        reg.set_custom_text("{greeting} {cpu} {cpu1}").unwrap();

        let rendered = reg.fetch_label(vec![10.0, 20.0, 30.0, 40.0]);
        assert_eq!(rendered.label, "hi 25% 20%");
    }

    #[test]
    fn test_cpu_without_sample_is_zero_padded() {
        let mut reg = registry();
        reg.set_custom_text("{cpu}").unwrap();
        assert_eq!(reg.fetch_label(Vec::new()).label, "00%");
    }

    #[test]
    fn test_unknown_token_renders_diagnostic() {
        let mut reg = registry();
        reg.replace_custom_text("cpu {unknownsensor}".to_string());
        assert_eq!(reg.fetch_label(Vec::new()).label, "Invalid Sensor: unknownsensor");
    }

    #[test]
    fn test_rejected_token_is_not_available() {
        let mut reg = registry();
        reg.replace_custom_text("cpu {cpu99}".to_string());
        assert_eq!(reg.fetch_label(Vec::new()).label, "cpu N/A");
    }

    #[test]
    fn test_vanished_path_only_blanks_its_own_value() {
        let dir = tempfile::tempdir().unwrap();
        let mount = dir.path().join("mnt");
        std::fs::create_dir(&mount).unwrap();

        let mut reg = registry();
        reg.add("greeting", "Greeting", "echo hi").unwrap();
        reg.set_custom_text(&format!("{{greeting}} {{fs//{}}}", mount.display()))
            .unwrap();

        let before = reg.fetch_label(Vec::new()).label;
        assert!(before.starts_with("hi "), "got {}", before);
        assert!(!before.contains("N/A"), "got {}", before);

        std::fs::remove_dir(&mount).unwrap();
        assert_eq!(reg.fetch_label(Vec::new()).label, "hi N/A");
    }

    #[test]
    fn test_missing_battery_only_blanks_its_own_value() {
        let mut reg = registry();
        reg.replace_custom_text("{cpu} {bat0}".to_string());
        assert_eq!(reg.fetch_label(vec![10.0; 4]).label, "10% N/A");
    }

    #[test]
    fn test_fetch_job_runs_without_registry() {
        let mut reg = registry();
        reg.add("greeting", "Greeting", "echo hi").unwrap();
        reg.set_custom_text("{greeting}").unwrap();

        let job = reg.fetch_job();
        reg.delete("greeting").unwrap();
        drop(reg);

        assert_eq!(job.render(Vec::new()).label, "hi");
    }

    #[test]
    fn test_failing_custom_command_is_error_sentinel() {
        let mut reg = registry();
        reg.add("broken", "Broken", "exit 3").unwrap();
        reg.replace_custom_text("x {broken} y".to_string());
        assert_eq!(reg.fetch_label(Vec::new()).label, "x Error y");
    }

    #[test]
    fn test_custom_icon_directive() {
        let mut reg = registry();
        reg.add("status", "Status", "echo 'ok clear_icon'").unwrap();
        reg.replace_custom_text("{status}".to_string());
        let rendered = reg.fetch_label(Vec::new());
        assert_eq!(rendered.label, "ok");
        assert_eq!(rendered.icon, Some(sysmon_types::IconDirective::Clear));
    }
}
