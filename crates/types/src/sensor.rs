//! Sensor definition types.
//!
//! A sensor is stored as `name -> [description, command]` where the command is
//! either the literal `true` (built-in sensor) or a shell command string
//! (user-defined sensor).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// How a sensor produces its value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SensorCommand {
    /// Served by a built-in sensor; cannot be edited or deleted
    BuiltIn,
    /// Executed through the host shell; stdout is the value
    Shell(String),
}

impl SensorCommand {
    pub fn is_builtin(&self) -> bool {
        matches!(self, SensorCommand::BuiltIn)
    }

    /// The shell command, if this is a user-defined sensor
    pub fn shell(&self) -> Option<&str> {
        match self {
            SensorCommand::BuiltIn => None,
            SensorCommand::Shell(cmd) => Some(cmd),
        }
    }
}

impl Serialize for SensorCommand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SensorCommand::BuiltIn => serializer.serialize_bool(true),
            SensorCommand::Shell(cmd) => serializer.serialize_str(cmd),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCommand {
    Flag(bool),
    Command(String),
}

impl<'de> Deserialize<'de> for SensorCommand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match RawCommand::deserialize(deserializer)? {
            RawCommand::Flag(true) => Ok(SensorCommand::BuiltIn),
            RawCommand::Flag(false) => Err(serde::de::Error::custom(
                "sensor command must be `true` or a shell command string",
            )),
            RawCommand::Command(cmd) => Ok(SensorCommand::Shell(cmd)),
        }
    }
}

/// Description and command of a single sensor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SensorDefinition {
    pub description: String,
    pub command: SensorCommand,
}

impl SensorDefinition {
    pub fn builtin(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: SensorCommand::BuiltIn,
        }
    }

    pub fn custom(description: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            command: SensorCommand::Shell(command.into()),
        }
    }

    pub fn is_builtin(&self) -> bool {
        self.command.is_builtin()
    }
}

// Stored on disk as a two element array: [description, command]
impl Serialize for SensorDefinition {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        (&self.description, &self.command).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SensorDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let (description, command) = <(String, SensorCommand)>::deserialize(deserializer)?;
        Ok(Self {
            description,
            command,
        })
    }
}

/// Mapping from sensor name (or name pattern for built-ins) to its definition
pub type SensorSet = BTreeMap<String, SensorDefinition>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_serializes_as_true() {
        let def = SensorDefinition::builtin("Average CPU usage");
        let json = serde_json::to_string(&def).unwrap();
        assert_eq!(json, r#"["Average CPU usage",true]"#);
    }

    #[test]
    fn test_custom_serializes_as_command() {
        let def = SensorDefinition::custom("Uptime", "uptime -p");
        let json = serde_json::to_string(&def).unwrap();
        assert_eq!(json, r#"["Uptime","uptime -p"]"#);

        let back: SensorDefinition = serde_json::from_str(&json).unwrap();
        assert_eq!(back.command.shell(), Some("uptime -p"));
        assert!(!back.is_builtin());
    }

    #[test]
    fn test_false_command_is_rejected() {
        let result: Result<SensorDefinition, _> = serde_json::from_str(r#"["x", false]"#);
        assert!(result.is_err());
    }
}
