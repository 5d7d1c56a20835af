// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Configuration system for ENSEMBLE.
//!
//! Describes the players, not the music: tempo, velocity, log level, where
//! output goes, and which parts exist with what home key. Files may be TOML
//! or YAML; the format is picked from the file extension.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::midi::DEFAULT_VELOCITY;
use crate::music::{pitch_with_octave, Octave, Pitch, PitchClass};
use crate::timing::{Meter, DEFAULT_BPM};

/// Root configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnsembleConfig {
    /// Tempo in BPM, fixed for the whole piece
    #[serde(default = "default_tempo")]
    pub tempo: f64,
    /// Velocity for every note (0-100)
    #[serde(default = "default_velocity")]
    pub velocity: u8,
    /// Log level ("error", "warn", "info", "debug", "trace")
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Where notes are sent
    #[serde(default)]
    pub output: OutputConfig,
    /// Part definitions
    #[serde(default)]
    pub parts: Vec<PartConfig>,
}

fn default_tempo() -> f64 {
    DEFAULT_BPM
}
fn default_velocity() -> u8 {
    DEFAULT_VELOCITY
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for EnsembleConfig {
    /// Four voices: soprano C6, alto C5, tenor middle C, bass C3
    fn default() -> Self {
        Self {
            tempo: default_tempo(),
            velocity: default_velocity(),
            log_level: default_log_level(),
            output: OutputConfig::default(),
            parts: vec![
                PartConfig::new("soprano", "C", OctaveSetting::Index(6)),
                PartConfig::new("alto", "C", OctaveSetting::Index(5)),
                PartConfig::new("tenor", "C", OctaveSetting::Named("middle".to_string())),
                PartConfig::new("bass", "C", OctaveSetting::Index(3)),
            ],
        }
    }
}

impl EnsembleConfig {
    /// Load a configuration file (`.toml`, `.yaml` or `.yml`)
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        match extension(path)?.as_str() {
            "toml" => Self::from_toml(&contents),
            _ => Self::from_yaml(&contents),
        }
    }

    /// Save configuration, format chosen by extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let contents = match extension(path)?.as_str() {
            "toml" => self.to_toml()?,
            _ => self.to_yaml()?,
        };
        fs::write(path, contents)
            .with_context(|| format!("Failed to write config file: {:?}", path))
    }

    /// Parse a configuration from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML configuration")
    }

    /// Serialize to a TOML string
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Parse a configuration from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML configuration")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize configuration to YAML")
    }

    /// Find a part by name
    pub fn part(&self, name: &str) -> Option<&PartConfig> {
        self.parts.iter().find(|p| p.name == name)
    }

    /// Log level as a tracing level
    pub fn level(&self) -> Result<tracing::Level> {
        self.log_level
            .parse()
            .map_err(|_| anyhow!("Invalid log level: '{}'", self.log_level))
    }
}

fn extension(path: &Path) -> Result<String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "toml" | "yaml" | "yml" => Ok(ext),
        _ => bail!(
            "Unsupported config format {:?} (expected .toml, .yaml or .yml)",
            path
        ),
    }
}

/// Output destination settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    /// Destination index in the system's MIDI device list
    #[serde(default)]
    pub destination: usize,
    /// Partial destination name; takes priority over the index
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Default MIDI channel (1-16)
    #[serde(default = "default_channel")]
    pub channel: u8,
    /// Log events instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

fn default_channel() -> u8 {
    1
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            destination: 0,
            name: None,
            channel: default_channel(),
            dry_run: false,
        }
    }
}

/// Octave as written in a config file: a number or "middle"
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum OctaveSetting {
    Index(i32),
    Named(String),
}

impl Default for OctaveSetting {
    fn default() -> Self {
        OctaveSetting::Named("middle".to_string())
    }
}

impl OctaveSetting {
    pub fn octave(&self) -> Result<Octave> {
        match self {
            OctaveSetting::Index(i) => Ok(Octave::Index(*i)),
            OctaveSetting::Named(name) if name.trim().eq_ignore_ascii_case("middle") => {
                Ok(Octave::Middle)
            }
            OctaveSetting::Named(name) => Err(anyhow!("Invalid octave: '{}'", name)),
        }
    }
}

/// One part (instrument)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PartConfig {
    /// Part name, used by scores to find the part
    pub name: String,
    /// Home key note name (e.g., "C", "F#", "Bb")
    #[serde(default = "default_key")]
    pub key: String,
    /// Octave of the home key
    #[serde(default)]
    pub octave: OctaveSetting,
    /// MIDI channel override (1-16)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<u8>,
}

fn default_key() -> String {
    "C".to_string()
}

impl PartConfig {
    pub fn new(name: impl Into<String>, key: impl Into<String>, octave: OctaveSetting) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            octave,
            channel: None,
        }
    }

    /// Absolute home transposition: key pitch class placed in its octave
    pub fn home_key(&self) -> Result<Pitch> {
        let class = PitchClass::parse(&self.key)
            .ok_or_else(|| anyhow!("Invalid key '{}' for part '{}'", self.key, self.name))?;
        Ok(pitch_with_octave(class.value(), self.octave.octave()?))
    }

    /// Channel for this part (1-16), falling back to the output default
    pub fn channel_or(&self, output: &OutputConfig) -> u8 {
        self.channel.unwrap_or(output.channel)
    }
}

/// Check a configuration for problems serde cannot catch.
///
/// Returns one message per problem; an empty list means the configuration
/// is usable.
pub fn validate_config(config: &EnsembleConfig) -> Vec<String> {
    let mut errors = Vec::new();

    if Meter::new(config.tempo).is_err() {
        errors.push(format!(
            "Tempo must be a positive, playable BPM (got {})",
            config.tempo
        ));
    }

    if config.velocity > DEFAULT_VELOCITY {
        errors.push(format!(
            "Velocity must be between 0 and {} (got {})",
            DEFAULT_VELOCITY, config.velocity
        ));
    }

    if config.level().is_err() {
        errors.push(format!("Invalid log level: '{}'", config.log_level));
    }

    if !(1..=16).contains(&config.output.channel) {
        errors.push(format!(
            "Output channel must be between 1 and 16 (got {})",
            config.output.channel
        ));
    }

    let mut seen = HashSet::new();
    for part in &config.parts {
        if part.name.trim().is_empty() {
            errors.push("Part name cannot be empty".to_string());
        } else if !seen.insert(part.name.as_str()) {
            errors.push(format!("Duplicate part name: '{}'", part.name));
        }

        if let Err(e) = part.home_key() {
            errors.push(e.to_string());
        }

        if let Some(channel) = part.channel {
            if !(1..=16).contains(&channel) {
                errors.push(format!(
                    "Part '{}' channel must be between 1 and 16 (got {})",
                    part.name, channel
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = EnsembleConfig::default();
        assert_eq!(config.tempo, 140.0);
        assert_eq!(config.velocity, 100);
        assert_eq!(config.parts.len(), 4);
        assert!(validate_config(&config).is_empty());

        let keys: Vec<Pitch> = config.parts.iter().map(|p| p.home_key().unwrap()).collect();
        assert_eq!(keys, vec![72, 60, 48, 36]);
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
tempo = 96.0
log_level = "debug"

[output]
name = "IAC"
channel = 2

[[parts]]
name = "lead"
key = "F#"
octave = 5

[[parts]]
name = "pad"
key = "Bb"
octave = "middle"
channel = 3
"#;

        let config = EnsembleConfig::from_toml(toml).unwrap();
        assert_eq!(config.tempo, 96.0);
        assert_eq!(config.velocity, 100);
        assert_eq!(config.output.name.as_deref(), Some("IAC"));
        assert_eq!(config.parts[0].home_key().unwrap(), 66);
        assert_eq!(config.parts[1].home_key().unwrap(), 58);
        assert_eq!(config.parts[0].channel_or(&config.output), 2);
        assert_eq!(config.parts[1].channel_or(&config.output), 3);
        assert_eq!(config.level().unwrap(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
tempo: 120
output:
  dry_run: true
parts:
  - name: bass
    key: E
    octave: 2
"#;

        let config = EnsembleConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.tempo, 120.0);
        assert!(config.output.dry_run);
        assert_eq!(config.part("bass").unwrap().home_key().unwrap(), 28);
        assert!(config.part("lead").is_none());
    }

    #[test]
    fn test_validate_config() {
        let mut config = EnsembleConfig::default();
        config.tempo = 0.0;
        config.velocity = 127;
        config.log_level = "loud".to_string();
        config.output.channel = 0;
        config.parts.push(PartConfig::new("alto", "H", OctaveSetting::Index(4)));
        config.parts.push(PartConfig::new(
            "",
            "C",
            OctaveSetting::Named("high".to_string()),
        ));

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 8, "{:?}", errors);
        assert!(errors.iter().any(|e| e.contains("Tempo")));
        assert!(errors.iter().any(|e| e.contains("Velocity")));
        assert!(errors.iter().any(|e| e.contains("log level")));
        assert!(errors.iter().any(|e| e.contains("Output channel")));
        assert!(errors.iter().any(|e| e.contains("Duplicate part name: 'alto'")));
        assert!(errors.iter().any(|e| e.contains("Invalid key 'H'")));
        assert!(errors.iter().any(|e| e.contains("Invalid octave: 'high'")));
        assert!(errors.iter().any(|e| e.contains("Part name cannot be empty")));
    }

    #[test]
    fn test_validate_unplayable_tempo() {
        let mut config = EnsembleConfig::default();
        config.tempo = 1e-300;

        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1, "{:?}", errors);
        assert!(errors[0].contains("Tempo"));
    }

    #[test]
    fn test_load_and_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let config = EnsembleConfig::default();

        for file in ["ensemble.toml", "ensemble.yaml"] {
            let path = dir.path().join(file);
            config.save(&path).unwrap();
            assert_eq!(EnsembleConfig::load(&path).unwrap(), config);
        }
    }

    #[test]
    fn test_load_errors() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "tempo = \"fast\"").unwrap();
        assert!(EnsembleConfig::load(file.path()).is_err());

        assert!(EnsembleConfig::load("/nonexistent/ensemble.toml").is_err());
        assert!(EnsembleConfig::default().save("ensemble.json").is_err());
    }
}
