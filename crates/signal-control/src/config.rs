//! Configuration loading and typed config structures.
//!
//! The canonical configuration lives in `signal-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure and a loader that reads it. Every field has a default, so an
//! empty file is a valid configuration.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use signal_queue::QueueConfig;

use crate::phase::CycleTiming;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `signal-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SimulationConfig {
    /// Run settings (seed, tick, duration cap, scenario selection).
    #[serde(default)]
    pub simulation: RunConfig,

    /// Fixed-time controller timing.
    #[serde(default)]
    pub fixed: FixedTimingConfig,

    /// Fuzzy controller timing.
    #[serde(default)]
    pub fuzzy: FuzzyTimingConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Extra scenarios on top of the built-in catalog.
    #[serde(default)]
    pub custom_scenarios: Vec<CustomScenarioConfig>,
}

impl SimulationConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, or
    /// [`ConfigError::Yaml`] if the content is not valid YAML.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Yaml`] if the string is not valid YAML.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Simulator settings derived from the run section.
    pub const fn queue_config(&self) -> QueueConfig {
        QueueConfig {
            seed: self.simulation.seed,
            time_step: self.simulation.time_step,
            departure_interval: self.simulation.departure_interval,
        }
    }
}

/// Run settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunConfig {
    /// RNG seed shared by both controllers' runs.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Tick length in seconds.
    #[serde(default = "default_time_step")]
    pub time_step: f64,

    /// Seconds between departures from one green approach.
    #[serde(default = "default_departure_interval")]
    pub departure_interval: f64,

    /// Upper bound on any scenario's simulated duration, in seconds.
    #[serde(default = "default_max_duration")]
    pub max_duration: f64,

    /// Scenario keys to run, in order. Empty runs every scenario.
    #[serde(default)]
    pub scenarios: Vec<String>,

    /// Where to write the JSON comparison report. Nothing is written when
    /// unset.
    #[serde(default)]
    pub report_path: Option<PathBuf>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            time_step: default_time_step(),
            departure_interval: default_departure_interval(),
            max_duration: default_max_duration(),
            scenarios: Vec::new(),
            report_path: None,
        }
    }
}

/// Fixed-time controller timing, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FixedTimingConfig {
    /// North-south green.
    #[serde(default = "default_green")]
    pub ns_green: f64,

    /// East-west green.
    #[serde(default = "default_green")]
    pub ew_green: f64,

    /// Yellow after each green.
    #[serde(default = "default_yellow")]
    pub yellow: f64,

    /// All-red clearance after each yellow.
    #[serde(default = "default_all_red")]
    pub all_red: f64,
}

impl FixedTimingConfig {
    /// The six-phase timing these values describe.
    pub const fn cycle(&self) -> CycleTiming {
        CycleTiming {
            ns_green: self.ns_green,
            ew_green: self.ew_green,
            yellow: self.yellow,
            all_red: self.all_red,
        }
    }
}

impl Default for FixedTimingConfig {
    fn default() -> Self {
        Self {
            ns_green: default_green(),
            ew_green: default_green(),
            yellow: default_yellow(),
            all_red: default_all_red(),
        }
    }
}

/// Fuzzy controller timing, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct FuzzyTimingConfig {
    /// Yellow after each green.
    #[serde(default = "default_yellow")]
    pub yellow: f64,

    /// All-red clearance after each yellow.
    #[serde(default = "default_all_red")]
    pub all_red: f64,

    /// Green time used for a direction whose inference produced no output.
    #[serde(default = "default_green")]
    pub fallback_green_time: f64,
}

impl Default for FuzzyTimingConfig {
    fn default() -> Self {
        Self {
            yellow: default_yellow(),
            all_red: default_all_red(),
            fallback_green_time: default_green(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// A user-defined scenario as written in YAML.
///
/// Arrival-rate keys are direction names and are validated when the
/// scenario is added to a catalog.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CustomScenarioConfig {
    /// Lookup key.
    pub key: String,

    /// Display name. Defaults to the key.
    #[serde(default)]
    pub name: Option<String>,

    /// Free-text description.
    #[serde(default)]
    pub description: String,

    /// Vehicles per minute by direction name.
    pub arrival_rates: BTreeMap<String, f64>,

    /// Nominal duration in seconds.
    #[serde(default = "default_scenario_duration")]
    pub duration: f64,
}

const fn default_seed() -> u64 {
    42
}

const fn default_time_step() -> f64 {
    1.0
}

const fn default_departure_interval() -> f64 {
    0.5
}

const fn default_max_duration() -> f64 {
    1800.0
}

const fn default_green() -> f64 {
    40.0
}

const fn default_yellow() -> f64 {
    3.0
}

const fn default_all_red() -> f64 {
    2.0
}

const fn default_scenario_duration() -> f64 {
    3600.0
}

fn default_log_level() -> String {
    String::from("info")
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = SimulationConfig::default();
        assert_eq!(config.simulation.seed, 42);
        assert!((config.simulation.max_duration - 1800.0).abs() < 1e-12);
        assert!((config.fixed.cycle().total() - 90.0).abs() < 1e-12);
        assert!((config.fuzzy.fallback_green_time - 40.0).abs() < 1e-12);
        assert_eq!(config.logging.level, "info");
        assert!(config.custom_scenarios.is_empty());
        assert!(config.simulation.report_path.is_none());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
simulation:
  seed: 7
  time_step: 0.5
  departure_interval: 0.25
  max_duration: 600
  scenarios:
    - normal
    - rush_ns
  report_path: "target/signal-report.json"

fixed:
  ns_green: 50
  ew_green: 30
  yellow: 4
  all_red: 1

fuzzy:
  yellow: 4
  all_red: 1
  fallback_green_time: 35

logging:
  level: "debug"

custom_scenarios:
  - key: school_run
    name: "School Run"
    description: "Short burst from the south"
    arrival_rates:
      north: 6
      south: 28
      east: 6
      west: 6
    duration: 1200
"#;

        let config = SimulationConfig::parse(yaml).unwrap();
        assert_eq!(config.simulation.seed, 7);
        assert_eq!(config.simulation.scenarios, vec!["normal", "rush_ns"]);
        assert_eq!(
            config.simulation.report_path.as_deref(),
            Some(Path::new("target/signal-report.json"))
        );
        assert!((config.fixed.ns_green - 50.0).abs() < 1e-12);
        assert!((config.fixed.cycle().total() - 90.0).abs() < 1e-12);
        assert!((config.fuzzy.fallback_green_time - 35.0).abs() < 1e-12);
        assert_eq!(config.logging.level, "debug");
        let custom = config.custom_scenarios.first().unwrap();
        assert_eq!(custom.key, "school_run");
        assert_eq!(custom.arrival_rates.get("south").copied(), Some(28.0));

        let queue = config.queue_config();
        assert_eq!(queue.seed, 7);
        assert!((queue.departure_interval - 0.25).abs() < 1e-12);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = SimulationConfig::parse("simulation:\n  seed: 9\n").unwrap();

        // Seed is overridden
        assert_eq!(config.simulation.seed, 9);
        // Everything else uses defaults
        assert!((config.simulation.time_step - 1.0).abs() < 1e-12);
        assert!((config.fixed.ew_green - 40.0).abs() < 1e-12);
    }

    #[test]
    fn parse_empty_yaml() {
        assert_eq!(SimulationConfig::parse("").unwrap(), SimulationConfig::default());
    }

    #[test]
    fn malformed_yaml_is_an_error() {
        let err = SimulationConfig::parse("simulation: [1, 2").unwrap_err();
        assert!(matches!(err, ConfigError::Yaml { .. }));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = SimulationConfig::from_file(Path::new("/nonexistent/signal-config.yaml"))
            .unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("signal-config.yaml");
        if path.exists() {
            let config = SimulationConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
