//! Traffic scenarios: per-direction arrival rates and a nominal duration.
//!
//! [`ScenarioCatalog::standard`] holds the nine built-in presets in a fixed
//! order. Custom scenarios from configuration are validated on the way in:
//! direction keys must name one of the four approaches and rates must be
//! finite and non-negative. A direction a custom scenario leaves out gets
//! rate zero.

use signal_types::{Direction, PerDirection, TypesError};

use crate::config::CustomScenarioConfig;

/// Errors raised while looking up or building scenarios.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScenarioError {
    /// No scenario with this key exists.
    #[error("unknown scenario '{name}'; available: {}", .valid.join(", "))]
    UnknownScenario {
        /// The key that was asked for.
        name: String,
        /// Every key the catalog knows, in catalog order.
        valid: Vec<String>,
    },

    /// A custom scenario used a key that is not a direction.
    #[error(transparent)]
    InvalidDirection(#[from] TypesError),

    /// A custom scenario has a negative or non-finite rate.
    #[error("scenario '{key}': invalid arrival rate {rate} for {direction}")]
    InvalidRate {
        /// Scenario key.
        key: String,
        /// Offending direction.
        direction: Direction,
        /// The rejected rate.
        rate: f64,
    },

    /// A custom scenario has a non-positive or non-finite duration.
    #[error("scenario '{key}': invalid duration {duration}")]
    InvalidDuration {
        /// Scenario key.
        key: String,
        /// The rejected duration.
        duration: f64,
    },
}

/// A named traffic pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    /// Lookup key, e.g. `rush_ns`.
    pub key: String,
    /// Display name.
    pub name: String,
    /// Free-text description.
    pub description: String,
    /// Vehicles per minute on each approach.
    pub arrival_rates: PerDirection<f64>,
    /// Nominal duration in seconds.
    pub duration: f64,
}

impl Scenario {
    fn preset(
        key: &str,
        name: &str,
        description: &str,
        rates: [f64; 4],
        duration: f64,
    ) -> Self {
        let [north, south, east, west] = rates;
        Self {
            key: key.to_owned(),
            name: name.to_owned(),
            description: description.to_owned(),
            arrival_rates: PerDirection::new(north, south, east, west),
            duration,
        }
    }

    /// Validate a scenario written in configuration.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::InvalidDirection`] for a key that is not a
    /// direction, [`ScenarioError::InvalidRate`] for a negative or
    /// non-finite rate, [`ScenarioError::InvalidDuration`] for a bad
    /// duration.
    pub fn from_config(config: &CustomScenarioConfig) -> Result<Self, ScenarioError> {
        let mut rates = PerDirection::splat(0.0);
        for (name, &rate) in &config.arrival_rates {
            let direction: Direction = name.parse()?;
            if !rate.is_finite() || rate < 0.0 {
                return Err(ScenarioError::InvalidRate {
                    key: config.key.clone(),
                    direction,
                    rate,
                });
            }
            *rates.get_mut(direction) = rate;
        }
        if !config.duration.is_finite() || config.duration <= 0.0 {
            return Err(ScenarioError::InvalidDuration {
                key: config.key.clone(),
                duration: config.duration,
            });
        }
        Ok(Self {
            key: config.key.clone(),
            name: config.name.clone().unwrap_or_else(|| config.key.clone()),
            description: config.description.clone(),
            arrival_rates: rates,
            duration: config.duration,
        })
    }

    /// Vehicles per minute over all approaches.
    pub fn total_arrival_rate(&self) -> f64 {
        self.arrival_rates.iter().map(|(_, rate)| rate).sum()
    }
}

/// Something that can hand out scenarios by key.
pub trait ScenarioProvider {
    /// The scenario registered under `key`.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::UnknownScenario`] listing the valid keys.
    fn scenario(&self, key: &str) -> Result<&Scenario, ScenarioError>;

    /// Every key, in order.
    fn keys(&self) -> Vec<String>;
}

/// An ordered set of scenarios.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioCatalog {
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalog {
    /// The nine built-in presets.
    pub fn standard() -> Self {
        let scenarios = vec![
            Scenario::preset(
                "normal",
                "Normal Traffic",
                "Balanced traffic with moderate flow on all directions",
                [12.0, 12.0, 12.0, 12.0],
                3600.0,
            ),
            Scenario::preset(
                "rush_ns",
                "Rush Hour (N-S)",
                "Heavy North-South traffic (main road during rush hour)",
                [35.0, 35.0, 10.0, 10.0],
                3600.0,
            ),
            Scenario::preset(
                "rush_ew",
                "Rush Hour (E-W)",
                "Heavy East-West traffic",
                [10.0, 10.0, 35.0, 35.0],
                3600.0,
            ),
            Scenario::preset(
                "light",
                "Light Traffic",
                "Light traffic on all directions (late night scenario)",
                [5.0, 5.0, 5.0, 5.0],
                3600.0,
            ),
            Scenario::preset(
                "asymmetric_north",
                "Asymmetric (Heavy North)",
                "Very heavy traffic from North only, testing adaptability",
                [45.0, 8.0, 8.0, 8.0],
                3600.0,
            ),
            Scenario::preset(
                "peak",
                "Peak Congestion",
                "Very heavy traffic on all directions, stress test",
                [40.0, 40.0, 40.0, 40.0],
                3600.0,
            ),
            Scenario::preset(
                "morning",
                "Morning Commute",
                "Typical morning commute pattern (into city center)",
                [30.0, 10.0, 25.0, 8.0],
                7200.0,
            ),
            Scenario::preset(
                "evening",
                "Evening Commute",
                "Typical evening commute pattern (leaving city center)",
                [10.0, 30.0, 8.0, 25.0],
                7200.0,
            ),
            Scenario::preset(
                "weekend",
                "Weekend Leisure",
                "Weekend traffic pattern with leisure trips",
                [15.0, 18.0, 15.0, 18.0],
                3600.0,
            ),
        ];
        Self { scenarios }
    }

    /// The built-in presets followed by `custom`. A custom scenario whose
    /// key matches an existing one replaces it in place.
    ///
    /// # Errors
    ///
    /// The first validation error among `custom`.
    pub fn with_custom(custom: &[CustomScenarioConfig]) -> Result<Self, ScenarioError> {
        let mut catalog = Self::standard();
        for config in custom {
            catalog.insert(Scenario::from_config(config)?);
        }
        Ok(catalog)
    }

    /// Add `scenario`, replacing any scenario with the same key.
    pub fn insert(&mut self, scenario: Scenario) {
        match self.scenarios.iter_mut().find(|s| s.key == scenario.key) {
            Some(existing) => *existing = scenario,
            None => self.scenarios.push(scenario),
        }
    }

    /// All scenarios in order.
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    /// Look a scenario up by key.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::UnknownScenario`] listing the valid keys.
    pub fn get(&self, key: &str) -> Result<&Scenario, ScenarioError> {
        self.scenarios
            .iter()
            .find(|s| s.key == key)
            .ok_or_else(|| ScenarioError::UnknownScenario {
                name: key.to_owned(),
                valid: self.keys(),
            })
    }

    /// Every key, in order.
    pub fn keys(&self) -> Vec<String> {
        self.scenarios.iter().map(|s| s.key.clone()).collect()
    }

    /// Resolve `keys` in the given order. An empty list selects everything.
    ///
    /// # Errors
    ///
    /// [`ScenarioError::UnknownScenario`] for the first unknown key.
    pub fn select(&self, keys: &[String]) -> Result<Vec<&Scenario>, ScenarioError> {
        if keys.is_empty() {
            return Ok(self.scenarios.iter().collect());
        }
        keys.iter().map(|key| self.get(key)).collect()
    }
}

impl Default for ScenarioCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

impl ScenarioProvider for ScenarioCatalog {
    fn scenario(&self, key: &str) -> Result<&Scenario, ScenarioError> {
        self.get(key)
    }

    fn keys(&self) -> Vec<String> {
        Self::keys(self)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn custom(key: &str, rates: &[(&str, f64)]) -> CustomScenarioConfig {
        CustomScenarioConfig {
            key: key.to_owned(),
            name: None,
            description: String::new(),
            arrival_rates: rates
                .iter()
                .map(|&(d, r)| (d.to_owned(), r))
                .collect::<BTreeMap<_, _>>(),
            duration: 600.0,
        }
    }

    #[test]
    fn standard_catalog_order_and_rates() {
        let catalog = ScenarioCatalog::standard();
        assert_eq!(
            catalog.keys(),
            vec![
                "normal",
                "rush_ns",
                "rush_ew",
                "light",
                "asymmetric_north",
                "peak",
                "morning",
                "evening",
                "weekend"
            ]
        );
        let rush = catalog.get("rush_ns").unwrap();
        assert_eq!(rush.name, "Rush Hour (N-S)");
        assert!((rush.total_arrival_rate() - 90.0).abs() < 1e-12);
        let morning = catalog.get("morning").unwrap();
        assert!((morning.duration - 7200.0).abs() < 1e-12);
        assert!((morning.arrival_rates.east - 25.0).abs() < 1e-12);
    }

    #[test]
    fn unknown_scenario_lists_valid_keys() {
        let err = ScenarioCatalog::standard().get("gridlock").unwrap_err();
        let ScenarioError::UnknownScenario { ref name, ref valid } = err else {
            panic!("unexpected error: {err}");
        };
        assert_eq!(name, "gridlock");
        assert_eq!(valid.len(), 9);
        let message = err.to_string();
        assert!(message.contains("gridlock"));
        assert!(message.contains("asymmetric_north"));
    }

    #[test]
    fn custom_scenarios_validate_directions() {
        let err = ScenarioCatalog::with_custom(&[custom("x", &[("northeast", 5.0)])]).unwrap_err();
        assert!(matches!(err, ScenarioError::InvalidDirection(_)));

        let err = ScenarioCatalog::with_custom(&[custom("x", &[("north", -1.0)])]).unwrap_err();
        assert!(matches!(
            err,
            ScenarioError::InvalidRate {
                direction: Direction::North,
                ..
            }
        ));
    }

    #[test]
    fn custom_scenarios_extend_and_replace() {
        let catalog = ScenarioCatalog::with_custom(&[
            custom("school_run", &[("south", 28.0), ("e", 6.0)]),
            custom("light", &[("north", 1.0)]),
        ])
        .unwrap();
        assert_eq!(catalog.scenarios().len(), 10);
        let school = catalog.get("school_run").unwrap();
        assert_eq!(school.name, "school_run");
        assert!((school.arrival_rates.south - 28.0).abs() < 1e-12);
        assert!((school.arrival_rates.east - 6.0).abs() < 1e-12);
        assert!(school.arrival_rates.west.abs() < 1e-12);
        let light = catalog.get("light").unwrap();
        assert!((light.total_arrival_rate() - 1.0).abs() < 1e-12);
        assert_eq!(catalog.keys().get(3).map(String::as_str), Some("light"));
    }

    #[test]
    fn select_preserves_requested_order() {
        let catalog = ScenarioCatalog::standard();
        assert_eq!(catalog.select(&[]).unwrap().len(), 9);
        let picked = catalog
            .select(&["peak".to_owned(), "normal".to_owned()])
            .unwrap();
        let keys: Vec<&str> = picked.iter().map(|s| s.key.as_str()).collect();
        assert_eq!(keys, vec!["peak", "normal"]);
        assert!(catalog.select(&["nope".to_owned()]).is_err());
    }
}
