use crate::error::{Error, Result};
use crate::render::Palette;
use crate::sampler::TURN_PROBABILITY;
use crate::topology::Position;
use crate::VehicleId;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// The settings for a simulation run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// The delay between ticks in ms.
    pub tick_interval_ms: u64,
    /// The chance of turning down a side street at a branch point.
    pub turn_probability: f64,
    /// Seeds the turn sampler. Uses system entropy if absent.
    pub seed: Option<u64>,
    /// The starting position of each vehicle; vehicle IDs follow this order.
    pub vehicles: Vec<Position>,
    /// Vehicle marker colours, keyed by vehicle ID.
    pub palette: Palette,
    /// Stops after this many ticks. Runs forever if absent.
    pub max_ticks: Option<usize>,
    /// Checks the topology tables before starting.
    pub self_test: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 350,
            turn_probability: TURN_PROBABILITY,
            seed: None,
            vehicles: vec![Position::fixed(0, 0), Position::fixed(4, 0)],
            palette: Palette::default(),
            max_ticks: None,
            self_test: true,
        }
    }
}

impl SimulationConfig {
    /// Parses a config from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// The delay between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Checks that the turn probability is sensible and no two vehicles start on the same pixel.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.turn_probability) {
            return Err(Error::InvalidProbability(self.turn_probability));
        }
        for (idx, position) in self.vehicles.iter().enumerate() {
            if self.vehicles[..idx].contains(position) {
                return Err(Error::OccupiedStart {
                    id: VehicleId(idx),
                    location: position.location(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::Color;

    #[test]
    fn reference_defaults() {
        let config = SimulationConfig::default();
        assert_eq!(config.tick_interval(), Duration::from_millis(350));
        assert_eq!(config.turn_probability, 0.25);
        assert_eq!(config.vehicles.len(), 2);
        assert_eq!(config.palette.color_of(VehicleId(0)), Color::BLUE);
        assert_eq!(config.palette.color_of(VehicleId(1)), Color::RED);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json() {
        let config = SimulationConfig::from_json(
            r#"{
                "tick_interval_ms": 50,
                "seed": 9,
                "vehicles": [{"street": 2, "address": 1}],
                "palette": [{"r": 1, "g": 2, "b": 3}]
            }"#,
        )
        .unwrap();
        assert_eq!(config.tick_interval_ms, 50);
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.vehicles, vec![Position::new(2, 1).unwrap()]);
        assert_eq!(config.palette.color_of(VehicleId(4)), Color::rgb(1, 2, 3));
        assert_eq!(config.turn_probability, 0.25);
        assert!(config.self_test);
    }

    #[test]
    fn off_network_start() {
        let result = SimulationConfig::from_json(r#"{"vehicles": [{"street": 9, "address": 0}]}"#);
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn shared_start() {
        let result = SimulationConfig::from_json(
            r#"{"vehicles": [{"street": 0, "address": 3}, {"street": 0, "address": 3}]}"#,
        );
        assert!(matches!(
            result,
            Err(Error::OccupiedStart {
                id: VehicleId(1),
                location: 3
            })
        ));
    }

    #[test]
    fn bad_probability() {
        let result = SimulationConfig::from_json(r#"{"turn_probability": -0.1}"#);
        assert!(matches!(result, Err(Error::InvalidProbability(_))));
    }

    #[test]
    fn round_trip() {
        let config = SimulationConfig {
            max_ticks: Some(10),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(SimulationConfig::from_json(&json).unwrap(), config);
    }
}
