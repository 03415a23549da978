//! Physical constants and engine switches, fixed for the lifetime of a
//! [`Simulation`](crate::Simulation).

use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PhysicalConstants {
    pub gravitational_constant: f64,
    /// Distance a photon covers in one tick.
    pub speed_of_light: f64,
    pub planck_constant: f64,
    /// Fraction of the true photon output that is actually simulated.
    pub light_fraction: f64,
    /// Ticks a photon lives before it is dropped.
    pub photon_lifetime: u32,
}
impl Default for PhysicalConstants {
    fn default() -> Self {
        Self {
            gravitational_constant: 6.674e-11,
            speed_of_light: 299_792_458.0,
            planck_constant: 6.626_070_15e-34,
            light_fraction: 1e-60,
            photon_lifetime: 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub constants: PhysicalConstants,
    /// Propagate photons and record photometer hits during `advance`.
    pub photons: bool,
    /// Merge bodies whose motion brings them into contact.
    pub collisions: bool,
    /// Append every body's pre-step position to its history.
    pub record_history: bool,
    /// Upper bound on the photons a single star emits per tick.
    pub max_photon_batch: usize,
}
impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            constants: PhysicalConstants::default(),
            photons: true,
            collisions: true,
            record_history: false,
            max_photon_batch: 100_000,
        }
    }
}

impl SimulationConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }
    pub fn validate(&self) -> Result<(), ConfigError> {
        let c = &self.constants;
        let positive = [
            ("gravitational_constant", c.gravitational_constant),
            ("speed_of_light", c.speed_of_light),
            ("planck_constant", c.planck_constant),
            ("light_fraction", c.light_fraction),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::Invalid { field, value });
            }
        }
        if c.photon_lifetime == 0 {
            return Err(ConfigError::Invalid {
                field: "photon_lifetime",
                value: 0.0,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_document_gives_defaults() {
        let config = SimulationConfig::from_toml_str("").unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = SimulationConfig::from_toml_str(
            r#"
            photons = false
            [constants]
            gravitational_constant = 1.0
            photon_lifetime = 5
            "#,
        )
        .unwrap();
        assert!(!config.photons);
        assert!(config.collisions);
        assert_eq!(config.constants.gravitational_constant, 1.0);
        assert_eq!(config.constants.photon_lifetime, 5);
        assert_eq!(config.constants.speed_of_light, 299_792_458.0);
    }

    #[test]
    fn rejects_non_positive_constants() {
        let err = SimulationConfig::from_toml_str("[constants]\nspeed_of_light = 0.0").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::Invalid {
                field: "speed_of_light",
                ..
            }
        ));
        let err = SimulationConfig::from_toml_str("[constants]\nphoton_lifetime = 0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { .. }));
    }

    #[test]
    fn rejects_unknown_keys() {
        let err = SimulationConfig::from_toml_str("drag = 0.5").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "record_history = true\nmax_photon_batch = 10").unwrap();
        let config = SimulationConfig::load(file.path()).unwrap();
        assert!(config.record_history);
        assert_eq!(config.max_photon_batch, 10);
    }
}
