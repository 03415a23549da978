use crate::body::BodyId;
use crate::photon::PhotometerId;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SimError {
    #[error("mass must be positive and finite, got {0}")]
    InvalidMass(f64),
    #[error("radius must be positive and finite, got {0}")]
    InvalidRadius(f64),
    #[error("luminosity must be non-negative and finite, got {0}")]
    InvalidLuminosity(f64),
    #[error("no body with id {0}")]
    BodyNotFound(BodyId),
    #[error("body {0} is not a star")]
    NotAStar(BodyId),
    #[error("no photometer with id {0}")]
    PhotometerNotFound(PhotometerId),
}

/// Errors that can occur while loading a simulation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid value for {field}: {value}")]
    Invalid { field: &'static str, value: f64 },
}
