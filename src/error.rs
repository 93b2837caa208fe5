use thiserror::Error;

/// Top-level error type for the catenary crate.
#[derive(Debug, Error)]
pub enum CatenaryError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Structure(#[from] StructureError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors related to geometric computations.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("parameter {parameter} = {value} is out of range [{min}, {max}]")]
    ParameterOutOfRange {
        parameter: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("division by zero")]
    DivideByZero,
}

/// Errors raised while loading configuration and presets.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("unknown preset: {0}")]
    UnknownPreset(String),
}

/// Errors related to the structure store.
#[derive(Debug, Error)]
pub enum StructureError {
    #[error("structure not found")]
    NotFound,
}

/// Errors raised by the creation session state machine.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

/// Convenience type alias for results using [`CatenaryError`].
pub type Result<T> = std::result::Result<T, CatenaryError>;
