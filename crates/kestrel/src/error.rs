//! # Runtime Error Types

use kestrel_core::HandleError;
use thiserror::Error;

/// Errors that can occur while loading or validating a backend config.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The config file is not valid TOML for [`crate::BackendConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// No `[[imu]]` table was given.
    #[error("no [[imu]] sensors configured")]
    NoSensors,

    /// Two sensors share a name.
    #[error("duplicate sensor name: {0}")]
    DuplicateSensor(String),

    /// The control rate is zero.
    #[error("control rate must be non-zero, got {0} Hz")]
    InvalidRate(u32),

    /// A numeric sensor parameter is out of range.
    #[error("sensor '{sensor}': invalid {parameter} = {value}")]
    InvalidParameter {
        /// The sensor the parameter belongs to.
        sensor: String,
        /// The parameter name.
        parameter: &'static str,
        /// The rejected value.
        value: f64,
    },
}

/// Errors raised by the simulated backend and the control loop runner.
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend was given an invalid config.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// More sensors than pre-allocated slots.
    #[error("sensor arena full: capacity {capacity}")]
    ArenaFull {
        /// Slots available.
        capacity: usize,
    },

    /// A handle failed to bind, resolve, or read.
    #[error(transparent)]
    Handle(#[from] HandleError),
}

/// Result type for config operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
