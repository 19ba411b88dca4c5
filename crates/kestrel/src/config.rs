//! # Backend Configuration
//!
//! Loaded once at startup from TOML. Nothing here is read on the cycle path.
//!
//! ```toml
//! control_rate_hz = 200
//! seed = 7
//!
//! [[imu]]
//! name = "base_imu"
//! frame_id = "base_link"
//! yaw_rate = 0.1
//! noise = 0.01
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;
use tracing::info;

use crate::error::{ConfigError, ConfigResult};

/// Standard gravity in m/s².
pub const STANDARD_GRAVITY: f64 = 9.806_65;

fn default_control_rate_hz() -> u32 {
    100
}

fn default_gravity() -> f64 {
    STANDARD_GRAVITY
}

/// One simulated IMU.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ImuConfig {
    /// Unique sensor name.
    pub name: String,
    /// Reference frame; empty if the sensor has none.
    #[serde(default)]
    pub frame_id: String,
    /// Constant yaw rate about z, rad/s.
    #[serde(default)]
    pub yaw_rate: f64,
    /// Amplitude of uniform noise added to gyro and accelerometer axes.
    #[serde(default)]
    pub noise: f64,
    /// Gravity along +z, m/s².
    #[serde(default = "default_gravity")]
    pub gravity: f64,
}

impl ImuConfig {
    /// Checks the numeric parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidParameter`] for negative or non-finite
    /// noise, or a non-finite yaw rate or gravity.
    pub fn validate(&self) -> ConfigResult<()> {
        let invalid = |parameter: &'static str, value: f64| ConfigError::InvalidParameter {
            sensor: self.name.clone(),
            parameter,
            value,
        };
        if !self.noise.is_finite() || self.noise < 0.0 {
            return Err(invalid("noise", self.noise));
        }
        if !self.yaw_rate.is_finite() {
            return Err(invalid("yaw_rate", self.yaw_rate));
        }
        if !self.gravity.is_finite() {
            return Err(invalid("gravity", self.gravity));
        }
        Ok(())
    }

    /// A noiseless, stationary sensor.
    #[must_use]
    pub fn new(name: impl Into<String>, frame_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frame_id: frame_id.into(),
            yaw_rate: 0.0,
            noise: 0.0,
            gravity: STANDARD_GRAVITY,
        }
    }
}

/// Configuration for the simulated backend and its control loop.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Control loop rate.
    #[serde(default = "default_control_rate_hz")]
    pub control_rate_hz: u32,
    /// Noise generator seed.
    #[serde(default)]
    pub seed: u64,
    /// Extra buffer slots reserved for sensors added at runtime.
    #[serde(default)]
    pub spare_slots: usize,
    /// Sensors, one `[[imu]]` table each.
    #[serde(rename = "imu", default)]
    pub sensors: Vec<ImuConfig>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            control_rate_hz: default_control_rate_hz(),
            seed: 0,
            spare_slots: 0,
            sensors: vec![ImuConfig::new("base_imu", "base_link")],
        }
    }
}

impl BackendConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed TOML, or a validation
    /// error (see [`BackendConfig::validate`]).
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise as
    /// [`BackendConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&text)?;
        info!(
            path = %path.display(),
            sensors = config.sensors.len(),
            rate_hz = config.control_rate_hz,
            "loaded backend config"
        );
        Ok(config)
    }

    /// Checks rate, sensor names and sensor parameters.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.control_rate_hz == 0 {
            return Err(ConfigError::InvalidRate(self.control_rate_hz));
        }
        if self.sensors.is_empty() {
            return Err(ConfigError::NoSensors);
        }

        let mut names = HashSet::with_capacity(self.sensors.len());
        for sensor in &self.sensors {
            if !names.insert(sensor.name.as_str()) {
                return Err(ConfigError::DuplicateSensor(sensor.name.clone()));
            }

            sensor.validate()?;
        }

        Ok(())
    }

    /// Buffer slots the backend pre-allocates.
    #[must_use]
    pub fn slot_capacity(&self) -> usize {
        self.sensors.len().saturating_add(self.spare_slots)
    }

    /// Time between control cycles.
    #[must_use]
    pub fn cycle_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.control_rate_hz.max(1)))
    }
}
