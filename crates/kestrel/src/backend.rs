//! # Simulated IMU Backend
//!
//! Owns one [`ImuBuffers`] slot per configured sensor and writes synthetic
//! readings into them. The buffers are written through shared references,
//! so the backend can be updated from one thread while handles borrowed
//! from it are read on another.

use std::sync::atomic::{AtomicU64, Ordering};

use kestrel_core::{
    HandleError, HandleResult, ImuBuffers, ImuSample, ImuSensorHandle, IndexedImuHandle,
    SlotArena, SlotId,
};
use parking_lot::Mutex;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::config::{BackendConfig, ImuConfig};
use crate::error::{BackendError, BackendResult, ConfigError};

struct SimulatedSensor {
    config: ImuConfig,
    slot: SlotId,
}

/// A backend that simulates every IMU in a [`BackendConfig`].
///
/// Each sensor yaws at a constant rate about +z, feels gravity along +z,
/// and gets uniform noise of the configured amplitude on every gyro and
/// accelerometer axis. Covariances are diagonal with the noise variance.
///
/// ## Usage
///
/// ```rust
/// use kestrel::{BackendConfig, SimulatedImuBackend};
///
/// let backend = SimulatedImuBackend::new(&BackendConfig::default())?;
/// let handles = backend.handles()?;
///
/// backend.update(0.5);
/// let accel = handles[0].linear_acceleration()?.load();
/// assert!(accel[2] > 9.0);
/// # Ok::<(), kestrel::BackendError>(())
/// ```
pub struct SimulatedImuBackend {
    /// Sensor buffers, one slot per sensor.
    arena: SlotArena<ImuBuffers>,
    /// Sensor parameters and their slots.
    sensors: Vec<SimulatedSensor>,
    /// Noise source, seeded from the config.
    rng: Mutex<ChaCha8Rng>,
    /// Number of completed `update` calls.
    updates: AtomicU64,
}

impl SimulatedImuBackend {
    /// Validates `config` and allocates one buffer set per sensor, plus
    /// `spare_slots` empty slots for [`SimulatedImuBackend::add_sensor`].
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] if the config is invalid.
    pub fn new(config: &BackendConfig) -> BackendResult<Self> {
        config.validate()?;

        let capacity = config.slot_capacity();
        let mut backend = Self {
            arena: SlotArena::with_capacity(capacity),
            sensors: Vec::with_capacity(capacity),
            rng: Mutex::new(ChaCha8Rng::seed_from_u64(config.seed)),
            updates: AtomicU64::new(0),
        };

        for sensor in &config.sensors {
            backend.register(sensor.clone())?;
        }

        Ok(backend)
    }

    /// Registers another sensor in a spare slot.
    ///
    /// Requires `&mut self`, so no borrowed handle can be alive. Its buffers
    /// start at [`ImuSample::IDENTITY`] until the next update.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Config`] if the sensor's parameters are
    /// invalid or its name is taken, and [`BackendError::ArenaFull`] if no
    /// slot is free.
    pub fn add_sensor(&mut self, config: ImuConfig) -> BackendResult<IndexedImuHandle> {
        config.validate()?;
        if self.sensors.iter().any(|s| s.config.name == config.name) {
            return Err(ConfigError::DuplicateSensor(config.name).into());
        }

        let slot = self.register(config)?;
        let sensor = &self.sensors[self.sensors.len() - 1].config;
        Ok(IndexedImuHandle::new(
            sensor.name.as_str(),
            sensor.frame_id.as_str(),
            slot,
        ))
    }

    fn register(&mut self, config: ImuConfig) -> BackendResult<SlotId> {
        let slot = self
            .arena
            .insert(ImuBuffers::new())
            .ok_or(BackendError::ArenaFull {
                capacity: self.arena.capacity(),
            })?;
        info!(
            sensor = %config.name,
            frame = %config.frame_id,
            %slot,
            "allocated imu buffers"
        );
        self.sensors.push(SimulatedSensor { config, slot });
        Ok(slot)
    }

    /// Number of live sensors.
    #[must_use]
    pub fn sensor_count(&self) -> usize {
        self.sensors.len()
    }

    /// Number of completed [`SimulatedImuBackend::update`] calls.
    #[must_use]
    pub fn update_count(&self) -> u64 {
        self.updates.load(Ordering::Relaxed)
    }

    /// The backing storage, for resolving [`IndexedImuHandle`]s.
    #[must_use]
    pub fn arena(&self) -> &SlotArena<ImuBuffers> {
        &self.arena
    }

    /// Writes the reading for simulation time `time_s` into every sensor.
    pub fn update(&self, time_s: f64) {
        let mut rng = self.rng.lock();

        for sensor in &self.sensors {
            if let Some(buffers) = self.arena.get(sensor.slot) {
                buffers.publish(&synthesize(&sensor.config, time_s, &mut *rng));
            }
        }

        let updates = self.updates.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(updates, time_s, "published imu samples");
    }

    /// Index-based handles for every live sensor.
    #[must_use]
    pub fn indexed_handles(&self) -> Vec<IndexedImuHandle> {
        self.sensors
            .iter()
            .map(|s| IndexedImuHandle::new(s.config.name.as_str(), s.config.frame_id.as_str(), s.slot))
            .collect()
    }

    /// Borrowed handles for every live sensor.
    ///
    /// # Errors
    ///
    /// Returns [`kestrel_core::HandleError::StaleSlot`] if a sensor's slot
    /// does not resolve.
    pub fn handles(&self) -> HandleResult<Vec<ImuSensorHandle<'_>>> {
        self.sensors
            .iter()
            .map(|s| {
                self.arena
                    .get(s.slot)
                    .map(|buffers| buffers.handle(s.config.name.as_str(), s.config.frame_id.as_str()))
                    .ok_or(HandleError::StaleSlot { slot: s.slot })
            })
            .collect()
    }

    /// Tears down a sensor and frees its buffers.
    ///
    /// Requires `&mut self`, so no borrowed handle can be alive. Index-based
    /// handles issued earlier resolve to `StaleSlot` from now on.
    pub fn remove_sensor(&mut self, name: &str) -> Option<ImuBuffers> {
        let position = self.sensors.iter().position(|s| s.config.name == name)?;
        let sensor = self.sensors.remove(position);
        info!(sensor = %name, slot = %sensor.slot, "removed imu buffers");
        self.arena.remove(sensor.slot)
    }
}

fn synthesize(config: &ImuConfig, time_s: f64, rng: &mut impl Rng) -> ImuSample {
    let amplitude = config.noise;
    let mut noise = || {
        if amplitude > 0.0 {
            rng.gen_range(-amplitude..=amplitude)
        } else {
            0.0
        }
    };

    let half_yaw = 0.5 * config.yaw_rate * time_s;
    let angular_velocity = [noise(), noise(), config.yaw_rate + noise()];
    let linear_acceleration = [noise(), noise(), config.gravity + noise()];

    // Variance of a uniform distribution on [-a, a]
    let variance = amplitude * amplitude / 3.0;
    let covariance = [variance, 0.0, 0.0, 0.0, variance, 0.0, 0.0, 0.0, variance];

    ImuSample {
        orientation: [0.0, 0.0, half_yaw.sin(), half_yaw.cos()],
        orientation_covariance: covariance,
        angular_velocity,
        angular_velocity_covariance: covariance,
        linear_acceleration,
        linear_acceleration_covariance: covariance,
    }
}
