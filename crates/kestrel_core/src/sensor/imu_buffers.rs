//! # Backend-Side IMU Storage

use std::borrow::Cow;

use tracing::debug;

use super::{ImuSensorData, ImuSensorHandle};
use crate::buffer::{Covariance3, Quaternion, Vector3};

/// One complete IMU reading, by value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImuSample {
    /// Quaternion `(x, y, z, w)`.
    pub orientation: [f64; 4],
    /// Row-major 3x3 orientation covariance.
    pub orientation_covariance: [f64; 9],
    /// Angular velocity `(x, y, z)` in rad/s.
    pub angular_velocity: [f64; 3],
    /// Row-major 3x3 angular velocity covariance.
    pub angular_velocity_covariance: [f64; 9],
    /// Linear acceleration `(x, y, z)` in m/s².
    pub linear_acceleration: [f64; 3],
    /// Row-major 3x3 linear acceleration covariance.
    pub linear_acceleration_covariance: [f64; 9],
}

impl ImuSample {
    /// Identity orientation, everything else zero.
    pub const IDENTITY: Self = Self {
        orientation: [0.0, 0.0, 0.0, 1.0],
        orientation_covariance: [0.0; 9],
        angular_velocity: [0.0; 3],
        angular_velocity_covariance: [0.0; 9],
        linear_acceleration: [0.0; 3],
        linear_acceleration_covariance: [0.0; 9],
    };
}

impl Default for ImuSample {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The six buffers one IMU backend owns and updates.
///
/// The backend keeps this alive (and in place) for as long as any handle
/// borrows it; the borrow checker enforces that. Writers call
/// [`ImuBuffers::publish`] or store into individual fields through `&self`.
///
/// ## Usage
///
/// ```rust
/// use kestrel_core::ImuBuffers;
///
/// let buffers = ImuBuffers::new();
/// let handle = buffers.handle("wrist_imu", "wrist_link");
///
/// buffers.orientation.store([0.0, 0.0, 0.7071, 0.7071]);
/// assert_eq!(handle.orientation()?.load(), [0.0, 0.0, 0.7071, 0.7071]);
/// # Ok::<(), kestrel_core::HandleError>(())
/// ```
#[derive(Debug)]
pub struct ImuBuffers {
    /// Quaternion `(x, y, z, w)`.
    pub orientation: Quaternion,
    /// Row-major 3x3 orientation covariance.
    pub orientation_covariance: Covariance3,
    /// Angular velocity `(x, y, z)`.
    pub angular_velocity: Vector3,
    /// Row-major 3x3 angular velocity covariance.
    pub angular_velocity_covariance: Covariance3,
    /// Linear acceleration `(x, y, z)`.
    pub linear_acceleration: Vector3,
    /// Row-major 3x3 linear acceleration covariance.
    pub linear_acceleration_covariance: Covariance3,
}

impl ImuBuffers {
    /// Allocates buffers holding [`ImuSample::IDENTITY`].
    #[must_use]
    pub fn new() -> Self {
        Self::from_sample(&ImuSample::IDENTITY)
    }

    /// Allocates buffers holding `sample`.
    #[must_use]
    pub fn from_sample(sample: &ImuSample) -> Self {
        Self {
            orientation: Quaternion::new(sample.orientation),
            orientation_covariance: Covariance3::new(sample.orientation_covariance),
            angular_velocity: Vector3::new(sample.angular_velocity),
            angular_velocity_covariance: Covariance3::new(sample.angular_velocity_covariance),
            linear_acceleration: Vector3::new(sample.linear_acceleration),
            linear_acceleration_covariance: Covariance3::new(
                sample.linear_acceleration_covariance,
            ),
        }
    }

    /// Writes a complete sample into the buffers.
    ///
    /// Each element is written atomically; the sample as a whole is not.
    pub fn publish(&self, sample: &ImuSample) {
        self.orientation.store(sample.orientation);
        self.orientation_covariance.store(sample.orientation_covariance);
        self.angular_velocity.store(sample.angular_velocity);
        self.angular_velocity_covariance
            .store(sample.angular_velocity_covariance);
        self.linear_acceleration.store(sample.linear_acceleration);
        self.linear_acceleration_covariance
            .store(sample.linear_acceleration_covariance);
    }

    /// Builds a fully populated data bundle over these buffers.
    #[must_use]
    pub fn data(&self, name: impl Into<String>, frame_id: impl Into<String>) -> ImuSensorData<'_> {
        ImuSensorData {
            name: name.into(),
            frame_id: frame_id.into(),
            orientation: Some(&self.orientation),
            orientation_covariance: Some(&self.orientation_covariance),
            angular_velocity: Some(&self.angular_velocity),
            angular_velocity_covariance: Some(&self.angular_velocity_covariance),
            linear_acceleration: Some(&self.linear_acceleration),
            linear_acceleration_covariance: Some(&self.linear_acceleration_covariance),
        }
    }

    /// Binds a handle over these buffers. Never fails: every buffer exists.
    #[must_use]
    pub fn handle(&self, name: impl Into<String>, frame_id: impl Into<String>) -> ImuSensorHandle<'_> {
        let (name, frame_id) = (name.into(), frame_id.into());
        debug!(sensor = %name, frame = %frame_id, "bound imu sensor handle");
        ImuSensorHandle::from_buffers(Cow::Owned(name), Cow::Owned(frame_id), self)
    }
}

impl Default for ImuBuffers {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_holds_identity() {
        let buffers = ImuBuffers::new();
        assert_eq!(buffers.orientation.load(), [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(buffers.linear_acceleration.load(), [0.0; 3]);
    }

    #[test]
    fn test_publish_visible_through_handle() {
        let buffers = ImuBuffers::default();
        let handle = buffers.handle("imu", "imu_link");

        let sample = ImuSample {
            angular_velocity: [0.1, 0.0, -0.05],
            linear_acceleration: [0.0, 0.0, 9.81],
            ..ImuSample::IDENTITY
        };
        buffers.publish(&sample);

        assert_eq!(handle.snapshot().unwrap(), sample);
    }

    #[test]
    fn test_data_bundle_references_every_buffer() {
        let buffers = ImuBuffers::new();
        let data = buffers.data("imu", "imu_link");

        assert!(data.orientation.is_some_and(|b| std::ptr::eq(b, &buffers.orientation)));
        assert!(data.orientation_covariance.is_some());
        assert!(data.angular_velocity.is_some());
        assert!(data.angular_velocity_covariance.is_some());
        assert!(data.linear_acceleration.is_some());
        assert!(data.linear_acceleration_covariance.is_some());
    }
}
