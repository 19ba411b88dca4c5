//! # IMU Sensor Handle
//!
//! A read-only view of the six buffers an IMU backend updates at sensor rate.

use std::borrow::Cow;

use tracing::{debug, warn};

use super::{ImuBuffers, ImuField, ImuSample};
use crate::buffer::{Covariance3, Quaternion, StateView, Vector3};
use crate::error::{HandleError, HandleResult};

/// Everything needed to bind an [`ImuSensorHandle`], as one bundle.
///
/// `None` marks a buffer the backend did not supply. Binding rejects any
/// bundle with a missing buffer.
#[derive(Clone, Debug, Default)]
pub struct ImuSensorData<'a> {
    /// The name of the sensor.
    pub name: String,
    /// The reference frame this sensor is associated with. May be empty.
    pub frame_id: String,
    /// Orientation quaternion `(x, y, z, w)`.
    pub orientation: Option<&'a Quaternion>,
    /// Row-major 3x3 orientation covariance about `(x, y, z)`.
    pub orientation_covariance: Option<&'a Covariance3>,
    /// Angular velocity `(x, y, z)`.
    pub angular_velocity: Option<&'a Vector3>,
    /// Row-major 3x3 angular velocity covariance.
    pub angular_velocity_covariance: Option<&'a Covariance3>,
    /// Linear acceleration `(x, y, z)`.
    pub linear_acceleration: Option<&'a Vector3>,
    /// Row-major 3x3 linear acceleration covariance.
    pub linear_acceleration_covariance: Option<&'a Covariance3>,
}

/// Whether a handle references backend buffers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HandleState {
    /// Default-constructed; every numeric getter fails.
    Empty,
    /// Bound to all six buffers for the handle's whole lifetime.
    Bound,
}

/// The six views of a bound handle. Stored as one unit so a handle is
/// either fully bound or not bound at all.
#[derive(Clone, Copy, Debug)]
struct ImuViews<'a> {
    orientation: StateView<'a, 4>,
    orientation_covariance: StateView<'a, 9>,
    angular_velocity: StateView<'a, 3>,
    angular_velocity_covariance: StateView<'a, 9>,
    linear_acceleration: StateView<'a, 3>,
    linear_acceleration_covariance: StateView<'a, 9>,
}

impl<'a> ImuViews<'a> {
    /// Checks presence in declaration order; the first gap is reported.
    fn bind(
        orientation: Option<&'a Quaternion>,
        orientation_covariance: Option<&'a Covariance3>,
        angular_velocity: Option<&'a Vector3>,
        angular_velocity_covariance: Option<&'a Covariance3>,
        linear_acceleration: Option<&'a Vector3>,
        linear_acceleration_covariance: Option<&'a Covariance3>,
    ) -> HandleResult<Self> {
        let missing = |field| HandleError::InvalidArgument { field };

        Ok(Self {
            orientation: orientation
                .ok_or(missing(ImuField::Orientation))?
                .view(),
            orientation_covariance: orientation_covariance
                .ok_or(missing(ImuField::OrientationCovariance))?
                .view(),
            angular_velocity: angular_velocity
                .ok_or(missing(ImuField::AngularVelocity))?
                .view(),
            angular_velocity_covariance: angular_velocity_covariance
                .ok_or(missing(ImuField::AngularVelocityCovariance))?
                .view(),
            linear_acceleration: linear_acceleration
                .ok_or(missing(ImuField::LinearAcceleration))?
                .view(),
            linear_acceleration_covariance: linear_acceleration_covariance
                .ok_or(missing(ImuField::LinearAccelerationCovariance))?
                .view(),
        })
    }

    fn of(buffers: &'a ImuBuffers) -> Self {
        Self {
            orientation: buffers.orientation.view(),
            orientation_covariance: buffers.orientation_covariance.view(),
            angular_velocity: buffers.angular_velocity.view(),
            angular_velocity_covariance: buffers.angular_velocity_covariance.view(),
            linear_acceleration: buffers.linear_acceleration.view(),
            linear_acceleration_covariance: buffers.linear_acceleration_covariance.view(),
        }
    }
}

/// A non-owning, read-only handle to one IMU's state buffers.
///
/// The handle copies its `name` and `frame_id`, and borrows the numeric
/// buffers for `'a`. Handles resolved from an [`super::IndexedImuHandle`]
/// borrow their identity from it instead, so resolution never allocates. It never writes to them and never caches their
/// contents: each getter returns a view of the live storage, so values the
/// backend publishes are visible on the next read.
///
/// ## Construction
///
/// - [`Default`] produces an `Empty` handle
/// - [`ImuSensorHandle::from_data`] / [`TryFrom`] bind from an [`ImuSensorData`] bundle
/// - [`ImuSensorHandle::new`] binds from individual fields
///
/// All binding paths share one validation routine and fail with
/// [`HandleError::InvalidArgument`] on the first missing buffer.
///
/// ## Usage
///
/// ```rust
/// use kestrel_core::{ImuBuffers, ImuSensorHandle};
///
/// let buffers = ImuBuffers::new();
/// let handle = ImuSensorHandle::from_data(&buffers.data("base_imu", "base_link"))?;
///
/// buffers.angular_velocity.store([0.1, 0.0, -0.05]);
/// assert_eq!(handle.angular_velocity()?.load(), [0.1, 0.0, -0.05]);
/// # Ok::<(), kestrel_core::HandleError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct ImuSensorHandle<'a> {
    name: Cow<'a, str>,
    frame_id: Cow<'a, str>,
    views: Option<ImuViews<'a>>,
}

impl<'a> ImuSensorHandle<'a> {
    /// Binds a handle from individual fields.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::InvalidArgument`] naming the first absent buffer.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: impl Into<String>,
        frame_id: impl Into<String>,
        orientation: Option<&'a Quaternion>,
        orientation_covariance: Option<&'a Covariance3>,
        angular_velocity: Option<&'a Vector3>,
        angular_velocity_covariance: Option<&'a Covariance3>,
        linear_acceleration: Option<&'a Vector3>,
        linear_acceleration_covariance: Option<&'a Covariance3>,
    ) -> HandleResult<Self> {
        let views = ImuViews::bind(
            orientation,
            orientation_covariance,
            angular_velocity,
            angular_velocity_covariance,
            linear_acceleration,
            linear_acceleration_covariance,
        );
        Self::bind(name.into(), frame_id.into(), views)
    }

    /// Binds a handle from a data bundle, copying its name and frame.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::InvalidArgument`] naming the first absent buffer.
    pub fn from_data(data: &ImuSensorData<'a>) -> HandleResult<Self> {
        let views = ImuViews::bind(
            data.orientation,
            data.orientation_covariance,
            data.angular_velocity,
            data.angular_velocity_covariance,
            data.linear_acceleration,
            data.linear_acceleration_covariance,
        );
        Self::bind(data.name.clone(), data.frame_id.clone(), views)
    }

    /// Binds to a complete buffer set; cannot fail. Does not log, so it is
    /// safe on the cycle path.
    #[inline]
    pub(super) fn from_buffers(
        name: Cow<'a, str>,
        frame_id: Cow<'a, str>,
        buffers: &'a ImuBuffers,
    ) -> Self {
        Self {
            name,
            frame_id,
            views: Some(ImuViews::of(buffers)),
        }
    }

    fn bind(name: String, frame_id: String, views: HandleResult<ImuViews<'a>>) -> HandleResult<Self> {
        match views {
            Ok(views) => {
                debug!(sensor = %name, frame = %frame_id, "bound imu sensor handle");
                Ok(Self {
                    name: Cow::Owned(name),
                    frame_id: Cow::Owned(frame_id),
                    views: Some(views),
                })
            }
            Err(err) => {
                warn!(sensor = %name, error = %err, "rejected imu sensor handle");
                Err(err)
            }
        }
    }

    /// Returns the sensor name (empty on an `Empty` handle).
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the reference frame (possibly empty).
    #[inline]
    #[must_use]
    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    /// Returns whether this handle is bound to backend buffers.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> HandleState {
        if self.views.is_some() {
            HandleState::Bound
        } else {
            HandleState::Empty
        }
    }

    /// Shorthand for `state() == HandleState::Bound`.
    #[inline]
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.views.is_some()
    }

    #[inline]
    fn bound_views(&self, field: ImuField) -> HandleResult<&ImuViews<'a>> {
        self.views
            .as_ref()
            .ok_or(HandleError::InvalidReference { field })
    }

    /// Orientation quaternion `(x, y, z, w)`.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::InvalidReference`] on an `Empty` handle.
    #[inline]
    pub fn orientation(&self) -> HandleResult<StateView<'a, 4>> {
        self.bound_views(ImuField::Orientation).map(|v| v.orientation)
    }

    /// Row-major 3x3 orientation covariance.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::InvalidReference`] on an `Empty` handle.
    #[inline]
    pub fn orientation_covariance(&self) -> HandleResult<StateView<'a, 9>> {
        self.bound_views(ImuField::OrientationCovariance)
            .map(|v| v.orientation_covariance)
    }

    /// Angular velocity `(x, y, z)`.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::InvalidReference`] on an `Empty` handle.
    #[inline]
    pub fn angular_velocity(&self) -> HandleResult<StateView<'a, 3>> {
        self.bound_views(ImuField::AngularVelocity).map(|v| v.angular_velocity)
    }

    /// Row-major 3x3 angular velocity covariance.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::InvalidReference`] on an `Empty` handle.
    #[inline]
    pub fn angular_velocity_covariance(&self) -> HandleResult<StateView<'a, 9>> {
        self.bound_views(ImuField::AngularVelocityCovariance)
            .map(|v| v.angular_velocity_covariance)
    }

    /// Linear acceleration `(x, y, z)`.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::InvalidReference`] on an `Empty` handle.
    #[inline]
    pub fn linear_acceleration(&self) -> HandleResult<StateView<'a, 3>> {
        self.bound_views(ImuField::LinearAcceleration)
            .map(|v| v.linear_acceleration)
    }

    /// Row-major 3x3 linear acceleration covariance.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::InvalidReference`] on an `Empty` handle.
    #[inline]
    pub fn linear_acceleration_covariance(&self) -> HandleResult<StateView<'a, 9>> {
        self.bound_views(ImuField::LinearAccelerationCovariance)
            .map(|v| v.linear_acceleration_covariance)
    }

    /// Copies the current contents of all six buffers.
    ///
    /// The copy belongs to the caller; the handle keeps no state of its own.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::InvalidReference`] on an `Empty` handle.
    pub fn snapshot(&self) -> HandleResult<ImuSample> {
        let v = self.bound_views(ImuField::Orientation)?;
        Ok(ImuSample {
            orientation: v.orientation.load(),
            orientation_covariance: v.orientation_covariance.load(),
            angular_velocity: v.angular_velocity.load(),
            angular_velocity_covariance: v.angular_velocity_covariance.load(),
            linear_acceleration: v.linear_acceleration.load(),
            linear_acceleration_covariance: v.linear_acceleration_covariance.load(),
        })
    }
}

impl<'a> TryFrom<ImuSensorData<'a>> for ImuSensorHandle<'a> {
    type Error = HandleError;

    fn try_from(data: ImuSensorData<'a>) -> HandleResult<Self> {
        let views = ImuViews::bind(
            data.orientation,
            data.orientation_covariance,
            data.angular_velocity,
            data.angular_velocity_covariance,
            data.linear_acceleration,
            data.linear_acceleration_covariance,
        );
        Self::bind(data.name, data.frame_id, views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let handle = ImuSensorHandle::default();
        assert_eq!(handle.state(), HandleState::Empty);
        assert_eq!(handle.name(), "");
        assert_eq!(handle.frame_id(), "");
    }

    #[test]
    fn test_empty_getters_name_their_field() {
        let handle = ImuSensorHandle::default();

        assert_eq!(
            handle.orientation().unwrap_err(),
            HandleError::InvalidReference { field: ImuField::Orientation }
        );
        assert_eq!(
            handle.linear_acceleration_covariance().unwrap_err(),
            HandleError::InvalidReference {
                field: ImuField::LinearAccelerationCovariance
            }
        );
        assert!(handle.snapshot().is_err());
    }

    #[test]
    fn test_first_missing_field_reported() {
        let buffers = ImuBuffers::new();
        let data = ImuSensorData {
            angular_velocity: None,
            linear_acceleration: None,
            ..buffers.data("imu", "")
        };

        let err = ImuSensorHandle::from_data(&data).unwrap_err();
        assert_eq!(
            err,
            HandleError::InvalidArgument { field: ImuField::AngularVelocity }
        );
    }

    #[test]
    fn test_empty_frame_id_allowed() {
        let buffers = ImuBuffers::new();
        let handle = ImuSensorHandle::from_data(&buffers.data("imu", "")).unwrap();
        assert!(handle.is_bound());
        assert_eq!(handle.frame_id(), "");
    }

    #[test]
    fn test_try_from_moves_identity() {
        let buffers = ImuBuffers::new();
        let handle = ImuSensorHandle::try_from(buffers.data("imu_1", "imu_link")).unwrap();
        assert_eq!(handle.name(), "imu_1");
        assert_eq!(handle.frame_id(), "imu_link");
        assert!(handle.orientation().unwrap().ptr_eq(&buffers.orientation));
    }

    #[test]
    fn test_snapshot_copies_current_values() {
        let buffers = ImuBuffers::new();
        let handle = buffers.handle("imu", "base_link");

        buffers.linear_acceleration.store([0.0, 0.0, 9.81]);
        let sample = handle.snapshot().unwrap();
        assert_eq!(sample.linear_acceleration, [0.0, 0.0, 9.81]);
        assert_eq!(sample.orientation, [0.0, 0.0, 0.0, 1.0]);

        buffers.linear_acceleration.store([1.0, 0.0, 9.81]);
        assert_eq!(sample.linear_acceleration, [0.0, 0.0, 9.81]);
    }
}
