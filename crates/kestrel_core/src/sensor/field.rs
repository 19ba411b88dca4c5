//! # IMU Buffer Roles

use std::fmt;

/// The six numeric buffers an IMU handle binds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImuField {
    /// Quaternion `(x, y, z, w)`.
    Orientation,
    /// Row-major 3x3 covariance of orientation error about `(x, y, z)`.
    OrientationCovariance,
    /// Angular velocity `(x, y, z)`, rad/s by convention.
    AngularVelocity,
    /// Row-major 3x3 covariance of angular velocity.
    AngularVelocityCovariance,
    /// Linear acceleration `(x, y, z)`, m/s² by convention.
    LinearAcceleration,
    /// Row-major 3x3 covariance of linear acceleration.
    LinearAccelerationCovariance,
}

impl ImuField {
    /// All fields, in validation order.
    pub const ALL: [Self; 6] = [
        Self::Orientation,
        Self::OrientationCovariance,
        Self::AngularVelocity,
        Self::AngularVelocityCovariance,
        Self::LinearAcceleration,
        Self::LinearAccelerationCovariance,
    ];

    /// Number of `f64` elements the backend must allocate for this field.
    #[must_use]
    pub const fn element_count(self) -> usize {
        match self {
            Self::Orientation => 4,
            Self::AngularVelocity | Self::LinearAcceleration => 3,
            Self::OrientationCovariance
            | Self::AngularVelocityCovariance
            | Self::LinearAccelerationCovariance => 9,
        }
    }

    /// Returns `true` for the 3x3 covariance fields.
    #[must_use]
    pub const fn is_covariance(self) -> bool {
        self.element_count() == 9
    }

    /// Field name as used in logs and errors.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orientation => "orientation",
            Self::OrientationCovariance => "orientation_covariance",
            Self::AngularVelocity => "angular_velocity",
            Self::AngularVelocityCovariance => "angular_velocity_covariance",
            Self::LinearAcceleration => "linear_acceleration",
            Self::LinearAccelerationCovariance => "linear_acceleration_covariance",
        }
    }
}

impl fmt::Display for ImuField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_counts() {
        let total: usize = ImuField::ALL.iter().map(|f| f.element_count()).sum();
        assert_eq!(total, 4 + 9 + 3 + 9 + 3 + 9);
        assert_eq!(ImuField::Orientation.element_count(), 4);
        assert_eq!(ImuField::LinearAcceleration.element_count(), 3);
    }

    #[test]
    fn test_covariance_fields() {
        let covariances: Vec<_> = ImuField::ALL
            .into_iter()
            .filter(|f| f.is_covariance())
            .collect();
        assert_eq!(
            covariances,
            vec![
                ImuField::OrientationCovariance,
                ImuField::AngularVelocityCovariance,
                ImuField::LinearAccelerationCovariance,
            ]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(ImuField::AngularVelocity.to_string(), "angular_velocity");
    }
}
