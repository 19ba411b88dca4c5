//! # Handle Error Types
//!
//! Both construction and read failures are contract violations at the call
//! site. Nothing here is retried internally.

use thiserror::Error;

use crate::memory::SlotId;
use crate::sensor::ImuField;

/// Errors raised while binding or reading a hardware handle.
///
/// All variants are `Copy` so the read path never allocates, even on failure.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandleError {
    /// A required buffer was absent when constructing a handle.
    #[error("invalid argument: no {field} buffer supplied")]
    InvalidArgument {
        /// The buffer role that was missing.
        field: ImuField,
    },

    /// A numeric getter was called on a handle with no buffer bound.
    #[error("invalid reference: no {field} buffer bound to this handle")]
    InvalidReference {
        /// The buffer role that was requested.
        field: ImuField,
    },

    /// An index-based handle points at a slot the backend freed or reused.
    #[error("stale slot: {slot} no longer holds the sensor buffers")]
    StaleSlot {
        /// The slot that failed to resolve.
        slot: SlotId,
    },
}

/// Result type for handle operations.
pub type HandleResult<T> = Result<T, HandleError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_names_field() {
        let err = HandleError::InvalidArgument {
            field: ImuField::AngularVelocityCovariance,
        };
        let msg = err.to_string();
        assert!(msg.contains("invalid argument"));
        assert!(msg.contains("angular_velocity_covariance"));
    }

    #[test]
    fn test_invalid_reference_names_field() {
        let err = HandleError::InvalidReference {
            field: ImuField::Orientation,
        };
        assert_eq!(
            err.to_string(),
            "invalid reference: no orientation buffer bound to this handle"
        );
    }

    #[test]
    fn test_stale_slot_display() {
        let err = HandleError::StaleSlot {
            slot: SlotId::new(3, 7),
        };
        let msg = err.to_string();
        assert!(msg.contains("slot 3"));
        assert!(msg.contains("gen 7"));
    }
}
