//! # Index-Based IMU Handle
//!
//! Stores a [`SlotId`] instead of a borrow, so it can be held across
//! backend reallocation and fails cleanly once its slot is gone.

use std::borrow::Cow;

use super::{ImuBuffers, ImuSensorHandle};
use crate::error::{HandleError, HandleResult};
use crate::memory::{SlotArena, SlotId};

/// An owned, `'static` handle that names a slot in the backend's arena.
///
/// Resolve it once per cycle to get a borrowed [`ImuSensorHandle`]; the
/// resolved handle borrows this handle's name and frame, so resolution does
/// not allocate or log. If the
/// backend removed the sensor (or reused the slot for another one) since
/// the id was issued, resolution fails with [`HandleError::StaleSlot`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexedImuHandle {
    name: String,
    frame_id: String,
    slot: SlotId,
}

impl IndexedImuHandle {
    /// Creates a handle for the buffers stored at `slot`.
    #[must_use]
    pub fn new(name: impl Into<String>, frame_id: impl Into<String>, slot: SlotId) -> Self {
        Self {
            name: name.into(),
            frame_id: frame_id.into(),
            slot,
        }
    }

    /// Returns the sensor name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the reference frame.
    #[inline]
    #[must_use]
    pub fn frame_id(&self) -> &str {
        &self.frame_id
    }

    /// Returns the slot this handle points at.
    #[inline]
    #[must_use]
    pub const fn slot(&self) -> SlotId {
        self.slot
    }

    /// Borrows the buffers from `arena` as a bound handle.
    ///
    /// # Errors
    ///
    /// Returns [`HandleError::StaleSlot`] if the slot no longer holds the
    /// buffers this handle was issued for.
    #[inline]
    pub fn resolve<'a>(
        &'a self,
        arena: &'a SlotArena<ImuBuffers>,
    ) -> HandleResult<ImuSensorHandle<'a>> {
        let buffers = arena
            .get(self.slot)
            .ok_or(HandleError::StaleSlot { slot: self.slot })?;
        Ok(ImuSensorHandle::from_buffers(
            Cow::Borrowed(&self.name),
            Cow::Borrowed(&self.frame_id),
            buffers,
        ))
    }
}
