//! # Sensor Handles
//!
//! Read-only handles binding a sensor's identity (name, frame) to the
//! buffers its backend owns.
//!
//! ## Lifecycle
//!
//! ```text
//!   Default::default()           from_data / new / TryFrom
//!          │                                │
//!          ▼                                ▼
//!      ┌───────┐                       ┌───────┐
//!      │ Empty │    (no transition)    │ Bound │  terminal
//!      └───────┘                       └───────┘
//!   getters → InvalidReference      getters → live views
//! ```

mod field;
mod imu;
mod imu_buffers;
mod indexed;

pub use field::ImuField;
pub use imu::{HandleState, ImuSensorData, ImuSensorHandle};
pub use imu_buffers::{ImuBuffers, ImuSample};
pub use indexed::IndexedImuHandle;
