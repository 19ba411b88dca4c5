//! # KESTREL Core
//!
//! Non-owning hardware handles for real-time control loops:
//! - A backend (driver or simulator) owns fixed-size state buffers
//! - The control loop reads them every cycle through a handle
//! - No copy, no allocation, no lock on the read path
//!
//! ## Ownership Rules
//!
//! 1. **The backend owns the memory** - handles only borrow it
//! 2. **Handles are read-only** - no API writes through a handle
//! 3. **Handles cannot dangle** - the borrow lives at most as long as the buffers
//!
//! ```text
//!   Backend (sensor rate)                 Control loop (cycle rate)
//!  ┌──────────────────────┐             ┌──────────────────────────┐
//!  │ ImuBuffers           │   borrow    │ ImuSensorHandle<'a>      │
//!  │  orientation    [4]  │<────────────│  orientation()     view  │
//!  │  orient. cov    [9]  │<────────────│  ...               view  │
//!  │  angular vel.   [3]  │<────────────│                          │
//!  │  ...                 │             │                          │
//!  └──────────────────────┘             └──────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust
//! use kestrel_core::{ImuBuffers, ImuSample};
//!
//! let buffers = ImuBuffers::new();
//! let handle = buffers.handle("base_imu", "base_link");
//!
//! buffers.publish(&ImuSample {
//!     linear_acceleration: [0.0, 0.0, 9.81],
//!     ..ImuSample::default()
//! });
//!
//! let accel = handle.linear_acceleration()?.load();
//! assert_eq!(accel, [0.0, 0.0, 9.81]);
//! # Ok::<(), kestrel_core::HandleError>(())
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod buffer;
pub mod error;
pub mod memory;
pub mod sensor;

pub use buffer::{Covariance3, Quaternion, StateBuffer, StateView, Vector3};
pub use error::{HandleError, HandleResult};
pub use memory::{SlotArena, SlotId};
pub use sensor::{
    HandleState, ImuBuffers, ImuField, ImuSample, ImuSensorData, ImuSensorHandle,
    IndexedImuHandle,
};
