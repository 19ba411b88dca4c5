//! # State Buffers
//!
//! Fixed-size numeric storage owned by a backend, and the read-only views
//! handles hand out.
//!
//! ## The Problem
//!
//! ```text
//! Backend thread:       WRITE sensor values at sensor rate
//! Control loop thread:  READ the same values every cycle
//!
//! Copy per cycle:       wasted bandwidth, stale snapshots
//! Mutex per buffer:     lock contention on the real-time path
//! ```
//!
//! ## The Solution
//!
//! Each element is an `AtomicU64` holding the bits of an `f64`. Writers and
//! readers share the buffer by `&` reference; the borrow checker ties every
//! view to the buffer's lifetime. Element access is relaxed: there is no
//! cross-element atomicity and no ordering barrier. The scheduler running
//! the writer and the reader must supply the happens-before edge.

mod state;
mod view;

pub use state::StateBuffer;
pub use view::StateView;

/// Orientation quaternion storage, laid out `(x, y, z, w)`.
pub type Quaternion = StateBuffer<4>;

/// Three-axis vector storage, laid out `(x, y, z)`.
pub type Vector3 = StateBuffer<3>;

/// Row-major 3x3 covariance storage about `(x, y, z)`.
pub type Covariance3 = StateBuffer<9>;
