//! # Memory Management
//!
//! Pre-allocated slot storage for backend buffers.
//!
//! ## Design Philosophy
//!
//! The backend allocates every sensor slot once at startup. Afterwards:
//! - No heap allocations on insert or remove
//! - Handles refer to slots by index + generation
//! - A freed or reused slot is detected instead of read as garbage

mod slots;

pub use slots::{SlotArena, SlotId};
