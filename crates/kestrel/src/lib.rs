//! # KESTREL
//!
//! The runtime around the handle core: a simulated IMU backend that owns
//! and updates sensor buffers, and a control loop that reads them through
//! [`kestrel_core::ImuSensorHandle`]s.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐     ┌───────────────────────┐     ┌──────────────────┐
//! │  BackendConfig   │────>│  SimulatedImuBackend  │<────│   ControlLoop    │
//! │  (TOML, startup) │     │  SlotArena<ImuBuffers>│     │  ImuSensorHandle │
//! └──────────────────┘     │  writes at sensor rate│     │  reads per cycle │
//!                          └───────────────────────┘     └──────────────────┘
//!                                      ▲                          ▲
//!                                      └──── run_lockstep ────────┘
//!                                       (crossbeam rendezvous barrier)
//! ```
//!
//! ## Modules
//!
//! - `config`: TOML backend configuration
//! - `backend`: Simulated IMU backend
//! - `control`: Control loop and lockstep runner

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod backend;
pub mod config;
pub mod control;
pub mod error;

// Re-export the core
pub use kestrel_core as core;

pub use backend::SimulatedImuBackend;
pub use config::{BackendConfig, ImuConfig, STANDARD_GRAVITY};
pub use control::{run_lockstep, ControlLoop, CycleReport, LockstepConfig, SensorEstimate};
pub use error::{BackendError, BackendResult, ConfigError, ConfigResult};
