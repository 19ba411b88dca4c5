//! # Control Loop
//!
//! THE CYCLE:
//! ```text
//! Writer thread (backend)            Reader thread (control loop)
//! ┌──────────────────────────┐       ┌──────────────────────────────┐
//! │ 1. update(t) → buffers   │       │                              │
//! │ 2. send(tick) ───────────┼──────>│ 3. recv(tick)                │
//! │                          │       │ 4. read handles → report     │
//! │ 6. recv(ack) <───────────┼───────│ 5. send(ack)                 │
//! │ 7. sleep rest of period  │       │                              │
//! └──────────────────────────┘       └──────────────────────────────┘
//! ```
//!
//! The rendezvous channels order every buffer write before the reads of
//! the same cycle, and every read before the next write. The handles
//! themselves provide no such ordering.

use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::bounded;
use kestrel_core::{HandleResult, ImuSensorHandle};
use tracing::{debug, warn};

use crate::backend::SimulatedImuBackend;
use crate::config::BackendConfig;
use crate::error::BackendResult;

/// What the control loop derives from one IMU in one cycle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SensorEstimate {
    /// Position of the sensor's handle in [`ControlLoop::handles`].
    pub sensor: usize,
    /// Heading about +z, radians in `(-π, π]`.
    pub yaw: f64,
    /// Angular velocity about +z, rad/s.
    pub yaw_rate: f64,
    /// Angle between measured acceleration and +z, radians.
    pub tilt: f64,
    /// Trace of the orientation covariance.
    pub orientation_variance: f64,
}

/// Result of one control cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleReport {
    /// Zero-based cycle number.
    pub cycle: u64,
    /// One estimate per handle, in handle order.
    pub estimates: Vec<SensorEstimate>,
}

/// A consumer that reads a fixed set of IMU handles once per cycle.
///
/// The report buffer is allocated once in [`ControlLoop::new`] and reused,
/// so [`ControlLoop::step`] does not allocate.
pub struct ControlLoop<'a> {
    handles: Vec<ImuSensorHandle<'a>>,
    report: CycleReport,
    cycle: u64,
}

impl<'a> ControlLoop<'a> {
    /// Creates a loop over `handles`.
    #[must_use]
    pub fn new(handles: Vec<ImuSensorHandle<'a>>) -> Self {
        let report = CycleReport {
            cycle: 0,
            estimates: Vec::with_capacity(handles.len()),
        };
        Self {
            handles,
            report,
            cycle: 0,
        }
    }

    /// Number of completed cycles.
    #[must_use]
    pub const fn cycle(&self) -> u64 {
        self.cycle
    }

    /// The handles read each cycle.
    #[must_use]
    pub fn handles(&self) -> &[ImuSensorHandle<'a>] {
        &self.handles
    }

    /// Name of the sensor an estimate refers to.
    #[must_use]
    pub fn sensor_name(&self, sensor: usize) -> Option<&str> {
        self.handles.get(sensor).map(ImuSensorHandle::name)
    }

    /// Reads every handle once and reports the estimates.
    ///
    /// The report is overwritten by the next call.
    ///
    /// # Errors
    ///
    /// Returns [`kestrel_core::HandleError::InvalidReference`] if any handle
    /// is `Empty`. The cycle counter does not advance on failure.
    pub fn step(&mut self) -> HandleResult<&CycleReport> {
        self.report.estimates.clear();
        for (sensor, handle) in self.handles.iter().enumerate() {
            self.report.estimates.push(estimate(sensor, handle)?);
        }

        self.report.cycle = self.cycle;
        self.cycle += 1;
        Ok(&self.report)
    }
}

fn estimate(sensor: usize, handle: &ImuSensorHandle<'_>) -> HandleResult<SensorEstimate> {
    let [x, y, z, w] = handle.orientation()?.load();
    let [_, _, yaw_rate] = handle.angular_velocity()?.load();
    let [ax, ay, az] = handle.linear_acceleration()?.load();
    let covariance = handle.orientation_covariance()?.matrix();

    Ok(SensorEstimate {
        sensor,
        yaw: (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z)),
        yaw_rate,
        tilt: ax.hypot(ay).atan2(az),
        orientation_variance: covariance[0][0] + covariance[1][1] + covariance[2][2],
    })
}

/// How [`run_lockstep`] paces the writer.
#[derive(Clone, Debug)]
pub struct LockstepConfig {
    /// Cycles to run.
    pub cycles: u64,
    /// Simulated time between cycles.
    pub period: Duration,
    /// Sleep out the rest of each period instead of running flat out.
    pub realtime: bool,
}

impl LockstepConfig {
    /// Runs `cycles` cycles at the config's control rate, flat out.
    #[must_use]
    pub fn from_backend(config: &BackendConfig, cycles: u64) -> Self {
        Self {
            cycles,
            period: config.cycle_period(),
            realtime: false,
        }
    }
}

/// Runs the backend writer and a control loop reader on two threads in
/// lockstep, passing every cycle's report to `on_cycle` on the reader
/// thread. Returns the number of cycles completed.
///
/// # Errors
///
/// Returns the first handle error raised by the reader. The writer stops
/// as soon as the reader does.
#[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
pub fn run_lockstep<F>(
    backend: &SimulatedImuBackend,
    options: &LockstepConfig,
    mut on_cycle: F,
) -> BackendResult<u64>
where
    F: FnMut(&CycleReport) + Send,
{
    let mut control = ControlLoop::new(backend.handles()?);
    let (tick_tx, tick_rx) = bounded::<u64>(0);
    let (ack_tx, ack_rx) = bounded::<()>(0);
    let period = options.period;

    thread::scope(|s| {
        let writer = s.spawn(move || {
            for cycle in 0..options.cycles {
                let started = Instant::now();
                backend.update(cycle as f64 * period.as_secs_f64());

                if tick_tx.send(cycle).is_err() || ack_rx.recv().is_err() {
                    debug!(cycle, "reader stopped, writer exiting");
                    break;
                }

                if options.realtime {
                    if let Some(rest) = period.checked_sub(started.elapsed()) {
                        thread::sleep(rest);
                    }
                }
            }
        });

        let reader = s.spawn(move || -> BackendResult<u64> {
            let mut completed = 0;

            for cycle in tick_rx {
                let started = Instant::now();
                on_cycle(control.step()?);

                let elapsed = started.elapsed();
                if !period.is_zero() && elapsed > period {
                    warn!(cycle, elapsed_us = elapsed.as_micros() as u64, "control cycle overran");
                }

                completed += 1;
                if ack_tx.send(()).is_err() {
                    break;
                }
            }

            Ok(completed)
        });

        let completed = reader
            .join()
            .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
        writer
            .join()
            .unwrap_or_else(|payload| std::panic::resume_unwind(payload));
        completed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kestrel_core::{HandleError, ImuBuffers, ImuField};

    #[test]
    fn test_step_reads_live_values() {
        let buffers = ImuBuffers::new();
        let mut control = ControlLoop::new(vec![buffers.handle("imu", "imu_link")]);

        let half = 0.25f64;
        buffers.orientation.store([0.0, 0.0, half.sin(), half.cos()]);
        buffers.angular_velocity.store([0.0, 0.0, 0.3]);
        buffers.linear_acceleration.store([0.0, 0.0, 9.81]);

        let report = control.step().unwrap().clone();
        let estimate = report.estimates[0];
        assert_eq!(report.cycle, 0);
        assert_eq!(control.cycle(), 1);
        assert_eq!(control.sensor_name(estimate.sensor), Some("imu"));
        assert!((estimate.yaw - 0.5).abs() < 1e-12);
        assert_eq!(estimate.yaw_rate, 0.3);
        assert_eq!(estimate.tilt, 0.0);
    }

    #[test]
    fn test_tilt_from_sideways_gravity() {
        let buffers = ImuBuffers::new();
        buffers.linear_acceleration.store([9.81, 0.0, 0.0]);
        let mut control = ControlLoop::new(vec![buffers.handle("imu", "")]);

        let tilt = control.step().unwrap().estimates[0].tilt;
        assert!((tilt - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }

    #[test]
    fn test_report_buffer_reused() {
        let first = ImuBuffers::new();
        let second = ImuBuffers::new();
        let mut control = ControlLoop::new(vec![first.handle("a", ""), second.handle("b", "")]);

        let addr = control.step().unwrap().estimates.as_ptr();
        let report = control.step().unwrap();
        assert_eq!(report.cycle, 1);
        assert_eq!(report.estimates.len(), 2);
        assert_eq!(report.estimates.as_ptr(), addr);
        assert_eq!(report.estimates[1].sensor, 1);
    }

    #[test]
    fn test_empty_handle_fails_cycle() {
        let buffers = ImuBuffers::new();
        let mut control = ControlLoop::new(vec![
            buffers.handle("imu", ""),
            ImuSensorHandle::default(),
        ]);

        assert_eq!(
            control.step().unwrap_err(),
            HandleError::InvalidReference { field: ImuField::Orientation }
        );
        assert_eq!(control.cycle(), 0);
        assert_eq!(control.sensor_name(2), None);
    }

    #[test]
    fn test_lockstep_runs_every_cycle() {
        let backend = SimulatedImuBackend::new(&BackendConfig::default()).unwrap();
        let options = LockstepConfig {
            cycles: 25,
            period: Duration::from_millis(10),
            realtime: false,
        };

        let mut cycles = Vec::new();
        let completed = run_lockstep(&backend, &options, |report| cycles.push(report.cycle)).unwrap();
        assert_eq!(completed, 25);
        assert_eq!(backend.update_count(), 25);
        assert_eq!(cycles, (0..25).collect::<Vec<u64>>());
    }
}
