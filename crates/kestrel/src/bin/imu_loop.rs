//! # IMU Control Loop Demo
//!
//! Runs a simulated IMU backend and a control loop reading it through
//! handles, in lockstep on two threads.
//!
//! ## Usage
//!
//! ```bash
//! imu_loop --config crates/kestrel/config/imu_sim.toml --cycles 400 --realtime
//! ```

use std::process::ExitCode;

use kestrel::{
    run_lockstep, BackendConfig, BackendError, CycleReport, LockstepConfig, SimulatedImuBackend,
};

struct Args {
    config: Option<String>,
    cycles: u64,
    realtime: bool,
    help: bool,
    /// Problems found while parsing, printed before running.
    warnings: Vec<String>,
}

fn parse_args(args: &[String]) -> Args {
    // Simple parsing, no external deps
    let mut parsed = Args {
        config: None,
        cycles: 200,
        realtime: false,
        help: false,
        warnings: Vec::new(),
    };

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" | "-c" => {
                if i + 1 < args.len() {
                    parsed.config = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--cycles" | "-n" => {
                if i + 1 < args.len() {
                    match args[i + 1].parse() {
                        Ok(cycles) => parsed.cycles = cycles,
                        Err(_) => parsed.warnings.push(format!(
                            "ignoring invalid --cycles value: {} (using {})",
                            args[i + 1],
                            parsed.cycles
                        )),
                    }
                    i += 1;
                }
            }
            "--realtime" | "-r" => parsed.realtime = true,
            "--help" | "-h" => parsed.help = true,
            other => parsed
                .warnings
                .push(format!("ignoring unknown argument: {other}")),
        }
        i += 1;
    }

    parsed
}

fn run(args: &Args) -> Result<(), BackendError> {
    let config = match &args.config {
        Some(path) => BackendConfig::load(path)?,
        None => BackendConfig::default(),
    };

    let backend = SimulatedImuBackend::new(&config)?;
    let names: Vec<String> = backend
        .indexed_handles()
        .iter()
        .map(|h| h.name().to_string())
        .collect();
    let options = LockstepConfig {
        realtime: args.realtime,
        ..LockstepConfig::from_backend(&config, args.cycles)
    };

    println!("KESTREL imu_loop");
    println!(
        "  sensors: {}   rate: {} Hz   cycles: {}   realtime: {}",
        backend.sensor_count(),
        config.control_rate_hz,
        options.cycles,
        options.realtime
    );
    println!();

    let mut last: Option<CycleReport> = None;
    let completed = run_lockstep(&backend, &options, |report| match &mut last {
        Some(kept) => kept.clone_from(report),
        None => last = Some(report.clone()),
    })?;

    let Some(last) = last else {
        println!("no cycles run");
        return Ok(());
    };

    println!("{:<16} {:>10} {:>12} {:>10} {:>12}", "sensor", "yaw", "yaw_rate", "tilt", "orient_var");
    for estimate in &last.estimates {
        let name = names.get(estimate.sensor).map_or("?", String::as_str);
        println!(
            "{:<16} {:>10.4} {:>12.4} {:>10.4} {:>12.2e}",
            name,
            estimate.yaw,
            estimate.yaw_rate,
            estimate.tilt,
            estimate.orientation_variance
        );
    }
    println!();
    println!(
        "cycles: {}   backend updates: {}",
        completed,
        backend.update_count()
    );

    Ok(())
}

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let args = parse_args(&args);

    if args.help {
        println!("Usage: imu_loop [--config PATH] [--cycles N] [--realtime]");
        return ExitCode::SUCCESS;
    }
    for warning in &args.warnings {
        eprintln!("imu_loop: {warning}");
    }

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("imu_loop: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let args: Vec<String> = args.iter().map(|a| (*a).to_string()).collect();
        parse_args(&args)
    }

    #[test]
    fn test_flags_parsed() {
        let args = parse(&["imu_loop", "-c", "sim.toml", "--cycles", "50", "-r"]);
        assert_eq!(args.config.as_deref(), Some("sim.toml"));
        assert_eq!(args.cycles, 50);
        assert!(args.realtime);
        assert!(args.warnings.is_empty());
    }

    #[test]
    fn test_invalid_cycles_warns() {
        let args = parse(&["imu_loop", "--cycles", "abc"]);
        assert_eq!(args.cycles, 200);
        assert_eq!(args.warnings.len(), 1);
        assert!(args.warnings[0].contains("--cycles"));
        assert!(args.warnings[0].contains("abc"));
    }

    #[test]
    fn test_unknown_argument_warns() {
        let args = parse(&["imu_loop", "--fast", "-h"]);
        assert!(args.help);
        assert_eq!(args.warnings, vec!["ignoring unknown argument: --fast".to_string()]);
    }
}
