//! # Handle Read Benchmark
//!
//! REQUIREMENTS:
//! - One control cycle reads all six buffers of every IMU
//! - No allocation, no lock on the read path
//!
//! Run with: `cargo bench --package kestrel_core`

// Benchmarks don't need docs
#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use kestrel_core::{ImuBuffers, ImuSample, ImuSensorHandle, IndexedImuHandle, SlotArena};

/// Benchmark: read one field through a bound handle.
fn bench_single_getter(c: &mut Criterion) {
    let buffers = ImuBuffers::new();
    let handle = buffers.handle("imu", "imu_link");

    c.bench_function("angular_velocity_load", |b| {
        b.iter(|| black_box(handle.angular_velocity().map(|v| v.load())));
    });
}

/// Benchmark: full per-cycle read of N sensors.
fn bench_cycle_read(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_read");

    for count in [1usize, 8, 64] {
        let storage: Vec<ImuBuffers> = (0..count).map(|_| ImuBuffers::new()).collect();
        let handles: Vec<ImuSensorHandle<'_>> = storage
            .iter()
            .enumerate()
            .map(|(i, buffers)| buffers.handle(format!("imu_{i}"), "base_link"))
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(count), &handles, |b, handles| {
            b.iter(|| {
                for handle in handles {
                    black_box(handle.snapshot().ok());
                }
            });
        });
    }

    group.finish();
}

/// Benchmark: backend publish of a complete sample.
fn bench_publish(c: &mut Criterion) {
    let buffers = ImuBuffers::new();
    let sample = ImuSample {
        linear_acceleration: [0.0, 0.0, 9.81],
        ..ImuSample::IDENTITY
    };

    c.bench_function("publish_sample", |b| {
        b.iter(|| buffers.publish(black_box(&sample)));
    });
}

/// Benchmark: resolving an index-based handle each cycle.
fn bench_indexed_resolve(c: &mut Criterion) {
    let mut arena = SlotArena::with_capacity(16);
    let Some(slot) = arena.insert(ImuBuffers::new()) else {
        return;
    };
    let indexed = IndexedImuHandle::new("imu", "imu_link", slot);

    c.bench_function("indexed_resolve", |b| {
        b.iter(|| black_box(indexed.resolve(&arena).is_ok()));
    });
}

criterion_group!(
    benches,
    bench_single_getter,
    bench_cycle_read,
    bench_publish,
    bench_indexed_resolve,
);
criterion_main!(benches);
