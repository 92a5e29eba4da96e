//! Criterion benchmarks for twinosc-core primitives
//!
//! Run with: cargo bench -p twinosc-core
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use twinosc_core::{AlignmentDelay, NoiseSource, XorShift32, pitch_to_hz};

const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn bench_alignment_delay(c: &mut Criterion) {
    let mut group = c.benchmark_group("AlignmentDelay");

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("push_f32", block_size),
            &block_size,
            |b, &size| {
                let mut delay: AlignmentDelay<f32, 16> = AlignmentDelay::new();
                b.iter(|| {
                    for i in 0..size {
                        black_box(delay.push(black_box(i as f32)));
                    }
                });
            },
        );
    }

    group.finish();
}

fn bench_noise(c: &mut Criterion) {
    let mut group = c.benchmark_group("XorShift32");

    for &block_size in BLOCK_SIZES {
        group.bench_with_input(
            BenchmarkId::new("next_f32", block_size),
            &block_size,
            |b, &size| {
                let mut rng = XorShift32::new(1);
                b.iter(|| {
                    let mut sum = 0.0f32;
                    for _ in 0..size {
                        sum += rng.next_f32();
                    }
                    black_box(sum)
                });
            },
        );
    }

    group.finish();
}

fn bench_pitch_to_hz(c: &mut Criterion) {
    c.bench_function("pitch_to_hz", |b| {
        let mut pitch = 40.0f32;
        b.iter(|| {
            pitch = if pitch > 100.0 { 40.0 } else { pitch + 0.37 };
            black_box(pitch_to_hz(black_box(pitch)))
        });
    });
}

criterion_group!(benches, bench_alignment_delay, bench_noise, bench_pitch_to_hz);
criterion_main!(benches);
