//! Criterion benchmarks for twinosc-dco
//!
//! Run with: cargo bench -p twinosc-dco
#![allow(missing_docs)]

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use twinosc_dco::{
    Corrector, DualOscillator, KernelTables, OscillatorSettings, Shape, WaveShape, shared_tables,
};

const SAMPLE_RATE: f32 = 48000.0;
const BLOCK_SIZES: &[usize] = &[64, 256, 1024];

fn bench_kernel_design(c: &mut Criterion) {
    c.bench_function("KernelTables/new", |b| b.iter(|| black_box(KernelTables::new())));
}

fn bench_corrector(c: &mut Criterion) {
    let mut group = c.benchmark_group("Corrector");

    for (name, shape) in [
        ("Saw", Shape::Saw),
        ("Pulse", Shape::Pulse),
        ("Triangle", Shape::Triangle),
    ] {
        for &block_size in BLOCK_SIZES {
            let mut corrector = Corrector::new(shape, shared_tables());
            let increment = 0.03f32;
            let mut phase = 0.0f32;

            group.bench_with_input(
                BenchmarkId::new(name, block_size),
                &block_size,
                |b, &size| {
                    b.iter(|| {
                        let mut sum = 0.0f32;
                        for _ in 0..size {
                            phase += increment;
                            corrector.detect_master(phase, increment, 0.5, 0.5);
                            if phase >= 1.0 {
                                phase -= 1.0;
                            }
                            sum += corrector.render(phase, 0.5);
                        }
                        black_box(sum)
                    })
                },
            );
        }
    }

    group.finish();
}

fn bench_dual_oscillator(c: &mut Criterion) {
    let mut group = c.benchmark_group("DualOscillator");

    let configs = [
        ("Saw", WaveShape::SAW, false, 0.0),
        ("SawPulseSync", WaveShape::SAW_PULSE, true, 0.0),
        ("TriangleXmod", WaveShape::TRIANGLE, false, 12.0),
    ];

    for (name, shape, hard_sync, cross_mod) in configs {
        for &block_size in BLOCK_SIZES {
            let mut dco = DualOscillator::new(SAMPLE_RATE, 1);
            dco.set_note(48.0);
            dco.set_osc1(OscillatorSettings {
                shape,
                ..OscillatorSettings::default()
            });
            dco.set_osc2(OscillatorSettings {
                shape,
                coarse: 7.0,
                ..OscillatorSettings::default()
            });
            dco.set_hard_sync(hard_sync);
            dco.set_cross_mod(cross_mod);
            let mut buffer = vec![0.0f32; block_size];

            group.bench_with_input(
                BenchmarkId::new(name, block_size),
                &block_size,
                |b, _| {
                    b.iter(|| {
                        dco.process_block(&mut buffer);
                        black_box(buffer[0])
                    })
                },
            );
        }
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_kernel_design,
    bench_corrector,
    bench_dual_oscillator
);
criterion_main!(benches);
