//! Benchmarks for the mic-path compressor.

use std::hint::black_box;

use aurora_synth::dsp::compressor::Compressor;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_compressor(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/compressor");

    for &size in BLOCK_SIZES {
        // Loud enough to sit in the knee
        let input: Vec<f32> = (0..size)
            .map(|i| 0.5 * (i as f32 * 0.05).sin())
            .collect();

        let mut comp = Compressor::default();
        let mut buffer = input.clone();
        group.bench_with_input(BenchmarkId::new("default", size), &size, |b, _| {
            b.iter(|| {
                buffer.copy_from_slice(&input);
                comp.render(black_box(&mut buffer), black_box(48_000.0));
            })
        });
    }

    group.finish();
}
