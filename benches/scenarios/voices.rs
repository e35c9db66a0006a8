//! Benchmarks for complete voice chains.

use std::hint::black_box;

use aurora_synth::graph::node::{GraphNode, RenderCtx};
use aurora_synth::voices::{AmbientPad, PluckVoice};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_voices(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/voices");
    // Inside the decay, where the exponential ramp is evaluated
    let ctx = RenderCtx::new(48_000.0, 0.05);

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // === PLUCK ===
        // triangle → timeline envelope → 8 kHz lowpass
        let mut pluck = PluckVoice::new(440.0, 0.0).expect("valid pitch");
        group.bench_with_input(BenchmarkId::new("pluck", size), &size, |b, _| {
            b.iter(|| {
                pluck.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // === PAD ===
        // three sawtooth partials mid-swell
        let mut partials = Vec::new();
        AmbientPad::new()
            .start(0.0, |_, built| {
                partials = built;
                Ok(())
            })
            .expect("pad start");
        group.bench_with_input(BenchmarkId::new("pad", size), &size, |b, _| {
            b.iter(|| {
                for partial in partials.iter_mut() {
                    partial.render_block(black_box(&mut buffer), black_box(&ctx));
                }
            })
        });
    }

    group.finish();
}
