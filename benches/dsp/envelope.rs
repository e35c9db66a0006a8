//! Benchmarks for scheduled ramp timelines.

use std::hint::black_box;

use aurora_synth::dsp::envelope::ParamTimeline;
use aurora_synth::graph::{
    envelope::EnvNode,
    node::{GraphNode, RenderCtx},
};
use aurora_synth::voices::pluck_envelope;
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_envelope(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/envelope");

    for &size in BLOCK_SIZES {
        let mut buffer = vec![0.0f32; size];

        // Linear attack segment
        let mut attack = EnvNode::new(pluck_envelope(0.0));
        let ctx = RenderCtx::new(48_000.0, 0.0);
        group.bench_with_input(BenchmarkId::new("attack", size), &size, |b, _| {
            b.iter(|| {
                attack.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Exponential decay segment, powf per sample
        let mut decay = EnvNode::new(pluck_envelope(0.0));
        let ctx = RenderCtx::new(48_000.0, 0.1);
        group.bench_with_input(BenchmarkId::new("decay", size), &size, |b, _| {
            b.iter(|| {
                decay.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });

        // Past the last event: holds the final value
        let mut hold = EnvNode::new(pluck_envelope(0.0));
        let ctx = RenderCtx::new(48_000.0, 1.0);
        group.bench_with_input(BenchmarkId::new("hold", size), &size, |b, _| {
            b.iter(|| {
                hold.render_block(black_box(&mut buffer), black_box(&ctx));
            })
        });
    }

    // Rescheduling cost of a pad release
    group.bench_function("hold_and_release", |b| {
        b.iter(|| {
            let mut gain = ParamTimeline::new(0.0001);
            gain.set_value_at(0.0001, 0.0)
                .exponential_ramp_to(0.15, 1.2)
                .hold_at(black_box(0.7))
                .exponential_ramp_to(0.0001, 1.3);
            black_box(gain)
        })
    });

    group.finish();
}
