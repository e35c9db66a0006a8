//! Benchmarks for the whole renderer, driven through the offline platform.
//!
//! Each iteration renders one block of the live graph: mixing, tap push,
//! master level and node disposal included.

use std::hint::black_box;

use aurora_synth::{
    platform::{CaptureScript, OfflinePlatform},
    Engine, EngineConfig,
};
use criterion::{BenchmarkId, Criterion};

use crate::BLOCK_SIZES;

pub fn bench_graph(c: &mut Criterion) {
    let mut group = c.benchmark_group("scenarios/graph");

    for &size in BLOCK_SIZES {
        // === IDLE ===
        // live graph with nothing sounding
        let mut engine =
            Engine::new(OfflinePlatform::new(48_000.0), EngineConfig::default()).expect("config");
        let device = engine.platform().device();
        engine.activate().expect("activate");
        device.render(48_000); // let the startup chime finish

        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, &size| {
            b.iter(|| black_box(device.render(size)))
        });

        // === BUSY ===
        // pad, microphone, and a chord of plucks, re-triggered as they expire
        let platform = OfflinePlatform::new(48_000.0)
            .with_capture(CaptureScript::Grant(vec![0.1; 16_384]));
        let mut engine = Engine::new(platform, EngineConfig::default()).expect("config");
        let device = engine.platform().device();
        engine.activate().expect("activate");
        engine.pad_start().expect("pad");
        engine.enable_capture().expect("mic");

        group.bench_with_input(BenchmarkId::new("busy", size), &size, |b, &size| {
            b.iter(|| {
                if device.with_renderer(|r| r.voices().len()).unwrap_or(0) < 4 {
                    for semitones in [0, 4, 7, 12] {
                        let _ = engine.pluck(aurora_synth::voices::equal_tempered(220.0, semitones));
                    }
                }
                black_box(device.render(size))
            })
        });
    }

    group.finish();
}
