//! Benchmarks for the spectrum analyser.

use std::hint::black_box;

use aurora_synth::{dsp::analyser::Analyser, AnalyserConfig};
use criterion::{BenchmarkId, Criterion};

pub fn bench_analyser(c: &mut Criterion) {
    let mut group = c.benchmark_group("dsp/analyser");

    for &fft_size in &[512usize, 1024, 2048] {
        let mut analyser = Analyser::new(AnalyserConfig {
            fft_size,
            ..AnalyserConfig::default()
        });
        let input: Vec<f32> = (0..fft_size)
            .map(|i| (i as f32 * 0.0576).sin())
            .collect();
        analyser.push_samples(&input);

        // One published frame: window, FFT, smoothing, dB mapping
        group.bench_with_input(BenchmarkId::new("analyse", fft_size), &fft_size, |b, _| {
            b.iter(|| black_box(analyser.analyse()))
        });
    }

    group.finish();
}
