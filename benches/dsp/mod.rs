//! Benchmarks for low-level DSP primitives.

mod analyser;
mod compressor;
mod envelope;
mod filter;
mod oscillator;

pub use analyser::bench_analyser;
pub use compressor::bench_compressor;
pub use envelope::bench_envelope;
pub use filter::bench_filter;
pub use oscillator::bench_oscillator;
