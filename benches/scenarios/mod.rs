//! Real-world scenario benchmarks.
//!
//! These benchmarks model the engine's actual load: single voices, and the
//! whole renderer with a burst of plucks over the pad.

mod graph;
mod voices;

pub use graph::bench_graph;
pub use voices::bench_voices;
