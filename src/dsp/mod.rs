//! Low-level DSP primitives used by the higher level graph nodes.
//!
//! These components stay focused on the signal-processing math so the graph
//! layer can handle scheduling and wiring.

/// Windowed FFT analysis producing time/frequency snapshots.
pub mod analyser;
/// Soft-knee dynamics leveler.
pub mod compressor;
/// Ramp math and scheduled parameter timelines.
pub mod envelope;
/// Lowpass state-variable filter.
pub mod filter;
/// Oscillator waveforms.
pub mod oscillator;

pub use analyser::{AnalysisSnapshot, Analyser};
pub use envelope::{exponential_ramp, linear_ramp, ParamTimeline};
