pub mod config; // Engine and analyser settings
pub mod dsp;
pub mod engine; // Live graph lifecycle and control surface
pub mod error;
pub mod graph; // Composable audio graph nodes
pub mod platform; // Output and microphone backends
pub mod visual; // Spectrum and amplitude render loop
pub mod voices;

pub use config::{AnalyserConfig, EngineConfig};
pub use dsp::analyser::AnalysisSnapshot;
pub use engine::{Capabilities, Engine, PluckTrigger};
pub use error::{EngineError, Result};

pub const MAX_BLOCK_SIZE: usize = 2048;
pub(crate) const MIN_TIME: f32 = 1.0 / 48_000.0;
