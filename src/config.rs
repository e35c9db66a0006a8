//! Engine configuration.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};

/// Spectrum analyser settings.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalyserConfig {
    /// Transform size; the snapshot exposes `fft_size / 2` frequency bins.
    pub fft_size: usize,
    /// Weight of the previous frame when smoothing magnitudes (0 = none).
    pub smoothing: f32,
    /// Level mapped to 0.0 in the normalized spectrum.
    pub min_decibels: f32,
    /// Level mapped to 1.0 in the normalized spectrum.
    pub max_decibels: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            smoothing: 0.85,
            min_decibels: -100.0,
            max_decibels: -30.0,
        }
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    /// Master level applied when the graph is first activated.
    pub initial_level: f32,
    pub analyser: AnalyserConfig,
    /// Slots in the control → audio command ring.
    pub command_capacity: usize,
    /// Microphone samples buffered between the capture stream and the graph.
    pub capture_capacity: usize,
    /// Mixed samples buffered between the graph and the analysis thread.
    pub tap_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        let analyser = AnalyserConfig::default();
        Self {
            initial_level: 0.8,
            analyser,
            command_capacity: 256,
            capture_capacity: 16_384,
            tap_capacity: analyser.fft_size * 16,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        let fft_size = self.analyser.fft_size;
        if !fft_size.is_power_of_two() || !(32..=32_768).contains(&fft_size) {
            return Err(EngineError::InvalidConfig(format!(
                "fft_size must be a power of two in 32..=32768, got {fft_size}"
            )));
        }
        if !(0.0..=1.0).contains(&self.analyser.smoothing) {
            return Err(EngineError::InvalidConfig(format!(
                "smoothing must be in [0, 1], got {}",
                self.analyser.smoothing
            )));
        }
        if self.analyser.min_decibels >= self.analyser.max_decibels {
            return Err(EngineError::InvalidConfig(format!(
                "min_decibels ({}) must be below max_decibels ({})",
                self.analyser.min_decibels, self.analyser.max_decibels
            )));
        }
        if self.command_capacity == 0 || self.capture_capacity == 0 || self.tap_capacity == 0 {
            return Err(EngineError::InvalidConfig(
                "ring capacities must be non-zero".into(),
            ));
        }
        Ok(())
    }
}
