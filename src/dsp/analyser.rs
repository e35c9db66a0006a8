//! Short-time spectrum analysis of the mixed signal.
//!
//! The analyser keeps a rolling window of the most recent `fft_size` samples.
//! Each call to [`Analyser::analyse`] produces an [`AnalysisSnapshot`]: the raw
//! window as time-domain samples, and one smoothed, normalized magnitude per
//! frequency bin.

use std::f32::consts::TAU;
use std::sync::Arc;

use rustfft::{num_complex::Complex, Fft, FftPlanner};

use crate::config::AnalyserConfig;

/// Read-only view of the analysed signal.
///
/// `time_domain` holds `fft_size` samples in [-1, 1], oldest first.
/// `frequency` holds `fft_size / 2` magnitudes in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisSnapshot {
    time_domain: Vec<f32>,
    frequency: Vec<f32>,
}

impl AnalysisSnapshot {
    /// All-zero snapshot, used before anything has been analysed.
    pub fn silent(fft_size: usize) -> Self {
        Self {
            time_domain: vec![0.0; fft_size],
            frequency: vec![0.0; fft_size / 2],
        }
    }

    pub fn time_domain(&self) -> &[f32] {
        &self.time_domain
    }

    pub fn frequency_magnitudes(&self) -> &[f32] {
        &self.frequency
    }

    pub fn bin_count(&self) -> usize {
        self.frequency.len()
    }
}

/// Blackman window coefficients.
fn blackman(size: usize) -> Vec<f32> {
    const A0: f32 = 0.42;
    const A1: f32 = 0.5;
    const A2: f32 = 0.08;

    (0..size)
        .map(|i| {
            let x = i as f32 / size as f32;
            A0 - A1 * (TAU * x).cos() + A2 * (2.0 * TAU * x).cos()
        })
        .collect()
}

pub struct Analyser {
    config: AnalyserConfig,
    fft: Arc<dyn Fft<f32>>,
    window: Vec<f32>,
    /// Circular history of the last `fft_size` input samples
    history: Vec<f32>,
    write_pos: usize,
    scratch: Vec<Complex<f32>>,
    fft_scratch: Vec<Complex<f32>>,
    /// Smoothed linear magnitudes carried between frames
    smoothed: Vec<f32>,
}

impl Analyser {
    pub fn new(config: AnalyserConfig) -> Self {
        let size = config.fft_size;
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(size);
        let fft_scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            config,
            fft,
            window: blackman(size),
            history: vec![0.0; size],
            write_pos: 0,
            scratch: vec![Complex::new(0.0, 0.0); size],
            fft_scratch,
            smoothed: vec![0.0; size / 2],
        }
    }

    pub fn config(&self) -> &AnalyserConfig {
        &self.config
    }

    pub fn push_samples(&mut self, samples: &[f32]) {
        let size = self.history.len();
        for &s in samples {
            self.history[self.write_pos] = s;
            self.write_pos = (self.write_pos + 1) % size;
        }
    }

    /// Run one analysis frame over the current window.
    ///
    /// Smoothing state advances on every call, so consecutive frames blend
    /// rather than jump.
    pub fn analyse(&mut self) -> AnalysisSnapshot {
        let size = self.history.len();

        let time_domain: Vec<f32> = (0..size)
            .map(|i| self.history[(self.write_pos + i) % size].clamp(-1.0, 1.0))
            .collect();

        for (i, slot) in self.scratch.iter_mut().enumerate() {
            *slot = Complex::new(time_domain[i] * self.window[i], 0.0);
        }
        self.fft
            .process_with_scratch(&mut self.scratch, &mut self.fft_scratch);

        let tau = self.config.smoothing;
        let norm = 1.0 / size as f32;
        let min_db = self.config.min_decibels;
        let range = self.config.max_decibels - min_db;

        let frequency = self
            .smoothed
            .iter_mut()
            .zip(self.scratch.iter())
            .map(|(smoothed, bin)| {
                let magnitude = bin.norm() * norm;
                let next = tau * *smoothed + (1.0 - tau) * magnitude;
                *smoothed = if next.is_finite() { next } else { 0.0 };

                if *smoothed <= 0.0 {
                    return 0.0;
                }
                let db = 20.0 * smoothed.log10();
                ((db - min_db) / range).clamp(0.0, 1.0)
            })
            .collect();

        AnalysisSnapshot {
            time_domain,
            frequency,
        }
    }

    pub fn reset(&mut self) {
        self.history.fill(0.0);
        self.smoothed.fill(0.0);
        self.write_pos = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;

    const SAMPLE_RATE: f32 = 48_000.0;

    fn analyser() -> Analyser {
        Analyser::new(AnalyserConfig::default())
    }

    fn argmax(values: &[f32]) -> usize {
        values
            .iter()
            .enumerate()
            .fold((0, f32::MIN), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
            .0
    }

    #[test]
    fn silence_gives_zero_snapshot() {
        let mut analyser = analyser();
        analyser.push_samples(&[0.0; 1024]);
        let snapshot = analyser.analyse();

        assert_eq!(snapshot, AnalysisSnapshot::silent(1024));
        assert_eq!(snapshot.bin_count(), 512);
    }

    #[test]
    fn sine_peaks_in_its_bin() {
        let mut analyser = analyser();
        // bin 40 of a 1024-point transform at 48 kHz
        let freq = 40.0 * SAMPLE_RATE / 1024.0;
        let mut buffer = vec![0.0f32; 1024];
        OscillatorBlock::sine().render(&mut buffer, freq, SAMPLE_RATE);
        analyser.push_samples(&buffer);

        let snapshot = analyser.analyse();
        let peak = argmax(snapshot.frequency_magnitudes());
        assert_eq!(peak, 40);
        assert!(snapshot.frequency_magnitudes()[40] > 0.5);
        assert!(snapshot
            .frequency_magnitudes()
            .iter()
            .all(|m| (0.0..=1.0).contains(m)));
    }

    #[test]
    fn time_domain_is_ordered_oldest_first() {
        let mut analyser = analyser();
        let ramp: Vec<f32> = (0..1500).map(|i| i as f32 / 2000.0).collect();
        analyser.push_samples(&ramp);

        let snapshot = analyser.analyse();
        let td = snapshot.time_domain();
        assert_eq!(td.len(), 1024);
        assert!((td[0] - 476.0 / 2000.0).abs() < 1e-6);
        assert!((td[1023] - 1499.0 / 2000.0).abs() < 1e-6);
    }

    #[test]
    fn time_domain_is_clamped() {
        let mut analyser = analyser();
        analyser.push_samples(&[3.0; 1024]);
        assert!(analyser.analyse().time_domain().iter().all(|&s| s == 1.0));
    }

    #[test]
    fn smoothing_decays_instead_of_dropping() {
        let mut analyser = analyser();
        let freq = 40.0 * SAMPLE_RATE / 1024.0;
        let mut buffer = vec![0.0f32; 1024];
        OscillatorBlock::sine().render(&mut buffer, freq, SAMPLE_RATE);
        analyser.push_samples(&buffer);
        let loud = analyser.analyse().frequency_magnitudes()[40];

        analyser.push_samples(&[0.0; 1024]);
        let after = analyser.analyse().frequency_magnitudes()[40];

        assert!(after > 0.0, "smoothed magnitude should linger after silence");
        assert!(after < loud);
    }
}
