//! Soft-knee dynamics leveler for the microphone path.

/*
Dynamics Compression
====================

A compressor turns loud passages down so the live input sits at a steady
level next to the synthesized voices.

  threshold   Level (dB) where gain reduction begins.
  knee        Width (dB) of the soft transition around the threshold.
  ratio       Input dB over threshold per output dB over threshold.
  attack      Time constant for increasing gain reduction.
  release     Time constant for backing it off.

Static curve (gain reduction in dB for input level x):

    x <= T - W/2         0
    x >= T + W/2         (x - T) * (1 - 1/R)
    otherwise            (1 - 1/R) / (2W) * (x - T + W/2)^2

Reduction is smoothed with one-pole coefficients, c = exp(-1 / (time * fs)).
The defaults mirror a typical hardware unit: -24 dB, 30 dB knee, 12:1,
3 ms attack, 250 ms release.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    pub threshold_db: f32,
    pub knee_db: f32,
    pub ratio: f32,
    pub attack: f32,
    pub release: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            threshold_db: -24.0,
            knee_db: 30.0,
            ratio: 12.0,
            attack: 0.003,
            release: 0.25,
        }
    }
}

#[inline]
pub fn amplitude_to_db(amplitude: f32) -> f32 {
    20.0 * amplitude.max(1e-10).log10()
}

#[inline]
pub fn db_to_amplitude(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

#[inline]
fn time_to_coeff(seconds: f32, sample_rate: f32) -> f32 {
    if seconds <= 0.0 {
        0.0
    } else {
        (-1.0 / (seconds * sample_rate)).exp()
    }
}

pub struct Compressor {
    settings: CompressorSettings,
    gain_reduction: f32,
    sample_rate: f32,
    attack_coeff: f32,
    release_coeff: f32,
}

impl Compressor {
    pub fn new(settings: CompressorSettings) -> Self {
        let ratio = settings.ratio.max(1.0);
        Self {
            settings: CompressorSettings { ratio, ..settings },
            gain_reduction: 0.0,
            sample_rate: 0.0,
            attack_coeff: 0.0,
            release_coeff: 0.0,
        }
    }

    pub fn settings(&self) -> &CompressorSettings {
        &self.settings
    }

    /// Current smoothed gain reduction in dB (positive = quieter).
    pub fn gain_reduction_db(&self) -> f32 {
        self.gain_reduction
    }

    fn prepare(&mut self, sample_rate: f32) {
        if self.sample_rate != sample_rate {
            self.sample_rate = sample_rate;
            self.attack_coeff = time_to_coeff(self.settings.attack, sample_rate);
            self.release_coeff = time_to_coeff(self.settings.release, sample_rate);
        }
    }

    /// Static gain reduction (dB) for an input level in dB.
    pub fn static_reduction(&self, input_db: f32) -> f32 {
        let CompressorSettings {
            threshold_db,
            knee_db,
            ratio,
            ..
        } = self.settings;
        let slope = 1.0 - 1.0 / ratio;

        if knee_db <= 0.0 {
            return (input_db - threshold_db).max(0.0) * slope;
        }

        let half_knee = knee_db / 2.0;
        if input_db <= threshold_db - half_knee {
            0.0
        } else if input_db >= threshold_db + half_knee {
            (input_db - threshold_db) * slope
        } else {
            let x = input_db - threshold_db + half_knee;
            slope / (2.0 * knee_db) * x * x
        }
    }

    #[inline]
    fn process_sample(&mut self, sample: f32) -> f32 {
        let target = self.static_reduction(amplitude_to_db(sample.abs()));
        let coeff = if target > self.gain_reduction {
            self.attack_coeff
        } else {
            self.release_coeff
        };
        self.gain_reduction = coeff * self.gain_reduction + (1.0 - coeff) * target;
        sample * db_to_amplitude(-self.gain_reduction)
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        self.prepare(sample_rate);
        for sample in buffer.iter_mut() {
            *sample = self.process_sample(*sample);
        }
    }

    pub fn reset(&mut self) {
        self.gain_reduction = 0.0;
    }
}

impl Default for Compressor {
    fn default() -> Self {
        Self::new(CompressorSettings::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_signal_passes_untouched() {
        let mut comp = Compressor::default();
        // -60 dBFS, far below the knee
        let mut buffer = vec![0.001f32; 256];
        comp.render(&mut buffer, 48_000.0);
        assert!((buffer[255] - 0.001).abs() < 1e-6);
    }

    #[test]
    fn loud_signal_is_reduced() {
        let mut comp = Compressor::default();
        let mut buffer = vec![0.9f32; 4_800];
        comp.render(&mut buffer, 48_000.0);

        let out = buffer[4_799];
        assert!(out < 0.5, "full-scale input should be leveled down, got {out}");
        assert!(out > 0.0);
    }

    #[test]
    fn knee_is_continuous() {
        let comp = Compressor::default();
        let below = comp.static_reduction(-39.0 - 1e-3);
        let edge = comp.static_reduction(-39.0);
        let top_in = comp.static_reduction(-9.0 - 1e-3);
        let top_out = comp.static_reduction(-9.0 + 1e-3);

        assert!((below - edge).abs() < 1e-3);
        assert!((top_in - top_out).abs() < 1e-2);
    }

    #[test]
    fn ratio_below_one_is_clamped() {
        let comp = Compressor::new(CompressorSettings {
            ratio: 0.5,
            ..CompressorSettings::default()
        });
        assert_eq!(comp.settings().ratio, 1.0);
        assert_eq!(comp.static_reduction(0.0), 0.0);
    }
}
