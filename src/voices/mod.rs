//! Ready-made voices built from graph nodes.
//!
//! - [`PluckVoice`]: a short triangle pluck that schedules its own end.
//! - [`PadPartial`] / [`AmbientPad`]: the three-partial sawtooth drone and
//!   the controller that keeps at most one of them sounding.
//!
//! # Example
//!
//! ```ignore
//! use aurora_synth::voices::{self, PluckVoice};
//!
//! // Card 7 of the scale that starts at A3
//! let pitch = voices::equal_tempered(220.0, 7);
//! let voice = PluckVoice::new(pitch, now)?;
//! ```

mod pad;
mod pluck;

pub use pad::{
    pad_partials, AmbientPad, PadId, PadPartial, PAD_BASE_HZ, PAD_FADE_IN, PAD_FADE_OUT,
    PAD_FLOOR, PAD_PARTIALS, PAD_STOP_AFTER,
};
pub use pluck::{
    pluck_envelope, validate_pitch, PluckVoice, PLUCK_ATTACK, PLUCK_CUTOFF, PLUCK_DECAY,
    PLUCK_FLOOR, PLUCK_LIFETIME, PLUCK_PEAK,
};

/// Twelve-tone equal temperament: `base_hz * 2^(semitones / 12)`.
#[inline]
pub fn equal_tempered(base_hz: f32, semitones: i32) -> f32 {
    base_hz * 2.0f32.powf(semitones as f32 / 12.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn octave_doubles() {
        assert!((equal_tempered(220.0, 12) - 440.0).abs() < 1e-3);
        assert!((equal_tempered(220.0, -12) - 110.0).abs() < 1e-3);
        assert_eq!(equal_tempered(220.0, 0), 220.0);
    }

    #[test]
    fn fifth_above_a3() {
        // 220 * 2^(7/12) ≈ 329.63 Hz (E4)
        assert!((equal_tempered(220.0, 7) - 329.628).abs() < 1e-2);
    }
}
