//! Pluck voice - percussive, self-terminating note.
//!
//! Every trigger in the engine (start-up chime, card taps, the explore button,
//! the microphone confirmation) is one of these.
//!
//! # How It Works
//!
//! 1. Triangle wave for a soft, bell-like tone
//! 2. Linear rise to 0.6 over 5 ms so the onset does not click
//! 3. Exponential decay to 0.0008 by 350 ms
//! 4. Oscillator stops itself at 400 ms, after the tail is inaudible
//! 5. Lowpass at 8 kHz trims the top of the naive waveform
//!
//! Once the oscillator stops, the whole chain reports inactive and the
//! renderer drops it. No one holds a handle that could cancel it.

use crate::{
    dsp::envelope::ParamTimeline,
    error::{EngineError, Result},
    graph::{
        amplify::Amplify,
        envelope::EnvNode,
        extensions::NodeExt,
        filter::FilterNode,
        node::{GraphNode, RenderCtx},
        oscillator::OscNode,
        through::Through,
    },
};

pub const PLUCK_PEAK: f32 = 0.6;
pub const PLUCK_ATTACK: f64 = 0.005;
pub const PLUCK_FLOOR: f32 = 0.0008;
pub const PLUCK_DECAY: f64 = 0.35;
pub const PLUCK_LIFETIME: f64 = 0.4;
pub const PLUCK_CUTOFF: f32 = 8_000.0;

/// Reject pitches no oscillator can play.
pub fn validate_pitch(pitch: f32) -> Result<f32> {
    if pitch.is_finite() && pitch > 0.0 {
        Ok(pitch)
    } else {
        Err(EngineError::InvalidPitch(pitch))
    }
}

/// Gain curve of a pluck starting at `now`.
pub fn pluck_envelope(now: f64) -> ParamTimeline {
    let mut gain = ParamTimeline::new(0.0);
    gain.set_value_at(0.0, now)
        .linear_ramp_to(PLUCK_PEAK, now + PLUCK_ATTACK)
        .exponential_ramp_to(PLUCK_FLOOR, now + PLUCK_DECAY);
    gain
}

pub struct PluckVoice {
    chain: Through<Amplify<OscNode, EnvNode>, FilterNode>,
}

impl PluckVoice {
    pub fn new(pitch: f32, now: f64) -> Result<Self> {
        let pitch = validate_pitch(pitch)?;

        let mut osc = OscNode::triangle().with_frequency(pitch).starting_at(now);
        osc.stop_at(now + PLUCK_LIFETIME);

        let chain = osc
            .amplify(EnvNode::new(pluck_envelope(now)))
            .through(FilterNode::lowpass(PLUCK_CUTOFF));

        Ok(Self { chain })
    }

    pub fn frequency(&self) -> f32 {
        self.chain.source().signal.frequency()
    }

    pub fn start_time(&self) -> f64 {
        self.chain.source().signal.start_time()
    }

    pub fn stop_time(&self) -> f64 {
        self.chain.source().signal.stop_time()
    }

    pub fn cutoff(&self) -> f32 {
        self.chain.filter().cutoff()
    }

    pub fn envelope(&self) -> &ParamTimeline {
        self.chain.source().modulator.timeline()
    }

    /// Move the whole note so it starts at `start`, keeping its shape.
    ///
    /// Used when a voice reaches the graph after its start time has already
    /// been rendered; otherwise the attack would be skipped.
    pub fn reschedule(&mut self, start: f64) {
        let delta = start - self.start_time();
        let source = self.chain.source_mut();
        source.signal.shift(delta);
        source.modulator.timeline_mut().shift(delta);
    }

    /// Envelope gain at absolute time `t`.
    pub fn gain_at(&self, t: f64) -> f32 {
        self.envelope().value_at(t)
    }
}

impl GraphNode for PluckVoice {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.chain.render_block(out, ctx);
    }

    fn is_active(&self) -> bool {
        self.chain.is_active()
    }
}
