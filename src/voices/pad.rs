//! Pad voice - sustained, atmospheric drone.
//!
//! Three sawtooth partials at 110, 220 and 330 Hz, each with its own gain.
//!
//! # How It Works
//!
//! 1. Each partial starts at a near-silent 0.0001
//! 2. Exponential swell to `0.15 / (index + 1)` over 1.2 s, so upper partials
//!    sit quieter than the fundamental
//! 3. On release the gain is pinned where it is, then falls exponentially
//!    back to 0.0001 over 0.6 s
//! 4. The oscillators stop 0.65 s after the release, once the fade is done
//!
//! The partials live on the audio thread. [`AmbientPad`] is the control-side
//! half: it remembers whether a drone is sounding so start and stop stay
//! idempotent.

use tracing::info;

use crate::{
    dsp::envelope::ParamTimeline,
    error::Result,
    graph::{
        amplify::Amplify,
        envelope::EnvNode,
        extensions::NodeExt,
        node::{GraphNode, RenderCtx},
        oscillator::OscNode,
    },
};

pub const PAD_BASE_HZ: f32 = 110.0;
pub const PAD_PARTIALS: usize = 3;
pub const PAD_FLOOR: f32 = 0.0001;
pub const PAD_FADE_IN: f64 = 1.2;
pub const PAD_FADE_OUT: f64 = 0.6;
pub const PAD_STOP_AFTER: f64 = 0.65;

/// Identifies one drone so a release reaches the partials it started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PadId(u64);

pub struct PadPartial {
    pad: PadId,
    index: usize,
    chain: Amplify<OscNode, EnvNode>,
}

impl PadPartial {
    pub fn new(pad: PadId, index: usize, now: f64) -> Self {
        let frequency = PAD_BASE_HZ * (index + 1) as f32;
        let osc = OscNode::sawtooth()
            .with_frequency(frequency)
            .starting_at(now);

        let mut gain = ParamTimeline::new(PAD_FLOOR);
        gain.set_value_at(PAD_FLOOR, now)
            .exponential_ramp_to(Self::target_gain(index), now + PAD_FADE_IN);

        Self {
            pad,
            index,
            chain: osc.amplify(EnvNode::new(gain)),
        }
    }

    /// Sustain level of partial `index`.
    pub fn target_gain(index: usize) -> f32 {
        0.15 / (index + 1) as f32
    }

    pub fn pad(&self) -> PadId {
        self.pad
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn frequency(&self) -> f32 {
        self.chain.signal.frequency()
    }

    pub fn stop_time(&self) -> f64 {
        self.chain.signal.stop_time()
    }

    pub fn gain_at(&self, t: f64) -> f32 {
        self.chain.modulator.timeline().value_at(t)
    }

    /// Fade out from wherever the gain is at `at`, then stop.
    pub fn release(&mut self, at: f64) {
        self.chain
            .modulator
            .timeline_mut()
            .hold_at(at)
            .exponential_ramp_to(PAD_FLOOR, at + PAD_FADE_OUT);
        self.chain.signal.stop_at(at + PAD_STOP_AFTER);
    }
}

impl GraphNode for PadPartial {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.chain.render_block(out, ctx);
    }

    fn is_active(&self) -> bool {
        self.chain.is_active()
    }
}

/// The full set of partials for a drone starting at `now`.
pub fn pad_partials(pad: PadId, now: f64) -> Vec<PadPartial> {
    (0..PAD_PARTIALS)
        .map(|index| PadPartial::new(pad, index, now))
        .collect()
}

/// Control-side state of the ambient pad: at most one drone at a time.
#[derive(Debug, Default)]
pub struct AmbientPad {
    current: Option<PadId>,
    next_id: u64,
}

impl AmbientPad {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    pub fn current(&self) -> Option<PadId> {
        self.current
    }

    /// Start a drone unless one is already sounding.
    ///
    /// `submit` hands the partials to the graph. The pad only counts as active
    /// once it succeeds, so a failed submit leaves nothing behind.
    pub fn start<F>(&mut self, now: f64, submit: F) -> Result<()>
    where
        F: FnOnce(PadId, Vec<PadPartial>) -> Result<()>,
    {
        if self.current.is_some() {
            return Ok(());
        }

        let id = PadId(self.next_id);
        submit(id, pad_partials(id, now))?;
        self.next_id += 1;
        self.current = Some(id);
        info!(pad = id.0, "ambient pad started");
        Ok(())
    }

    /// Release the sounding drone, if any.
    pub fn stop<F>(&mut self, now: f64, submit: F) -> Result<()>
    where
        F: FnOnce(PadId, f64) -> Result<()>,
    {
        let Some(id) = self.current else {
            return Ok(());
        };

        submit(id, now)?;
        self.current = None;
        info!(pad = id.0, "ambient pad released");
        Ok(())
    }
}
