use crate::dsp::oscillator::{OscillatorBlock, OscillatorWaveform};
use crate::graph::node::{GraphNode, RenderCtx};

/*
Scheduled Oscillator
====================

The sound source of every voice. Each OscNode has a fixed frequency and a
lifetime on the graph clock:

    start ──────── sound ──────── stop
      │                             │
  silent before               silent after, node reports inactive

Waveforms used here:

  Triangle  soft, odd harmonics falling off as 1/n². The pluck voice.
  Sawtooth  bright, every harmonic at 1/n. The pad drone partials.
  Sine      pure fundamental. Used in tests.
  Square    hollow, odd harmonics at 1/n.

Start and stop are sample-accurate: a block that straddles either boundary
renders silence on the outside and tone on the inside. The phase only
advances while the oscillator is sounding, so every note begins at phase 0.

Once the block end passes `stop`, `is_active()` turns false and the renderer
drops the node. Nothing else has to cancel it.
*/

pub struct OscNode {
    osc: OscillatorBlock,
    frequency: f32,
    start: f64,
    stop: f64,
    finished: bool,
}

impl OscNode {
    fn new(osc: OscillatorBlock) -> Self {
        Self {
            osc,
            frequency: 440.0,
            start: 0.0,
            stop: f64::INFINITY,
            finished: false,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorBlock::sine())
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorBlock::triangle())
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorBlock::sawtooth())
    }

    pub fn square() -> Self {
        Self::new(OscillatorBlock::square())
    }

    pub fn with_frequency(mut self, freq: f32) -> Self {
        self.frequency = freq;
        self
    }

    /// Begin sounding at absolute time `start`.
    pub fn starting_at(mut self, start: f64) -> Self {
        self.start = start;
        self
    }

    /// Schedule (or reschedule) the stop time.
    pub fn stop_at(&mut self, stop: f64) {
        self.stop = stop;
    }

    /// Move start and stop `delta` seconds later.
    pub fn shift(&mut self, delta: f64) {
        self.start += delta;
        self.stop += delta;
    }

    pub fn frequency(&self) -> f32 {
        self.frequency
    }

    pub fn waveform(&self) -> OscillatorWaveform {
        self.osc.waveform()
    }

    pub fn start_time(&self) -> f64 {
        self.start
    }

    pub fn stop_time(&self) -> f64 {
        self.stop
    }
}

impl GraphNode for OscNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            let t = ctx.time_at(i);
            *sample = if t >= self.start && t < self.stop {
                self.osc.next_sample(self.frequency, ctx.sample_rate)
            } else {
                0.0
            };
        }

        if ctx.block_end(out.len()) >= self.stop {
            self.finished = true;
        }
    }

    fn is_active(&self) -> bool {
        !self.finished
    }
}
