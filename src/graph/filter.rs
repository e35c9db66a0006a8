use crate::{
    dsp::filter::SVFilter,
    graph::node::{GraphNode, RenderCtx},
};

/*
Lowpass Filter Node
===================

Passes frequencies below the cutoff and rolls off the rest at 12 dB/octave.
Every pluck runs through one at 8 kHz: the triangle wave already falls off
quickly, so the filter only trims the aliasing that a naive oscillator
leaves near Nyquist.

Cutoff (Hz):
  - 200 Hz:    Muffled, like through a wall
  - 1000 Hz:   Warm, round
  - 8000 Hz:   Open, with the top octave softened
  - 20000 Hz:  Effectively no filtering

Example usage:
  let voice = OscNode::triangle()
      .amplify(EnvNode::new(gain))
      .through(FilterNode::lowpass(8000.0));
*/

pub struct FilterNode {
    filter: SVFilter,
}

impl FilterNode {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            filter: SVFilter::lowpass(cutoff_hz),
        }
    }

    pub fn cutoff(&self) -> f32 {
        self.filter.cutoff_hz
    }
}

impl GraphNode for FilterNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.filter.render(out, ctx.sample_rate);
    }
}
