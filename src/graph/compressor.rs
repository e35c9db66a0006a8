use crate::{
    dsp::compressor::{Compressor, CompressorSettings},
    graph::node::{GraphNode, RenderCtx},
};

/// Dynamics stage for the live input path.
///
/// Leaves the signal's lifetime to its source; use it behind `.through()`.
pub struct CompressorNode {
    compressor: Compressor,
}

impl CompressorNode {
    pub fn new(settings: CompressorSettings) -> Self {
        Self {
            compressor: Compressor::new(settings),
        }
    }

    pub fn settings(&self) -> &CompressorSettings {
        self.compressor.settings()
    }

    pub fn gain_reduction_db(&self) -> f32 {
        self.compressor.gain_reduction_db()
    }
}

impl Default for CompressorNode {
    fn default() -> Self {
        Self::new(CompressorSettings::default())
    }
}

impl GraphNode for CompressorNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.compressor.render(out, ctx.sample_rate);
    }
}
