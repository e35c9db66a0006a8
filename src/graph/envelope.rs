use crate::{
    dsp::envelope::ParamTimeline,
    graph::node::{GraphNode, RenderCtx},
};

/// Renders a [`ParamTimeline`] as a per-sample control signal.
///
/// On its own it is a gain curve; pair it with `.amplify()` to shape a source.
pub struct EnvNode {
    timeline: ParamTimeline,
}

impl EnvNode {
    pub fn new(timeline: ParamTimeline) -> Self {
        Self { timeline }
    }

    pub fn timeline(&self) -> &ParamTimeline {
        &self.timeline
    }

    pub fn timeline_mut(&mut self) -> &mut ParamTimeline {
        &mut self.timeline
    }
}

impl GraphNode for EnvNode {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        for (i, sample) in out.iter_mut().enumerate() {
            *sample = self.timeline.value_at(ctx.time_at(i));
        }
    }
}
