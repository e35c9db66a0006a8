use crate::graph::node::{GraphNode, RenderCtx};

/*
Serial Signal Chain (Through)
=============================

Through connects two nodes in series, passing the output of the first (source)
into the second (effect). This is the fundamental building block for creating
signal processing chains like: oscillator → envelope → filter.

How It Works:
-------------
1. Render the source into the output buffer
2. Pass that buffer through the effect (in-place processing)

  Source renders:  [0.5, 0.8, -0.3, 0.9, ...]
  Effect processes in-place (e.g., filter)
  Final output:    [0.4, 0.6, -0.2, 0.7, ...]  (filtered result)

This is different from Amplify (which multiplies) or Mix (which blends).
Through passes audio through a processor that transforms it.

Common Use Cases:
-----------------

1. Subtractive Synthesis Chain:
   The classic synth signal path.

     let voice = OscNode::triangle()
         .amplify(EnvNode::new(pluck_gain))
         .through(FilterNode::lowpass(8000.0));

   - Triangle → envelope (shape volume) → filter (shape tone)

2. Leveling a Live Input:
   The microphone path runs the captured signal through the compressor.

     let mic = CaptureNode::new(samples)
         .through(CompressorNode::default());

Through vs Amplify:
-------------------
- Through: Serial processing (source → effect → output)
- Amplify: Multiplication (signal × modulator)

Signal Flow Diagram:
--------------------
  Through: [Source] ──→ [Effect] ──→ output

  Amplify: [Signal] ──┬──→ (×) ──→ output
           [Mod]    ──┘

Choose Through when audio flows from one processor to the next.
*/

pub struct Through<S, F> {
    source: S,
    filter: F,
}

impl<S, F> Through<S, F> {
    pub fn new(source: S, filter: F) -> Self {
        Self { source, filter }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub fn filter(&self) -> &F {
        &self.filter
    }
}

impl<S: GraphNode, F: GraphNode> GraphNode for Through<S, F> {
    fn render_block(&mut self, out: &mut [f32], ctx: &RenderCtx) {
        self.source.render_block(out, ctx);
        self.filter.render_block(out, ctx);
    }

    /// Processors have no life of their own; the chain ends with its source.
    fn is_active(&self) -> bool {
        self.source.is_active()
    }
}
