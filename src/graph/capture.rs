use rtrb::Consumer;

use crate::graph::node::{GraphNode, RenderCtx};

/*
Live Input Source
=================

Reads microphone samples that the capture stream pushes into a lock-free
ring. The capture device and the output device run on separate clocks, so
the ring is either a little ahead or a little behind:

  ahead   samples wait in the ring until the next block reads them
  behind  the node renders silence for the missing samples (an underrun)

Underruns are counted, never logged from the audio thread.
*/

pub struct CaptureNode {
    samples: Consumer<f32>,
    underruns: u64,
}

impl CaptureNode {
    pub fn new(samples: Consumer<f32>) -> Self {
        Self {
            samples,
            underruns: 0,
        }
    }

    /// Samples rendered as silence because the ring ran dry.
    pub fn underruns(&self) -> u64 {
        self.underruns
    }
}

impl GraphNode for CaptureNode {
    fn render_block(&mut self, out: &mut [f32], _ctx: &RenderCtx) {
        for sample in out.iter_mut() {
            *sample = match self.samples.pop() {
                Ok(value) => value,
                Err(_) => {
                    self.underruns += 1;
                    0.0
                }
            };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rtrb::RingBuffer;

    #[test]
    fn reads_ring_then_pads_with_silence() {
        let (mut producer, consumer) = RingBuffer::<f32>::new(16);
        for value in [0.1, 0.2, 0.3] {
            producer.push(value).unwrap();
        }

        let mut node = CaptureNode::new(consumer);
        let mut buffer = vec![9.0f32; 5];
        node.render_block(&mut buffer, &RenderCtx::new(48_000.0, 0.0));

        assert_eq!(buffer, vec![0.1, 0.2, 0.3, 0.0, 0.0]);
        assert_eq!(node.underruns(), 2);
    }
}
