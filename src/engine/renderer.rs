//! Audio-side half of the live graph.

use rtrb::{Consumer, Producer};

use crate::{
    engine::{
        clock::{Clock, LevelControl},
        message::{GraphCommand, MicChain},
    },
    graph::node::{GraphNode, RenderCtx},
    voices::{PadPartial, PluckVoice},
    MAX_BLOCK_SIZE,
};

/*
Graph Renderer
==============

Owned by the audio callback. Everything the control side wants changed
arrives as a GraphCommand and is applied at the top of the next block.

  plucks ──┐
  pad ─────┼──(+)──→ tap ──→ master level ──→ output
  mic ─────┘           │
                       └──→ analysis ring

The tap sits before the master level, so what the visuals see does not
change with volume. Nodes that report inactive after a block are dropped
right there; nothing outside the renderer keeps them alive.

A pluck is stamped with the clock on the control thread. If it lands after
its start time was already rendered, it is moved to the start of the block
that picks it up so the attack is still heard.

The tap never blocks: if the analysis thread falls behind, the rest of the
block is dropped and counted.
*/

pub struct GraphRenderer {
    sample_rate: f32,
    commands: Consumer<GraphCommand>,
    tap: Producer<f32>,
    level: LevelControl,
    clock: Clock,
    voices: Vec<PluckVoice>,
    pads: Vec<PadPartial>,
    capture: Option<MicChain>,
    mix_buffer: Vec<f32>,
    node_buffer: Vec<f32>,
    dropped_tap_samples: u64,
}

impl GraphRenderer {
    pub(crate) fn new(
        commands: Consumer<GraphCommand>,
        tap: Producer<f32>,
        level: LevelControl,
        clock: Clock,
    ) -> Self {
        Self {
            sample_rate: clock.sample_rate(),
            commands,
            tap,
            level,
            clock,
            voices: Vec::with_capacity(64),
            pads: Vec::with_capacity(8),
            capture: None,
            mix_buffer: vec![0.0; MAX_BLOCK_SIZE],
            node_buffer: vec![0.0; MAX_BLOCK_SIZE],
            dropped_tap_samples: 0,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    pub fn voices(&self) -> &[PluckVoice] {
        &self.voices
    }

    pub fn pad_partials(&self) -> &[PadPartial] {
        &self.pads
    }

    pub fn has_capture(&self) -> bool {
        self.capture.is_some()
    }

    /// Tap samples dropped because the analysis ring was full.
    pub fn dropped_tap_samples(&self) -> u64 {
        self.dropped_tap_samples
    }

    /// Whether the analysis end of the tap has been dropped.
    pub fn tap_closed(&self) -> bool {
        self.tap.is_abandoned()
    }

    /// Render mono output into `out`, any length.
    pub fn render(&mut self, out: &mut [f32]) {
        for chunk in out.chunks_mut(MAX_BLOCK_SIZE) {
            self.render_block(chunk);
        }
    }

    /// Render into an interleaved device buffer, duplicating mono to every
    /// channel.
    pub fn render_interleaved(&mut self, data: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        let total_frames = data.len() / channels;
        let mut frames_written = 0;

        while frames_written < total_frames {
            let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);

            let mut block = std::mem::take(&mut self.mix_buffer);
            self.render_block(&mut block[..frames_to_render]);

            let out_off = frames_written * channels;
            for (i, &s) in block[..frames_to_render].iter().enumerate() {
                for ch in 0..channels {
                    data[out_off + i * channels + ch] = s;
                }
            }
            self.mix_buffer = block;

            frames_written += frames_to_render;
        }
    }

    fn render_block(&mut self, block: &mut [f32]) {
        let ctx = RenderCtx::new(self.sample_rate, self.clock.now());
        self.apply_commands(ctx.time);

        block.fill(0.0);
        let scratch = &mut self.node_buffer[..block.len()];
        mix_nodes(&mut self.voices, block, scratch, &ctx);
        mix_nodes(&mut self.pads, block, scratch, &ctx);
        if let Some(mic) = self.capture.as_mut() {
            mix_nodes(std::slice::from_mut(mic), block, scratch, &ctx);
        }

        self.voices.retain(|voice| voice.is_active());
        self.pads.retain(|partial| partial.is_active());

        for (i, &sample) in block.iter().enumerate() {
            if self.tap.push(sample).is_err() {
                self.dropped_tap_samples += (block.len() - i) as u64;
                break;
            }
        }

        let gain = self.level.get();
        for sample in block.iter_mut() {
            *sample *= gain;
        }

        self.clock.advance(block.len());
    }

    fn apply_commands(&mut self, now: f64) {
        while let Ok(command) = self.commands.pop() {
            match command {
                GraphCommand::AddVoice(mut voice) => {
                    if voice.start_time() < now {
                        voice.reschedule(now);
                    }
                    self.voices.push(voice);
                }
                GraphCommand::AddPad { partials, .. } => self.pads.extend(partials),
                GraphCommand::ReleasePad { id, at } => {
                    for partial in self.pads.iter_mut().filter(|p| p.pad() == id) {
                        partial.release(at);
                    }
                }
                GraphCommand::AttachCapture(chain) => self.capture = Some(chain),
                GraphCommand::DetachCapture => self.capture = None,
            }
        }
    }
}

fn mix_nodes<N: GraphNode>(nodes: &mut [N], mix: &mut [f32], scratch: &mut [f32], ctx: &RenderCtx) {
    for node in nodes.iter_mut() {
        scratch.fill(0.0);
        node.render_block(scratch, ctx);
        for (m, s) in mix.iter_mut().zip(scratch.iter()) {
            *m += *s;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        graph::{capture::CaptureNode, compressor::CompressorNode, extensions::NodeExt},
        voices::{pad_partials, AmbientPad, PadId},
    };
    use rtrb::RingBuffer;

    const SAMPLE_RATE: f32 = 48_000.0;

    struct Rig {
        renderer: GraphRenderer,
        commands: Producer<GraphCommand>,
        tap: Consumer<f32>,
        level: LevelControl,
        clock: Clock,
    }

    fn rig(tap_capacity: usize) -> Rig {
        let (commands, command_rx) = RingBuffer::new(16);
        let (tap_tx, tap) = RingBuffer::new(tap_capacity);
        let level = LevelControl::new(1.0);
        let clock = Clock::new(SAMPLE_RATE);
        let renderer = GraphRenderer::new(command_rx, tap_tx, level.clone(), clock.clone());
        Rig {
            renderer,
            commands,
            tap,
            level,
            clock,
        }
    }

    fn pad_id() -> PadId {
        let mut pad = AmbientPad::new();
        let mut id = None;
        pad.start(0.0, |pad_id, _| {
            id = Some(pad_id);
            Ok(())
        })
        .unwrap();
        id.unwrap()
    }

    #[test]
    fn silent_graph_advances_clock() {
        let mut rig = rig(4_096);
        let mut out = vec![1.0f32; 3_000];
        rig.renderer.render(&mut out);

        assert!(out.iter().all(|&s| s == 0.0));
        assert_eq!(rig.clock.frames(), 3_000);
        assert_eq!(rig.tap.slots(), 3_000);
    }

    #[test]
    fn voice_is_dropped_after_it_finishes() {
        let mut rig = rig(48_000);
        let voice = PluckVoice::new(440.0, 0.0).unwrap();
        assert!(rig.commands.push(GraphCommand::AddVoice(voice)).is_ok());

        let mut out = vec![0.0f32; 512];
        rig.renderer.render(&mut out);
        assert_eq!(rig.renderer.voices().len(), 1);
        assert!(out.iter().any(|&s| s.abs() > 0.01));

        // 0.45 s
        let mut rest = vec![0.0f32; 21_600];
        rig.renderer.render(&mut rest);
        assert!(rig.renderer.voices().is_empty());
    }

    #[test]
    fn late_voice_starts_with_its_attack() {
        let mut rig = rig(48_000);
        let mut out = vec![0.0f32; 1_024];
        rig.renderer.render(&mut out);
        let block_start = rig.clock.now();

        // stamped before the block that picks it up
        let voice = PluckVoice::new(440.0, 0.0).unwrap();
        assert!(rig.commands.push(GraphCommand::AddVoice(voice)).is_ok());
        rig.renderer.render(&mut out);

        let voice = &rig.renderer.voices()[0];
        assert!((voice.start_time() - block_start).abs() < 1e-12);
        // the first 1 ms stays well below the 0.6 peak
        assert!(out[..48].iter().all(|&s| s.abs() < 0.15));
        assert!(out.iter().any(|&s| s.abs() > 0.1));
    }

    #[test]
    fn tap_is_taken_before_master_level() {
        let mut rig = rig(4_096);
        rig.level.set(0.0);
        let voice = PluckVoice::new(440.0, 0.0).unwrap();
        assert!(rig.commands.push(GraphCommand::AddVoice(voice)).is_ok());

        let mut out = vec![0.0f32; 1_024];
        rig.renderer.render(&mut out);

        assert!(out.iter().all(|&s| s == 0.0));
        let mut tapped = Vec::new();
        while let Ok(s) = rig.tap.pop() {
            tapped.push(s);
        }
        assert_eq!(tapped.len(), 1_024);
        assert!(tapped.iter().any(|&s| s.abs() > 0.01));
    }

    #[test]
    fn interleaved_output_duplicates_mono() {
        let mut rig = rig(4_096);
        let voice = PluckVoice::new(440.0, 0.0).unwrap();
        assert!(rig.commands.push(GraphCommand::AddVoice(voice)).is_ok());

        let mut data = vec![0.0f32; 512 * 2];
        rig.renderer.render_interleaved(&mut data, 2);

        for frame in data.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert_eq!(rig.clock.frames(), 512);
    }

    #[test]
    fn full_tap_drops_instead_of_blocking() {
        let mut rig = rig(100);
        let mut out = vec![0.0f32; 256];
        rig.renderer.render(&mut out);

        assert_eq!(rig.tap.slots(), 100);
        assert_eq!(rig.renderer.dropped_tap_samples(), 156);
    }

    #[test]
    fn release_reaches_only_its_pad() {
        let mut rig = rig(1 << 16);
        let id = pad_id();
        let other = {
            let mut pad = AmbientPad::new();
            pad.start(0.0, |_, _| Ok(())).unwrap();
            pad.stop(0.0, |_, _| Ok(())).unwrap();
            let mut next = None;
            pad.start(0.0, |pad_id, _| {
                next = Some(pad_id);
                Ok(())
            })
            .unwrap();
            next.unwrap()
        };
        assert_ne!(id, other);

        let add = |id| GraphCommand::AddPad {
            id,
            partials: pad_partials(id, 0.0),
        };
        assert!(rig.commands.push(add(id)).is_ok());
        assert!(rig.commands.push(add(other)).is_ok());
        assert!(rig
            .commands
            .push(GraphCommand::ReleasePad { id, at: 0.0 })
            .is_ok());

        let mut out = vec![0.0f32; 48_000];
        rig.renderer.render(&mut out);

        let remaining = rig.renderer.pad_partials();
        assert_eq!(remaining.len(), 3);
        assert!(remaining.iter().all(|p| p.pad() == other));
    }

    #[test]
    fn capture_attaches_and_detaches() {
        let mut rig = rig(4_096);
        let (mut mic_tx, mic_rx) = RingBuffer::new(64);
        for _ in 0..64 {
            mic_tx.push(0.25f32).unwrap();
        }
        let chain = CaptureNode::new(mic_rx).through(CompressorNode::default());
        assert!(rig.commands.push(GraphCommand::AttachCapture(chain)).is_ok());

        let mut out = vec![0.0f32; 64];
        rig.renderer.render(&mut out);
        assert!(rig.renderer.has_capture());
        assert!(out.iter().all(|&s| s > 0.0 && s <= 0.25));

        assert!(rig.commands.push(GraphCommand::DetachCapture).is_ok());
        rig.renderer.render(&mut out);
        assert!(!rig.renderer.has_capture());
        assert!(out.iter().all(|&s| s == 0.0));
    }
}
