use rtrb::RingBuffer;
use tracing::{info, warn};

use crate::{
    engine::message::{CommandSender, GraphCommand},
    error::{EngineError, Result},
    graph::{capture::CaptureNode, compressor::CompressorNode, extensions::NodeExt},
    platform::{AudioPlatform, CaptureHandle, Permission},
};

/*
Microphone Link
===============

    capture stream ──→ ring ──→ CaptureNode ──→ CompressorNode ──→ tap

`enable` asks the platform once. A grant wires the chain into the graph; a
denial is reported as CaptureUnavailable and leaves the graph untouched.
There is no retry: asking again is the caller's decision.

`disable` queues the detach first and only then stops the stream. If the
detach cannot be queued the link stays enabled, stream included, so the
caller can retry; a stopped stream never leaves its chain in the graph.
*/

pub struct MicLink<C: CaptureHandle> {
    stream: Option<C>,
    capacity: usize,
}

impl<C: CaptureHandle> MicLink<C> {
    pub fn new(capacity: usize) -> Self {
        Self {
            stream: None,
            capacity,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.stream.is_some()
    }

    /// Returns `Ok(true)` when a new link was attached, `Ok(false)` when one
    /// was already live.
    pub fn enable<P>(&mut self, platform: &mut P, sample_rate: f32, commands: &CommandSender) -> Result<bool>
    where
        P: AudioPlatform<Capture = C>,
    {
        if self.stream.is_some() {
            return Ok(false);
        }

        let (sink, source) = RingBuffer::new(self.capacity);
        match platform.request_capture(sample_rate, sink) {
            Permission::Granted(mut stream) => {
                let chain = CaptureNode::new(source).through(CompressorNode::default());
                if let Err(err) = commands.send(GraphCommand::AttachCapture(chain)) {
                    stream.stop();
                    return Err(err);
                }
                self.stream = Some(stream);
                info!("microphone attached");
                Ok(true)
            }
            Permission::Denied(reason) => {
                warn!(%reason, "microphone permission denied or unavailable");
                Err(EngineError::CaptureUnavailable(reason.to_string()))
            }
        }
    }

    /// Detach the chain and stop the stream. No-op when already disabled.
    ///
    /// On `QueueFull` nothing changes and the link still reads enabled.
    pub fn disable(&mut self, commands: &CommandSender) -> Result<()> {
        if self.stream.is_none() {
            return Ok(());
        }

        commands.send(GraphCommand::DetachCapture)?;
        if let Some(mut stream) = self.stream.take() {
            stream.stop();
        }
        info!("microphone detached");
        Ok(())
    }
}

impl<C: CaptureHandle> Drop for MicLink<C> {
    fn drop(&mut self) {
        if let Some(stream) = self.stream.as_mut() {
            stream.stop();
        }
    }
}
