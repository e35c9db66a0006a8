use std::sync::Arc;

use parking_lot::Mutex;
use rtrb::Producer;
use tracing::warn;

use crate::{
    error::{EngineError, Result},
    graph::{capture::CaptureNode, compressor::CompressorNode, through::Through},
    voices::{PadId, PadPartial, PluckVoice},
};

/// Live input chain: captured samples leveled by the compressor.
pub type MicChain = Through<CaptureNode, CompressorNode>;

/// Changes to the live graph, applied by the renderer at the next block.
pub enum GraphCommand {
    AddVoice(PluckVoice),
    AddPad { id: PadId, partials: Vec<PadPartial> },
    ReleasePad { id: PadId, at: f64 },
    AttachCapture(MicChain),
    DetachCapture,
}

impl GraphCommand {
    fn name(&self) -> &'static str {
        match self {
            GraphCommand::AddVoice(_) => "add_voice",
            GraphCommand::AddPad { .. } => "add_pad",
            GraphCommand::ReleasePad { .. } => "release_pad",
            GraphCommand::AttachCapture(_) => "attach_capture",
            GraphCommand::DetachCapture => "detach_capture",
        }
    }
}

/// Control-side end of the command ring.
///
/// Cloneable so the engine and the trigger handed to visual consumers can
/// both feed the same single-producer ring.
#[derive(Clone)]
pub struct CommandSender {
    producer: Arc<Mutex<Producer<GraphCommand>>>,
}

impl CommandSender {
    pub(crate) fn new(producer: Producer<GraphCommand>) -> Self {
        Self {
            producer: Arc::new(Mutex::new(producer)),
        }
    }

    pub fn send(&self, command: GraphCommand) -> Result<()> {
        let name = command.name();
        self.producer.lock().push(command).map_err(|_| {
            warn!(command = name, "graph command queue full, dropping command");
            EngineError::QueueFull
        })
    }
}
