//! The live audio graph and everything the UI layer calls into.
//!
//! [`Engine`] is the single owner of the graph. It is inert until
//! [`Engine::activate`] opens the output stream; from then on voices, the
//! pad and the microphone are added by sending [`GraphCommand`]s to the
//! renderer on the audio thread.
//!
//! ```ignore
//! use aurora_synth::{engine::Engine, platform::CpalPlatform, EngineConfig};
//!
//! let mut engine = Engine::new(CpalPlatform::new(), EngineConfig::default())?;
//! let caps = engine.activate()?;
//! caps.trigger.pluck(440.0)?;
//! let snapshot = caps.snapshots.load();
//! ```

pub mod analysis;
pub mod capture;
pub mod clock;
pub mod message;
pub mod renderer;

use std::sync::Arc;

use rtrb::RingBuffer;
use tracing::{debug, info, warn};

use self::{
    analysis::{AnalysisWorker, SnapshotHandle},
    capture::MicLink,
    clock::{Clock, LevelControl},
    message::{CommandSender, GraphCommand},
    renderer::GraphRenderer,
};
use crate::{
    config::EngineConfig,
    dsp::analyser::AnalysisSnapshot,
    error::{EngineError, Result},
    platform::{AudioPlatform, OutputConfig},
    voices::{AmbientPad, PluckVoice},
};

/// Chime played the first time the graph comes up.
pub const STARTUP_PITCH: f32 = 392.0;
/// Chime confirming the microphone is live.
pub const CAPTURE_CONFIRM_PITCH: f32 = 523.25;
/// Pitch of the explore trigger.
pub const EXPLORE_PITCH: f32 = 440.0;
/// Root of the card scale, `CARD_BASE_PITCH * 2^(idx / 12)`.
pub const CARD_BASE_PITCH: f32 = 220.0;

/// Schedules plucks on the live graph. Cloneable and usable from any thread.
#[derive(Clone)]
pub struct PluckTrigger {
    commands: CommandSender,
    clock: Clock,
}

impl PluckTrigger {
    pub fn pluck(&self, pitch: f32) -> Result<()> {
        let voice = PluckVoice::new(pitch, self.clock.now())?;
        debug!(pitch, start = voice.start_time(), "pluck scheduled");
        self.commands.send(GraphCommand::AddVoice(voice))
    }
}

/// What a visual consumer gets back from activation.
#[derive(Clone)]
pub struct Capabilities {
    pub clock: Clock,
    pub level: LevelControl,
    pub snapshots: SnapshotHandle,
    pub trigger: PluckTrigger,
}

struct LiveGraph<P: AudioPlatform> {
    capabilities: Capabilities,
    output_config: OutputConfig,
    commands: CommandSender,
    pad: AmbientPad,
    mic: MicLink<P::Capture>,
    // Field order is drop order: mic first, then the stream, then analysis.
    _output: P::Output,
    _analysis: AnalysisWorker,
}

pub struct Engine<P: AudioPlatform> {
    platform: P,
    config: EngineConfig,
    level: LevelControl,
    live: Option<LiveGraph<P>>,
}

impl<P: AudioPlatform> Engine<P> {
    pub fn new(platform: P, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            platform,
            level: LevelControl::new(config.initial_level),
            config,
            live: None,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn is_active(&self) -> bool {
        self.live.is_some()
    }

    /// Bring up the graph, or return the existing capabilities if it is
    /// already live.
    ///
    /// Either everything is built or nothing is: a failure drops whatever was
    /// created on the way and leaves the engine inactive.
    pub fn activate(&mut self) -> Result<Capabilities> {
        if let Some(live) = &self.live {
            return Ok(live.capabilities.clone());
        }

        let output_config = self.platform.output_config()?;
        let clock = Clock::new(output_config.sample_rate);

        let (command_tx, command_rx) = RingBuffer::new(self.config.command_capacity);
        let (tap_tx, tap_rx) = RingBuffer::new(self.config.tap_capacity);

        let analysis = AnalysisWorker::spawn(tap_rx, self.config.analyser)?;
        let renderer = GraphRenderer::new(command_rx, tap_tx, self.level.clone(), clock.clone());
        let output = self.platform.start_output(&output_config, renderer)?;

        let commands = CommandSender::new(command_tx);
        let capabilities = Capabilities {
            clock: clock.clone(),
            level: self.level.clone(),
            snapshots: analysis.handle(),
            trigger: PluckTrigger {
                commands: commands.clone(),
                clock,
            },
        };

        info!(
            sample_rate = output_config.sample_rate,
            channels = output_config.channels,
            level = self.level.get(),
            "audio graph activated"
        );

        if let Err(err) = capabilities.trigger.pluck(STARTUP_PITCH) {
            warn!(%err, "startup chime dropped");
        }

        self.live = Some(LiveGraph {
            capabilities: capabilities.clone(),
            output_config,
            commands,
            pad: AmbientPad::new(),
            mic: MicLink::new(self.config.capture_capacity),
            _output: output,
            _analysis: analysis,
        });

        Ok(capabilities)
    }

    pub fn capabilities(&self) -> Option<&Capabilities> {
        self.live.as_ref().map(|live| &live.capabilities)
    }

    pub fn output_config(&self) -> Option<OutputConfig> {
        self.live.as_ref().map(|live| live.output_config)
    }

    /// Set the master level, clamped to [0, 1]. Works before activation; the
    /// graph starts at whatever was set last.
    pub fn set_level(&self, level: f32) -> f32 {
        self.level.set(level)
    }

    pub fn level(&self) -> f32 {
        self.level.get()
    }

    pub fn pluck(&self, pitch: f32) -> Result<()> {
        let live = self.live.as_ref().ok_or(EngineError::Inactive)?;
        live.capabilities.trigger.pluck(pitch)
    }

    pub fn pad_start(&mut self) -> Result<()> {
        let live = self.live.as_mut().ok_or(EngineError::Inactive)?;
        let now = live.capabilities.clock.now();
        let commands = &live.commands;
        live.pad.start(now, |id, partials| {
            commands.send(GraphCommand::AddPad { id, partials })
        })
    }

    /// Release the pad. No-op when the pad, or the whole graph, is inactive.
    pub fn pad_stop(&mut self) -> Result<()> {
        let Some(live) = self.live.as_mut() else {
            return Ok(());
        };
        let now = live.capabilities.clock.now();
        let commands = &live.commands;
        live.pad
            .stop(now, |id, at| commands.send(GraphCommand::ReleasePad { id, at }))
    }

    pub fn pad_active(&self) -> bool {
        self.live.as_ref().is_some_and(|live| live.pad.is_active())
    }

    /// Attach the microphone. A fresh link is confirmed with a chime.
    pub fn enable_capture(&mut self) -> Result<()> {
        let Self { platform, live, .. } = self;
        let live = live.as_mut().ok_or(EngineError::Inactive)?;

        let sample_rate = live.output_config.sample_rate;
        if live.mic.enable(platform, sample_rate, &live.commands)? {
            if let Err(err) = live.capabilities.trigger.pluck(CAPTURE_CONFIRM_PITCH) {
                warn!(%err, "capture chime dropped");
            }
        }
        Ok(())
    }

    /// Detach the microphone. No-op when it is not attached.
    pub fn disable_capture(&mut self) -> Result<()> {
        match self.live.as_mut() {
            Some(live) => live.mic.disable(&live.commands),
            None => Ok(()),
        }
    }

    pub fn capture_enabled(&self) -> bool {
        self.live.as_ref().is_some_and(|live| live.mic.is_enabled())
    }

    /// Latest analysis of the mix. All zeros while the graph is inactive.
    pub fn snapshot(&self) -> Arc<AnalysisSnapshot> {
        match &self.live {
            Some(live) => live.capabilities.snapshots.load(),
            None => Arc::new(AnalysisSnapshot::silent(self.config.analyser.fft_size)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OfflinePlatform;

    fn engine() -> Engine<OfflinePlatform> {
        Engine::new(OfflinePlatform::new(48_000.0), EngineConfig::default()).unwrap()
    }

    #[test]
    fn rejects_invalid_config() {
        let config = EngineConfig {
            command_capacity: 0,
            ..EngineConfig::default()
        };
        assert!(matches!(
            Engine::new(OfflinePlatform::new(48_000.0), config),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn operations_before_activation() {
        let mut engine = engine();

        assert_eq!(engine.pluck(440.0), Err(EngineError::Inactive));
        assert_eq!(engine.pad_start(), Err(EngineError::Inactive));
        assert_eq!(engine.enable_capture(), Err(EngineError::Inactive));
        assert_eq!(engine.pad_stop(), Ok(()));
        assert_eq!(engine.disable_capture(), Ok(()));
        assert!(!engine.pad_active());
        assert!(!engine.capture_enabled());
        assert!(engine.capabilities().is_none());

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.bin_count(), 512);
        assert!(snapshot.time_domain().iter().all(|&s| s == 0.0));
    }

    #[test]
    fn activation_is_idempotent() {
        let mut engine = engine();
        let device = engine.platform().device();

        let first = engine.activate().unwrap();
        device.render(128);
        let second = engine.activate().unwrap();
        device.render(128);

        // one startup chime, not two
        assert_eq!(device.with_renderer(|r| r.voices().len()), Some(1));
        assert_eq!(first.clock.frames(), second.clock.frames());
    }

    #[test]
    fn invalid_pitch_has_no_side_effects() {
        let mut engine = engine();
        let device = engine.platform().device();
        engine.activate().unwrap();
        device.render(128);

        assert_eq!(engine.pluck(-1.0), Err(EngineError::InvalidPitch(-1.0)));
        device.render(128);
        assert_eq!(device.with_renderer(|r| r.voices().len()), Some(1));
    }

    #[test]
    fn level_set_before_activation_is_kept() {
        let mut engine = engine();
        assert_eq!(engine.set_level(0.3), 0.3);
        let caps = engine.activate().unwrap();
        assert_eq!(caps.level.get(), 0.3);

        caps.level.set(0.6);
        assert_eq!(engine.level(), 0.6);
    }
}
