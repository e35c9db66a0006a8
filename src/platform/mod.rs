//! Platform services the engine needs: an output stream and a microphone.
//!
//! The engine never talks to a device directly. [`AudioPlatform`] is the seam:
//! [`CpalPlatform`] drives real hardware, [`OfflinePlatform`] renders on
//! demand for tests and offline bouncing.

use rtrb::Producer;
use thiserror::Error;

use crate::{engine::renderer::GraphRenderer, error::Result};

mod cpal;
mod offline;

pub use self::cpal::{CpalCapture, CpalPlatform};
pub use self::offline::{CaptureScript, OfflineCapture, OfflineDevice, OfflineOutput, OfflinePlatform};

/// Negotiated output stream format.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputConfig {
    pub sample_rate: f32,
    pub channels: u16,
}

/// Why a microphone request did not produce a stream.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DenialReason {
    #[error("permission denied")]
    PermissionDenied,
    #[error("no input device available")]
    NoDevice,
    #[error("input device error: {0}")]
    Device(String),
}

/// Outcome of a capture request. Denial is terminal; callers do not retry.
pub enum Permission<C> {
    Granted(C),
    Denied(DenialReason),
}

/// A running capture stream.
pub trait CaptureHandle {
    /// Stop every track of the stream. Calling it twice is harmless.
    fn stop(&mut self);
}

pub trait AudioPlatform {
    /// Keeps the output stream alive; dropping it stops playback.
    type Output;
    type Capture: CaptureHandle;

    /// Probe the output device. Fails with `UnsupportedEnvironment` when
    /// there is none.
    fn output_config(&mut self) -> Result<OutputConfig>;

    /// Start the output stream and hand it the renderer.
    fn start_output(&mut self, config: &OutputConfig, renderer: GraphRenderer) -> Result<Self::Output>;

    /// Ask for the microphone. Granted streams push mono samples at
    /// `sample_rate` into `sink`.
    fn request_capture(&mut self, sample_rate: f32, sink: Producer<f32>) -> Permission<Self::Capture>;
}
