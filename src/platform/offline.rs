use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use parking_lot::Mutex;
use rtrb::Producer;

use crate::{
    engine::renderer::GraphRenderer,
    error::{EngineError, Result},
    platform::{AudioPlatform, CaptureHandle, DenialReason, OutputConfig, Permission},
};

/// What the offline microphone does when asked for.
#[derive(Debug, Clone)]
pub enum CaptureScript {
    Deny(DenialReason),
    /// Grant, and feed these samples into the graph.
    Grant(Vec<f32>),
}

/// Deterministic backend: nothing plays until [`OfflineDevice::render`] pulls
/// frames.
pub struct OfflinePlatform {
    config: Option<OutputConfig>,
    capture: CaptureScript,
    device: OfflineDevice,
    capture_requests: usize,
    last_capture: Option<Arc<AtomicBool>>,
    output_fails: bool,
    rejected: Option<GraphRenderer>,
}

impl OfflinePlatform {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            config: Some(OutputConfig {
                sample_rate,
                channels: 1,
            }),
            capture: CaptureScript::Deny(DenialReason::NoDevice),
            device: OfflineDevice::default(),
            capture_requests: 0,
            last_capture: None,
            output_fails: false,
            rejected: None,
        }
    }

    /// A platform with no output device at all.
    pub fn unsupported() -> Self {
        Self {
            config: None,
            ..Self::new(48_000.0)
        }
    }

    /// A device that reports a config but refuses to start its stream.
    pub fn with_failing_output(mut self) -> Self {
        self.output_fails = true;
        self
    }

    /// After a refused stream start: whether the analysis side of the
    /// rejected graph's tap has shut down.
    pub fn rejected_tap_closed(&self) -> Option<bool> {
        self.rejected.as_ref().map(GraphRenderer::tap_closed)
    }

    pub fn with_capture(mut self, script: CaptureScript) -> Self {
        self.capture = script;
        self
    }

    /// Handle for pulling audio out of the running graph.
    pub fn device(&self) -> OfflineDevice {
        self.device.clone()
    }

    pub fn capture_requests(&self) -> usize {
        self.capture_requests
    }

    /// Whether the most recently granted capture stream has been stopped.
    pub fn last_capture_stopped(&self) -> Option<bool> {
        self.last_capture
            .as_ref()
            .map(|stopped| stopped.load(Ordering::Acquire))
    }
}

impl AudioPlatform for OfflinePlatform {
    type Output = OfflineOutput;
    type Capture = OfflineCapture;

    fn output_config(&mut self) -> Result<OutputConfig> {
        self.config.ok_or_else(|| {
            EngineError::UnsupportedEnvironment("offline platform has no output device".into())
        })
    }

    fn start_output(&mut self, _config: &OutputConfig, renderer: GraphRenderer) -> Result<OfflineOutput> {
        if self.output_fails {
            self.rejected = Some(renderer);
            return Err(EngineError::UnsupportedEnvironment(
                "offline output failed to start".into(),
            ));
        }
        *self.device.renderer.lock() = Some(renderer);
        Ok(OfflineOutput {
            device: self.device.clone(),
        })
    }

    fn request_capture(&mut self, _sample_rate: f32, mut sink: Producer<f32>) -> Permission<OfflineCapture> {
        self.capture_requests += 1;
        match &self.capture {
            CaptureScript::Deny(reason) => Permission::Denied(reason.clone()),
            CaptureScript::Grant(samples) => {
                for &sample in samples {
                    if sink.push(sample).is_err() {
                        break;
                    }
                }
                let stopped = Arc::new(AtomicBool::new(false));
                self.last_capture = Some(Arc::clone(&stopped));
                Permission::Granted(OfflineCapture { stopped })
            }
        }
    }
}

/// Pull-based stand-in for an output device.
#[derive(Clone, Default)]
pub struct OfflineDevice {
    renderer: Arc<Mutex<Option<GraphRenderer>>>,
}

impl OfflineDevice {
    pub fn is_running(&self) -> bool {
        self.renderer.lock().is_some()
    }

    /// Render `frames` of mono output. Silence when no stream is running.
    pub fn render(&self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        if let Some(renderer) = self.renderer.lock().as_mut() {
            renderer.render(&mut out);
        }
        out
    }

    /// Inspect the renderer between blocks.
    pub fn with_renderer<R>(&self, f: impl FnOnce(&GraphRenderer) -> R) -> Option<R> {
        self.renderer.lock().as_ref().map(f)
    }
}

/// Dropping the output detaches the renderer, like closing a stream.
pub struct OfflineOutput {
    device: OfflineDevice,
}

impl Drop for OfflineOutput {
    fn drop(&mut self) {
        self.device.renderer.lock().take();
    }
}

pub struct OfflineCapture {
    stopped: Arc<AtomicBool>,
}

impl CaptureHandle for OfflineCapture {
    fn stop(&mut self) {
        self.stopped.store(true, Ordering::Release);
    }
}
