//! Per-frame render loop for the spectrum and amplitude visuals.

use crate::{
    dsp::analyser::AnalysisSnapshot,
    visual::spectrum::{glow, rms, spectrum_bars, Bar, Glow, Gradient},
};

/// Logical size of the drawing surface plus its device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub pixel_ratio: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            pixel_ratio,
        }
    }

    /// Effective ratio; never below 1.
    pub fn dpr(&self) -> f32 {
        if self.pixel_ratio.is_finite() {
            self.pixel_ratio.max(1.0)
        } else {
            1.0
        }
    }

    /// Size of the backing surface in device pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpr = self.dpr();
        (
            (self.width.max(0.0) * dpr).floor() as u32,
            (self.height.max(0.0) * dpr).floor() as u32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Unmounted,
    Running,
    Cancelled,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct VisualFrame {
    pub tick: u64,
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub background: Gradient,
    /// Empty when there was no snapshot to draw.
    pub bars: Vec<Bar>,
    pub amplitude: f32,
    pub glow: Glow,
}

/// Frame-driven consumer of the analysis snapshot.
///
/// The host calls [`tick`](Self::tick) once per display refresh. A resize is
/// picked up on the next tick without restarting the loop, and once the loop
/// is cancelled every further tick yields nothing.
pub struct RenderLoop {
    state: LoopState,
    viewport: Viewport,
    pending_resize: Option<Viewport>,
    ticks: u64,
}

impl RenderLoop {
    pub fn new() -> Self {
        Self {
            state: LoopState::Unmounted,
            viewport: Viewport::new(0.0, 0.0, 1.0),
            pending_resize: None,
            ticks: 0,
        }
    }

    pub fn mount(&mut self, viewport: Viewport) {
        self.viewport = viewport;
        self.pending_resize = None;
        self.ticks = 0;
        self.state = LoopState::Running;
    }

    pub fn resize(&mut self, viewport: Viewport) {
        if self.state == LoopState::Running {
            self.pending_resize = Some(viewport);
        }
    }

    /// Stop the loop. Ticks after this return `None`.
    pub fn cancel(&mut self) {
        self.state = LoopState::Cancelled;
        self.pending_resize = None;
    }

    pub fn state(&self) -> LoopState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == LoopState::Running
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Frames produced since mount.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn tick(&mut self, snapshot: Option<&AnalysisSnapshot>) -> Option<VisualFrame> {
        if self.state != LoopState::Running {
            return None;
        }
        if let Some(viewport) = self.pending_resize.take() {
            self.viewport = viewport;
        }
        self.ticks += 1;

        let (width, height) = self.viewport.pixel_size();
        let pixel_ratio = self.viewport.dpr();

        let (bars, amplitude) = match snapshot {
            Some(snapshot) => (
                spectrum_bars(
                    snapshot.frequency_magnitudes(),
                    width as f32,
                    height as f32,
                    pixel_ratio,
                ),
                rms(snapshot.time_domain()),
            ),
            None => (Vec::new(), 0.0),
        };

        Some(VisualFrame {
            tick: self.ticks,
            width,
            height,
            pixel_ratio,
            background: Gradient::BACKGROUND,
            bars,
            amplitude,
            glow: glow(amplitude),
        })
    }
}

impl Default for RenderLoop {
    fn default() -> Self {
        Self::new()
    }
}
