//! TUI module for aurora
//!
//! Lays out the transport bar, spectrum canvas, waveform scope and help line.

mod spectrum;
mod transport;
mod waveform;

use aurora_synth::visual::{Viewport, VisualFrame};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use spectrum::render_spectrum;
use transport::render_transport;
use waveform::render_waveform;

/// Page background the translucent colours are composited over.
pub const BASE: (u8, u8, u8) = (5, 8, 22);

/// Braille cells are 2 dots wide and 4 dots tall.
const DOTS_X: f32 = 2.0;
const DOTS_Y: f32 = 4.0;

/// Engine state shown in the transport bar.
pub struct Status<'a> {
    pub running: bool,
    pub mic: bool,
    pub pad: bool,
    pub level: f32,
    pub sample_rate: Option<f32>,
    pub notice: Option<&'a str>,
}

pub struct View<'a> {
    pub frame: Option<&'a VisualFrame>,
    pub scope: &'a [f32],
    pub status: Status<'a>,
}

fn layout(area: Rect) -> [Rect; 4] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Min(6),    // Spectrum
            Constraint::Length(8), // Waveform
            Constraint::Length(1), // Help bar
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2], chunks[3]]
}

/// Logical size of the spectrum canvas for a terminal of `area`, in braille
/// dots.
pub fn spectrum_viewport(area: Rect, pixel_ratio: f32) -> Viewport {
    let inner = Block::default().borders(Borders::ALL).inner(layout(area)[1]);
    Viewport::new(
        inner.width as f32 * DOTS_X,
        inner.height as f32 * DOTS_Y,
        pixel_ratio,
    )
}

pub fn rgb((r, g, b): (u8, u8, u8)) -> Color {
    Color::Rgb(r, g, b)
}

pub fn render(frame: &mut Frame, view: &View) {
    let [transport, spectrum, scope, help] = layout(frame.area());

    render_transport(frame, transport, &view.status, view.frame);
    render_spectrum(frame, spectrum, view.frame);
    render_waveform(frame, scope, view.scope, view.frame);

    let help_line = Paragraph::new(
        " [S] Start  [Space] Explore  [1-9] Cards  [M] Mic  [P] Pad  [+/-] Volume  [Q] Quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help_line, help);
}
