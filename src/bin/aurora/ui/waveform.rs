//! Time-domain scope
//!
//! Traces the analysed window on a braille canvas, one segment per dot
//! column. The trace brightens with the glow intensity of the current frame.

use aurora_synth::visual::{Rgba, VisualFrame};
use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Line},
        Block, Borders,
    },
    Frame,
};

use super::{rgb, BASE};

/// Trace alpha at zero intensity, so a quiet signal is still visible.
const TRACE_FLOOR: f32 = 0.35;

fn trace_color(visual: Option<&VisualFrame>) -> Rgba {
    let intensity = visual.map_or(0.0, |v| v.glow.intensity);
    Rgba {
        r: 0,
        g: 240,
        b: 255,
        a: TRACE_FLOOR + (1.0 - TRACE_FLOOR) * intensity,
    }
}

/// Reduce `samples` to one value per column, keeping the larger excursion of
/// each span so transients survive.
fn columns(samples: &[f32], count: usize) -> Vec<f64> {
    if samples.is_empty() || count == 0 {
        return Vec::new();
    }
    let span = samples.len().div_ceil(count).max(1);
    samples
        .chunks(span)
        .map(|chunk| {
            let peak = chunk
                .iter()
                .copied()
                .fold(0.0f32, |acc, s| if s.abs() > acc.abs() { s } else { acc });
            peak.clamp(-1.0, 1.0) as f64
        })
        .collect()
}

pub fn render_waveform(frame: &mut Frame, area: Rect, samples: &[f32], visual: Option<&VisualFrame>) {
    let amplitude = visual.map_or(0.0, |v| v.amplitude);
    let block = Block::default()
        .title(format!(" Waveform  rms {amplitude:.3} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(rgb(trace_color(visual).over(BASE))));

    let inner = block.inner(area);
    let points = columns(samples, inner.width as usize * 2);
    let color = rgb(trace_color(visual).over(BASE));
    let step = 1.0 / points.len().max(1) as f64;

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(rgb(BASE))
        .x_bounds([0.0, 1.0])
        .y_bounds([-1.0, 1.0])
        .paint(move |ctx| {
            if points.len() < 2 {
                ctx.draw(&Line::new(0.0, 0.0, 1.0, 0.0, color));
                return;
            }
            for (i, pair) in points.windows(2).enumerate() {
                let x = i as f64 * step;
                ctx.draw(&Line::new(x, pair[0], x + step, pair[1], color));
            }
        });

    frame.render_widget(canvas, area);
}
