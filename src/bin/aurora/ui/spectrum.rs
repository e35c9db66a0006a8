//! Spectrum canvas widget
//!
//! Draws the render loop's bars on a braille canvas. Bars are filled with
//! vertical strokes one dot apart; the strokes near each edge are shortened
//! to round the top corners.

use aurora_synth::visual::{Bar, VisualFrame};
use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    widgets::{
        canvas::{Canvas, Context, Line},
        Block, Borders,
    },
    Frame,
};

use super::{rgb, BASE};

/// Height lost at horizontal offset `dx` from a corner of radius `r`.
fn corner_drop(dx: f64, r: f64) -> f64 {
    if r <= 0.0 || dx >= r {
        return 0.0;
    }
    let from_center = r - dx;
    r - (r * r - from_center * from_center).max(0.0).sqrt()
}

fn draw_bar(ctx: &mut Context, bar: &Bar, dot_width: f64) {
    if bar.height <= 0.0 {
        return;
    }
    let color = rgb(bar.color.over(BASE));
    let (x0, width, height, radius) = (
        bar.x as f64,
        bar.width as f64,
        bar.height as f64,
        bar.radius as f64,
    );

    let mut dx = 0.0;
    while dx <= width {
        let edge = dx.min(width - dx);
        let top = height - corner_drop(edge, radius);
        ctx.draw(&Line::new(x0 + dx, 0.0, x0 + dx, top, color));
        dx += dot_width;
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, visual: Option<&VisualFrame>) {
    let mut block = Block::default().title(" Live Spectrum ").borders(Borders::ALL);

    let Some(visual) = visual else {
        frame.render_widget(block, area);
        return;
    };

    block = block.border_style(Style::default().fg(rgb(visual.glow.magenta.over(BASE))));
    let inner = block.inner(area);
    let (width, height) = (visual.width.max(1) as f64, visual.height.max(1) as f64);
    let dot_width = width / (inner.width.max(1) as f64 * 2.0);

    let canvas = Canvas::default()
        .block(block)
        .marker(Marker::Braille)
        .background_color(rgb(visual.background.at(0.5).over(BASE)))
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| {
            for bar in &visual.bars {
                draw_bar(ctx, bar, dot_width);
            }
        });

    frame.render_widget(canvas, area);
}
