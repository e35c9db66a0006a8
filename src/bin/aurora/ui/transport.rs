//! Transport bar widget - shows engine state, level and the amplitude glow

use aurora_synth::visual::VisualFrame;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::{rgb, Status, BASE};

/// Cells in the glow meter
const METER_WIDTH: usize = 10;

fn on_off(label: &str, on: bool, color: Color) -> Span<'static> {
    let style = if on {
        Style::default().fg(color)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    Span::styled(format!("{label} {}  ", if on { "on" } else { "off" }), style)
}

/// Render the transport bar
pub fn render_transport(frame: &mut Frame, area: Rect, status: &Status, visual: Option<&VisualFrame>) {
    let (amplitude, intensity) = visual.map_or((0.0, 0.0), |v| (v.amplitude, v.glow.intensity));

    // Two-tone border following the card glow
    let border = match visual {
        Some(v) if intensity > 0.0 => rgb(v.glow.cyan.over(BASE)),
        _ => Color::DarkGray,
    };
    let block = Block::default()
        .title(" aurora ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border));

    let filled = (intensity * METER_WIDTH as f32).round() as usize;
    let meter = format!(
        "{}{}",
        "█".repeat(filled.min(METER_WIDTH)),
        "·".repeat(METER_WIDTH - filled.min(METER_WIDTH))
    );

    let mut spans = vec![
        Span::styled(
            if status.running { " ▶ Audio running  " } else { " ⏻ Start audio  " },
            Style::default().fg(if status.running { Color::Green } else { Color::Magenta }),
        ),
        on_off("Mic", status.mic, Color::Cyan),
        on_off("Pad", status.pad, Color::LightBlue),
        Span::styled(
            format!("Vol {:>3.0}%  ", status.level * 100.0),
            Style::default().fg(Color::White),
        ),
    ];

    if let Some(sample_rate) = status.sample_rate {
        spans.push(Span::styled(
            format!("{:.1}kHz  ", sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::styled(
        format!("RMS {amplitude:.3} {meter}  "),
        Style::default().fg(Color::Magenta),
    ));

    if let Some(notice) = status.notice {
        spans.push(Span::styled(notice.to_string(), Style::default().fg(Color::Yellow)));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
