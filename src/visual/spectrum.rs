/*
Spectrum Bars & Glow
====================

Per frame, the frequency snapshot is thinned to a fixed row of bars:

    step = floor(bins / 80)
    bar i samples bin i * step

Each bar, for magnitude v in [0, 1] on a canvas of width W and height H
(device pixels):

    height  v * 0.8 * H, growing up from the bottom edge
    x       i * W / 80
    width   max(2 * dpr, 0.8 * W / 80)
    radius  min(6 * dpr, height / 2)     rounded top corners
    color   rgba(floor(255 v), 45, 149, 0.6 + 0.4 v)

Quiet bins are a translucent magenta-blue, loud ones a bright pink.

Amplitude drives the glow around the cards:

    rms = sqrt(mean(x²))
    a   = min(1, 8 * rms)
    cyan shadow     rgba(0, 240, 255, 0.06 + 0.18 a)
    magenta shadow  rgba(255, 45, 149, 0.04 + 0.12 a)
*/

/// Bars drawn across the spectrum canvas.
pub const BAR_COUNT: usize = 80;

const BAR_HEIGHT_SCALE: f32 = 0.8;
const BAR_FILL: f32 = 0.8;
const BAR_MIN_WIDTH: f32 = 2.0;
const BAR_RADIUS: f32 = 6.0;
const GLOW_GAIN: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Composite over an opaque background colour.
    pub fn over(&self, background: (u8, u8, u8)) -> (u8, u8, u8) {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |fg: u8, bg: u8| (fg as f32 * a + bg as f32 * (1.0 - a)).round() as u8;
        (
            mix(self.r, background.0),
            mix(self.g, background.1),
            mix(self.b, background.2),
        )
    }
}

/// Vertical gradient behind the bars.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gradient {
    pub top: Rgba,
    pub bottom: Rgba,
}

impl Gradient {
    pub const BACKGROUND: Gradient = Gradient {
        top: Rgba::new(0, 240, 255, 0.06),
        bottom: Rgba::new(5, 8, 22, 0.2),
    };

    /// Colour at `t` in [0, 1], top to bottom.
    pub fn at(&self, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        let lerp = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Rgba {
            r: lerp(self.top.r, self.bottom.r),
            g: lerp(self.top.g, self.bottom.g),
            b: lerp(self.top.b, self.bottom.b),
            a: self.top.a + (self.bottom.a - self.top.a) * t,
        }
    }
}

/// One spectrum bar in device pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bar {
    pub magnitude: f32,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub radius: f32,
    pub color: Rgba,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glow {
    /// Normalized amplitude, `min(1, 8 * rms)`.
    pub intensity: f32,
    pub cyan: Rgba,
    pub magenta: Rgba,
}

/// Root-mean-square of `samples`; 0 for an empty slice.
pub fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f32 = samples.iter().map(|s| s * s).sum();
    (sum / samples.len() as f32).sqrt()
}

/// Bin index sampled by each bar.
///
/// Every `floor(len / bars)`-th bin. With fewer bins than bars the step is 1
/// and the trailing bars repeat the last bin; with no bins there are no bars.
pub fn bar_indices(len: usize, bars: usize) -> Vec<usize> {
    if len == 0 || bars == 0 {
        return Vec::new();
    }
    let step = (len / bars).max(1);
    (0..bars).map(|i| (i * step).min(len - 1)).collect()
}

fn bar_color(v: f32) -> Rgba {
    Rgba::new((255.0 * v).floor() as u8, 45, 149, 0.6 + 0.4 * v)
}

/// Lay out [`BAR_COUNT`] bars for a canvas of `width` × `height` device pixels.
pub fn spectrum_bars(magnitudes: &[f32], width: f32, height: f32, pixel_ratio: f32) -> Vec<Bar> {
    let slot = width / BAR_COUNT as f32;
    let bar_width = (BAR_MIN_WIDTH * pixel_ratio).max(slot * BAR_FILL);

    bar_indices(magnitudes.len(), BAR_COUNT)
        .into_iter()
        .enumerate()
        .map(|(i, bin)| {
            let v = magnitudes[bin].clamp(0.0, 1.0);
            let h = v * height * BAR_HEIGHT_SCALE;
            Bar {
                magnitude: v,
                x: i as f32 * slot,
                y: height - h,
                width: bar_width,
                height: h,
                radius: (BAR_RADIUS * pixel_ratio).min(h / 2.0),
                color: bar_color(v),
            }
        })
        .collect()
}

pub fn glow(rms: f32) -> Glow {
    let a = (rms * GLOW_GAIN).clamp(0.0, 1.0);
    Glow {
        intensity: a,
        cyan: Rgba::new(0, 240, 255, 0.06 + 0.18 * a),
        magenta: Rgba::new(255, 45, 149, 0.04 + 0.12 * a),
    }
}
