use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};

use atomic_float::AtomicF32;

/// Sample clock of the live graph.
///
/// The renderer advances it once per block; every other thread only reads.
/// Times handed to voices are absolute seconds on this clock.
#[derive(Debug, Clone)]
pub struct Clock {
    frames: Arc<AtomicU64>,
    sample_rate: f32,
}

impl Clock {
    pub(crate) fn new(sample_rate: f32) -> Self {
        Self {
            frames: Arc::new(AtomicU64::new(0)),
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Acquire)
    }

    /// Current graph time in seconds.
    pub fn now(&self) -> f64 {
        self.frames() as f64 / self.sample_rate as f64
    }

    pub(crate) fn advance(&self, frames: usize) {
        self.frames.fetch_add(frames as u64, Ordering::Release);
    }
}

/// Output level shared between the control side and the renderer.
///
/// The renderer reads it once per block.
#[derive(Debug, Clone)]
pub struct LevelControl {
    value: Arc<AtomicF32>,
}

impl LevelControl {
    pub fn new(level: f32) -> Self {
        let level = if level.is_nan() { 0.0 } else { level.clamp(0.0, 1.0) };
        Self {
            value: Arc::new(AtomicF32::new(level)),
        }
    }

    /// Clamp `level` to [0, 1] and apply it. NaN leaves the level unchanged.
    ///
    /// Returns the level now in effect.
    pub fn set(&self, level: f32) -> f32 {
        if level.is_nan() {
            return self.get();
        }
        let level = level.clamp(0.0, 1.0);
        self.value.store(level, Ordering::Release);
        level
    }

    pub fn get(&self) -> f32 {
        self.value.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_counts_seconds() {
        let clock = Clock::new(48_000.0);
        assert_eq!(clock.now(), 0.0);

        clock.advance(24_000);
        let reader = clock.clone();
        assert_eq!(reader.frames(), 24_000);
        assert!((reader.now() - 0.5).abs() < 1e-12);
    }

    #[test]
    fn level_clamps() {
        let level = LevelControl::new(0.8);
        assert_eq!(level.set(1.4), 1.0);
        assert_eq!(level.get(), 1.0);
        assert_eq!(level.set(-0.2), 0.0);
        assert_eq!(level.get(), 0.0);
        assert_eq!(level.set(0.35), 0.35);
    }

    #[test]
    fn level_ignores_nan() {
        let level = LevelControl::new(0.5);
        assert_eq!(level.set(f32::NAN), 0.5);
        assert_eq!(level.get(), 0.5);
    }

    #[test]
    fn level_is_shared_between_clones() {
        let control = LevelControl::new(0.8);
        let renderer_side = control.clone();
        control.set(0.25);
        assert_eq!(renderer_side.get(), 0.25);
    }
}
