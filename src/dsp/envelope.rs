use crate::MIN_TIME;

/*
Scheduled Ramp Envelopes
========================

Every sound in the engine gets its amplitude shape from a timeline of ramp
events rather than from a gate-driven state machine. A voice is scheduled once,
up front, and then plays itself out: nothing ever has to send a note-off.

Vocabulary
----------

  event       A point on the timeline: (time, value, shape). The shape says
              how the value travels from the previous event to this one.

  set         Jump to `value` at `time` and hold it.

  linear      Straight-line travel from the previous event to `value`,
              arriving exactly at `time`.

  exponential Constant-ratio travel from the previous event to `value`. The
              curve falls fast at first and then flattens, which is how
              acoustic sounds decay. Both endpoints must be non-zero and share
              a sign; otherwise the previous value is held.

  hold        Cancel everything scheduled after `time` and pin the value the
              timeline had at that instant. Used before a release ramp so the
              fade starts from wherever the sound actually is.


The Math
--------

With progress p = (t - t0) / (t1 - t0) in [0, 1]:

    linear:       v(t) = v0 + (v1 - v0) * p
    exponential:  v(t) = v0 * (v1 / v0) ^ p

Before the first event the timeline outputs its default value. After the last
event it holds the last value forever.


The Pluck Shape
---------------

    0.6 ┐ ╱╲
        │╱  ╲
        │     ╲__
        │        ╲____
 0.0008 └───────────────┴──→ t
        0 5ms          350ms

    set(0, now) → linear(0.6, now + 5ms) → exponential(0.0008, now + 350ms)

The 5 ms linear rise avoids the click a hard 0 → 0.6 step would produce.
*/

/// Straight-line interpolation between `from` and `to`.
///
/// `progress` is clamped to [0, 1].
#[inline]
pub fn linear_ramp(from: f32, to: f32, progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    from + (to - from) * p
}

/// Constant-ratio interpolation between `from` and `to`.
///
/// Returns `from` unchanged when the endpoints are zero or of opposite signs,
/// since no exponential curve connects them.
#[inline]
pub fn exponential_ramp(from: f32, to: f32, progress: f32) -> f32 {
    let p = progress.clamp(0.0, 1.0);
    if from == 0.0 || to == 0.0 || (from < 0.0) != (to < 0.0) {
        return from;
    }
    from * (to / from).powf(p)
}

/// How the value travels into a scheduled event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RampShape {
    Set,
    Linear,
    Exponential,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RampEvent {
    pub time: f64,
    pub value: f32,
    pub shape: RampShape,
}

/// An automation timeline for a single parameter, usually a gain.
///
/// Events are kept sorted by time. Scheduling at the same time as an existing
/// event places the new one after it.
#[derive(Debug, Clone)]
pub struct ParamTimeline {
    default_value: f32,
    events: Vec<RampEvent>,
}

impl ParamTimeline {
    pub fn new(default_value: f32) -> Self {
        Self {
            default_value,
            events: Vec::with_capacity(4),
        }
    }

    pub fn set_value_at(&mut self, value: f32, time: f64) -> &mut Self {
        self.insert(RampEvent {
            time,
            value,
            shape: RampShape::Set,
        });
        self
    }

    pub fn linear_ramp_to(&mut self, value: f32, end_time: f64) -> &mut Self {
        self.insert(RampEvent {
            time: end_time,
            value,
            shape: RampShape::Linear,
        });
        self
    }

    pub fn exponential_ramp_to(&mut self, value: f32, end_time: f64) -> &mut Self {
        self.insert(RampEvent {
            time: end_time,
            value,
            shape: RampShape::Exponential,
        });
        self
    }

    /// Drop every event after `time` and pin the current value there.
    pub fn hold_at(&mut self, time: f64) -> &mut Self {
        let value = self.value_at(time);
        self.events.retain(|e| e.time <= time);
        self.set_value_at(value, time)
    }

    fn insert(&mut self, event: RampEvent) {
        let index = self.events.partition_point(|e| e.time <= event.time);
        self.events.insert(index, event);
    }

    /// Evaluate the timeline at absolute time `t` (seconds).
    pub fn value_at(&self, t: f64) -> f32 {
        let next = self.events.partition_point(|e| e.time <= t);

        let (prev_time, prev_value) = match next.checked_sub(1) {
            Some(i) => (self.events[i].time, self.events[i].value),
            None => (0.0, self.default_value),
        };

        let Some(upcoming) = self.events.get(next) else {
            return prev_value;
        };

        let span = upcoming.time - prev_time;
        let progress = if span <= MIN_TIME as f64 {
            1.0
        } else {
            ((t - prev_time) / span) as f32
        };

        match upcoming.shape {
            RampShape::Set => prev_value,
            RampShape::Linear => linear_ramp(prev_value, upcoming.value, progress),
            RampShape::Exponential => exponential_ramp(prev_value, upcoming.value, progress),
        }
    }

    /// Move every scheduled event `delta` seconds later.
    pub fn shift(&mut self, delta: f64) {
        for event in &mut self.events {
            event.time += delta;
        }
    }

    /// Time of the last scheduled event, if any.
    pub fn end_time(&self) -> Option<f64> {
        self.events.last().map(|e| e.time)
    }

    pub fn events(&self) -> &[RampEvent] {
        &self.events
    }
}
