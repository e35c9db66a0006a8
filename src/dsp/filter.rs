use std::f32::consts::PI;

/*
Lowpass State-Variable Filter
=============================

A two-pole, topology-preserving-transform (TPT) SVF. Only the lowpass output
is used: every voice runs through one at a fixed cutoff to shave the
harshest harmonics off the triangle wave.

  g = tan(pi * cutoff / sample_rate)
  k = 2 - 2 * resonance          (resonance 0 = gentlest rolloff)

The cutoff is clamped just below Nyquist so `tan` never blows up when the
device runs at a low sample rate.
*/

const MAX_CUTOFF_RATIO: f32 = 0.49;

pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub resonance: f32,
}

impl SVFilter {
    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            resonance: 0.0,
        }
    }

    #[inline]
    fn compute_g(&self, sample_rate: f32) -> f32 {
        let cutoff = self.cutoff_hz.clamp(1.0, sample_rate * MAX_CUTOFF_RATIO);
        (PI * cutoff / sample_rate).tan()
    }

    #[inline]
    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> f32 {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        v2
    }

    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = self.compute_g(sample_rate);
        let k = 2.0 - (2.0 * self.resonance);

        for sample in buffer.iter_mut() {
            *sample = self.next_sample(*sample, k, g);
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }
}
