//! Composable building blocks for the scheduled audio graph.
//!
//! Graph nodes wrap the low-level DSP primitives with what a scheduled voice
//! needs: absolute start/stop times, automation timelines, and block-based
//! rendering. The `extensions` module adds fluent helpers so voices can be
//! written as a clear, chainable expression.

/// Multiply two signals together (amplitude shaping).
pub mod amplify;
/// Live input read from the capture ring.
pub mod capture;
/// Soft-knee compressor node for the microphone path.
pub mod compressor;
/// Automation timeline rendered as a control signal.
pub mod envelope;
/// Fluent combinators (`.amplify()`, `.through()`).
pub mod extensions;
/// Lowpass state-variable filter node.
pub mod filter;
/// Core traits shared by all graph nodes.
pub mod node;
/// Scheduled audio-band oscillators.
pub mod oscillator;
/// Serial chaining of two nodes (source → effect).
pub mod through;

pub use node::{GraphNode, RenderCtx};
