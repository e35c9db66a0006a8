//! Frame-driven visuals derived from the analysis snapshot.
//!
//! Nothing here touches the audio graph. A [`RenderLoop`] is ticked once per
//! display frame with whatever snapshot is freshest and returns a
//! [`VisualFrame`] describing what to draw.

pub mod render_loop;
pub mod spectrum;

pub use render_loop::{LoopState, RenderLoop, Viewport, VisualFrame};
pub use spectrum::{bar_indices, glow, rms, spectrum_bars, Bar, Glow, Gradient, Rgba, BAR_COUNT};
