//! Tone generation module.
//!
//! Provides the signal generator and the per-symbol asset pipeline.

pub mod context;
pub mod pipeline;
pub mod signal;

// Re-export commonly used items
pub use context::SynthContext;
pub use pipeline::{build_tone_asset, estimate_samples, render_sequence, tone_samples};
pub use signal::{merge, mix, silence, tone, Fade, Frequency, SampleBuffer};
