//! Synthesis context shared by every tone build of a player.

use crate::error::{DtmfError, Result};

use super::signal::{self, Fade, Frequency, SampleBuffer};

/// Owns the sample rate all tone assets of one player are rendered at.
///
/// Built once when the player is constructed and borrowed by each build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SynthContext {
    sample_rate: u32,
}

impl SynthContext {
    /// Creates a context. The sample rate must be non-zero.
    pub fn new(sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(DtmfError::invalid_config("sample rate must be > 0"));
        }
        Ok(Self { sample_rate })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Silence at this context's sample rate.
    pub fn silence(&self, duration: f64) -> SampleBuffer {
        signal::silence(self.sample_rate, duration)
    }

    /// A faded tone at this context's sample rate.
    pub fn tone(&self, duration: f64, frequency: Frequency, gain: f64, fade: Fade) -> SampleBuffer {
        signal::tone(self.sample_rate, Some(duration), Some(frequency), gain, fade)
    }

    /// Number of samples covering `duration` seconds.
    pub fn sample_count(&self, duration: f64) -> usize {
        signal::sample_count(self.sample_rate, duration)
    }
}
