//! Signal generator.
//!
//! Produces sample buffers for silence and faded sine tones, and combines
//! buffers by concatenation ([`merge`]) or averaging ([`mix`]).

use std::f64::consts::PI;

/// A buffer of normalized samples in [-1, 1].
pub type SampleBuffer = Vec<f32>;

/// Frequency used when none is requested.
pub const DEFAULT_FREQUENCY_HZ: f64 = 440.0;

/// Tone length in seconds used when none is requested.
pub const DEFAULT_TONE_DURATION: f64 = 5.0;

/// Fade durations below this many seconds disable the fade.
pub const FADE_EPSILON: f64 = 0.000001;

/// One sine, or the average of two.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Frequency {
    Single(f64),
    Dual(f64, f64),
}

impl From<f64> for Frequency {
    fn from(hz: f64) -> Self {
        Frequency::Single(hz)
    }
}

impl From<(f64, f64)> for Frequency {
    fn from((a, b): (f64, f64)) -> Self {
        Frequency::Dual(a, b)
    }
}

/// Linear fade-in and fade-out lengths in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Fade {
    pub fade_in: f64,
    pub fade_out: f64,
}

impl Fade {
    /// No fading at either end.
    pub const NONE: Fade = Fade {
        fade_in: 0.0,
        fade_out: 0.0,
    };

    pub fn new(fade_in: f64, fade_out: f64) -> Self {
        Self { fade_in, fade_out }
    }

    /// Returns the envelope value at time `t` of a tone lasting `duration`.
    ///
    /// Each ramp is 1 outside its window and rises linearly from 0 inside it;
    /// the two ramps multiply.
    pub fn envelope(&self, t: f64, duration: f64) -> f64 {
        let fade_in = if t - self.fade_in > 0.0 || self.fade_in < FADE_EPSILON {
            1.0
        } else {
            t / self.fade_in
        };

        let remaining = duration - t;
        let fade_out = if remaining - self.fade_out > 0.0 || self.fade_out < FADE_EPSILON {
            1.0
        } else {
            remaining / self.fade_out
        };

        fade_in * fade_out
    }
}

/// Number of samples covering `duration` seconds, truncated.
pub fn sample_count(sample_rate: u32, duration: f64) -> usize {
    // `as` saturates: negative and NaN durations give 0
    (sample_rate as f64 * duration) as usize
}

/// Returns `sample_rate * duration` zero samples.
pub fn silence(sample_rate: u32, duration: f64) -> SampleBuffer {
    vec![0.0; sample_count(sample_rate, duration)]
}

/// Generates a sine tone, or the mean of two sines, with fade envelopes.
///
/// `duration` defaults to [`DEFAULT_TONE_DURATION`] and `frequency` to
/// [`DEFAULT_FREQUENCY_HZ`] when absent or non-positive.
pub fn tone(
    sample_rate: u32,
    duration: Option<f64>,
    frequency: Option<Frequency>,
    gain: f64,
    fade: Fade,
) -> SampleBuffer {
    let duration = duration
        .filter(|d| *d > 0.0)
        .unwrap_or(DEFAULT_TONE_DURATION);

    let (freq_a, freq_b) = match frequency {
        Some(Frequency::Dual(a, b)) => (a, b),
        Some(Frequency::Single(f)) if f > 0.0 => (f, 0.0),
        _ => (DEFAULT_FREQUENCY_HZ, 0.0),
    };

    let rate = sample_rate as f64;
    let n = sample_count(sample_rate, duration);

    (0..n)
        .map(|i| {
            let omega = i as f64 * 2.0 * PI / rate;
            let v = if freq_b > 0.0 {
                ((freq_a * omega).sin() + (freq_b * omega).sin()) / 2.0
            } else {
                (freq_a * omega).sin()
            };

            let t = i as f64 / rate;
            (v * gain * fade.envelope(t, duration)) as f32
        })
        .collect()
}

/// Concatenates buffers in order.
pub fn merge<B: AsRef<[f32]>>(buffers: &[B]) -> SampleBuffer {
    let total = buffers.iter().map(|b| b.as_ref().len()).sum();
    let mut result = Vec::with_capacity(total);
    for buffer in buffers {
        result.extend_from_slice(buffer.as_ref());
    }
    result
}

/// Averages buffers sample by sample.
///
/// Returns None for an empty input. Buffers shorter than the longest one are
/// treated as zero past their end, so the divisor is always the buffer count.
pub fn mix<B: AsRef<[f32]>>(buffers: &[B]) -> Option<SampleBuffer> {
    if buffers.is_empty() {
        return None;
    }

    let len = buffers.iter().map(|b| b.as_ref().len()).max().unwrap_or(0);
    let mut sums = vec![0.0f64; len];
    for buffer in buffers {
        for (sum, &sample) in sums.iter_mut().zip(buffer.as_ref()) {
            *sum += sample as f64;
        }
    }

    let count = buffers.len() as f64;
    Some(sums.into_iter().map(|s| (s / count) as f32).collect())
}
