//! Tone asset pipeline.
//!
//! Composes the waveform of a keypad symbol from the signal generator and
//! encodes it as a WAV asset:
//!
//! ```text
//! | silence | low-group pulse (tone_duration, tone_gain2)          | silence |
//! |         | pad | high-group pulse (tone_duration2, tone_gain) | pad |     |
//! ```
//!
//! The two pulses are averaged, then framed by `silence_part_duration` of
//! silence on each side.

use crate::audio::{encode_with_layout, WavAsset};
use crate::config::PlayerConfig;
use crate::error::Result;
use crate::types::ToneKey;

use super::context::SynthContext;
use super::signal::{merge, mix, Fade, Frequency, SampleBuffer};

/// Renders the samples for one frequency pair.
pub fn tone_samples(ctx: &SynthContext, config: &PlayerConfig, (low, high): (f64, f64)) -> SampleBuffer {
    let fade = Fade::new(config.fade_in_duration, config.fade_out_duration);
    let pad = config.high_pulse_offset();

    let low_pulse = ctx.tone(
        config.tone_duration,
        Frequency::Single(low),
        config.tone_gain2,
        fade,
    );

    let high_pulse = merge(&[
        ctx.silence(pad),
        ctx.tone(
            config.tone_duration2,
            Frequency::Single(high),
            config.tone_gain,
            fade,
        ),
        ctx.silence(pad),
    ]);

    let pulses = mix(&[low_pulse, high_pulse]).unwrap_or_default();

    merge(&[
        ctx.silence(config.silence_part_duration),
        pulses,
        ctx.silence(config.silence_part_duration),
    ])
}

/// Renders and encodes the mono WAV asset of a keypad symbol.
pub fn build_tone_asset(ctx: &SynthContext, config: &PlayerConfig, key: ToneKey) -> Result<WavAsset> {
    let samples = tone_samples(ctx, config, key.frequencies());
    encode_with_layout(config.wav_layout, ctx.sample_rate(), &samples, None)
}

/// Renders a dial sequence: each symbol's waveform back to back.
pub fn render_sequence(ctx: &SynthContext, config: &PlayerConfig, keys: &[ToneKey]) -> SampleBuffer {
    let parts: Vec<SampleBuffer> = keys
        .iter()
        .map(|key| tone_samples(ctx, config, key.frequencies()))
        .collect();
    merge(&parts)
}

/// Estimates the number of samples of one symbol's waveform.
pub fn estimate_samples(ctx: &SynthContext, config: &PlayerConfig) -> usize {
    ctx.sample_count(config.tone_duration) + 2 * ctx.sample_count(config.silence_part_duration)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{read_header, HEADER_LEN};

    fn ctx() -> SynthContext {
        SynthContext::new(48000).unwrap()
    }

    #[test]
    fn waveform_is_framed_by_silence() {
        let config = PlayerConfig::default();
        let samples = tone_samples(&ctx(), &config, ToneKey::Five.frequencies());

        assert_eq!(samples.len(), estimate_samples(&ctx(), &config));
        let pad = ctx().sample_count(config.silence_part_duration);
        assert!(samples[..pad].iter().all(|s| *s == 0.0));
        assert!(samples[samples.len() - pad..].iter().all(|s| *s == 0.0));
        assert!(samples[pad..samples.len() - pad].iter().any(|s| s.abs() > 0.1));
    }

    #[test]
    fn high_pulse_is_centered() {
        let config = PlayerConfig {
            silence_part_duration: 0.0,
            fade_in_duration: 0.0,
            fade_out_duration: 0.0,
            tone_gain2: 0.0,
            ..PlayerConfig::default()
        };
        let samples = tone_samples(&ctx(), &config, (697.0, 1209.0));
        let offset = ctx().sample_count(config.high_pulse_offset());

        // only the high pulse is audible with the low gain at zero
        assert!(samples[..offset].iter().all(|s| *s == 0.0));
        assert!(samples[offset..offset + 100].iter().any(|s| s.abs() > 0.1));
        assert!(samples[samples.len() - offset..].iter().all(|s| *s == 0.0));
    }

    #[test]
    fn amplitude_stays_normalized() {
        let config = PlayerConfig::default();
        for key in ToneKey::ALL {
            let samples = tone_samples(&ctx(), &config, key.frequencies());
            assert!(samples.iter().all(|s| s.abs() <= 1.0), "key {}", key);
        }
    }

    #[test]
    fn asset_is_mono_wav() {
        let config = PlayerConfig::default();
        let asset = build_tone_asset(&ctx(), &config, ToneKey::Pound).unwrap();
        let header = read_header(asset.as_bytes()).unwrap();

        assert_eq!(header.channels, 1);
        assert_eq!(header.sample_rate, 48000);
        assert_eq!(
            asset.len(),
            HEADER_LEN + 2 * estimate_samples(&ctx(), &config)
        );
    }

    #[test]
    fn sequence_concatenates_symbols() {
        let config = PlayerConfig::default();
        let keys = ToneKey::parse_sequence("12#").unwrap();
        let samples = render_sequence(&ctx(), &config, &keys);
        assert_eq!(samples.len(), 3 * estimate_samples(&ctx(), &config));
    }
}
