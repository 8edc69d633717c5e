//! Audio output module.
//!
//! Provides WAV encoding for synthesized tones.

pub mod wav;

// Re-export commonly used items
pub use wav::{
    encode, encode_with_layout, float_to_pcm16, interleave, read_header, samples_to_duration,
    WavAsset, WavHeader, WavLayout, HEADER_LEN, WAV_MIME_TYPE,
};
