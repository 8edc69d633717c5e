//! WAV encoder for tone assets.
//!
//! Converts normalized f32 samples into a RIFF/WAVE container with 16-bit
//! PCM payload, mono or interleaved stereo.
//!
//! Two header layouts are available. [`WavLayout::Compatible`] reproduces the
//! header that existing players of these assets were built against: the RIFF
//! size is `32 + data_len`, the byte rate is `sample_rate * 4` and the block
//! align is 4 whatever the channel count. [`WavLayout::Standard`] is written
//! by `hound` and is accepted by strict parsers.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use hound::{SampleFormat, WavSpec, WavWriter};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::error::{DtmfError, Result};

/// MIME type attached to encoded assets.
pub const WAV_MIME_TYPE: &str = "audio/wav";

/// Size of the canonical RIFF/WAVE header in bytes.
pub const HEADER_LEN: usize = 44;

/// Bits per encoded sample.
pub const BITS_PER_SAMPLE: u16 = 16;

/// Header layout written by the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum WavLayout {
    /// Fixed size fields, as existing players expect
    #[default]
    Compatible,
    /// Standard RIFF/WAVE header for strict parsers
    Standard,
}

/// An encoded waveform asset: WAV bytes tagged with their MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WavAsset {
    bytes: Vec<u8>,
    sample_rate: u32,
    channels: u16,
}

impl WavAsset {
    /// Returns the MIME type of the asset.
    pub fn mime_type(&self) -> &'static str {
        WAV_MIME_TYPE
    }

    /// Returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consumes the asset, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Returns the total encoded size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns true if the asset holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the sample rate in Hz.
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Returns the channel count (1 or 2).
    pub fn channels(&self) -> u16 {
        self.channels
    }

    /// Writes the asset to a file.
    pub fn write_to(&self, path: &Path) -> Result<()> {
        std::fs::write(path, &self.bytes)
            .map_err(|e| DtmfError::io(format!("Failed to write {}", path.display()), e))
    }
}

/// Encodes samples with the compatible header layout.
///
/// With only `left` the asset is mono; with `right` the channels are
/// interleaved sample by sample.
pub fn encode(sample_rate: u32, left: &[f32], right: Option<&[f32]>) -> Result<WavAsset> {
    encode_with_layout(WavLayout::Compatible, sample_rate, left, right)
}

/// Encodes samples with the given header layout.
pub fn encode_with_layout(
    layout: WavLayout,
    sample_rate: u32,
    left: &[f32],
    right: Option<&[f32]>,
) -> Result<WavAsset> {
    if sample_rate == 0 {
        return Err(DtmfError::encode_failed("sample rate must be > 0"));
    }

    let (samples, channels) = match right {
        Some(right) => (interleave(left, right), 2),
        None => (left.to_vec(), 1),
    };

    let bytes = match layout {
        WavLayout::Compatible => encode_compatible(sample_rate, channels, &samples)?,
        WavLayout::Standard => encode_standard(sample_rate, channels, &samples)?,
    };

    Ok(WavAsset {
        bytes,
        sample_rate,
        channels,
    })
}

/// Interleaves two channels as `[l0, r0, l1, r1, ...]`.
///
/// A shorter channel is padded with silence.
pub fn interleave(left: &[f32], right: &[f32]) -> Vec<f32> {
    let frames = left.len().max(right.len());
    let mut result = Vec::with_capacity(frames * 2);
    for i in 0..frames {
        result.push(left.get(i).copied().unwrap_or(0.0));
        result.push(right.get(i).copied().unwrap_or(0.0));
    }
    result
}

/// Converts a normalized sample to signed 16-bit PCM.
///
/// Negative values scale by 0x8000 and the rest by 0x7FFF, truncating
/// toward zero.
pub fn float_to_pcm16(sample: f32) -> i16 {
    let s = sample.clamp(-1.0, 1.0);
    if s < 0.0 {
        (s * 32768.0) as i16
    } else {
        (s * 32767.0) as i16
    }
}

fn encode_compatible(sample_rate: u32, channels: u16, samples: &[f32]) -> Result<Vec<u8>> {
    let data_len = u32::try_from(samples.len() * 2)
        .map_err(|_| DtmfError::encode_failed("sample data exceeds 4 GiB"))?;

    let mut buffer = Vec::with_capacity(HEADER_LEN + samples.len() * 2);
    write_compatible(&mut buffer, sample_rate, channels, data_len, samples)
        .map_err(|e| DtmfError::encode_failed(e.to_string()))?;
    Ok(buffer)
}

fn write_compatible<W: Write>(
    out: &mut W,
    sample_rate: u32,
    channels: u16,
    data_len: u32,
    samples: &[f32],
) -> std::io::Result<()> {
    out.write_all(b"RIFF")?;
    out.write_u32::<LittleEndian>(32 + data_len)?;
    out.write_all(b"WAVE")?;
    out.write_all(b"fmt ")?;
    out.write_u32::<LittleEndian>(16)?;
    // PCM
    out.write_u16::<LittleEndian>(1)?;
    out.write_u16::<LittleEndian>(channels)?;
    out.write_u32::<LittleEndian>(sample_rate)?;
    out.write_u32::<LittleEndian>(sample_rate * 4)?;
    out.write_u16::<LittleEndian>(4)?;
    out.write_u16::<LittleEndian>(BITS_PER_SAMPLE)?;
    out.write_all(b"data")?;
    out.write_u32::<LittleEndian>(data_len)?;

    for &sample in samples {
        out.write_i16::<LittleEndian>(float_to_pcm16(sample))?;
    }
    Ok(())
}

fn encode_standard(sample_rate: u32, channels: u16, samples: &[f32]) -> Result<Vec<u8>> {
    let spec = WavSpec {
        channels,
        sample_rate,
        bits_per_sample: BITS_PER_SAMPLE,
        sample_format: SampleFormat::Int,
    };

    let mut buffer = Vec::with_capacity(HEADER_LEN + samples.len() * 2);
    {
        let mut writer = WavWriter::new(Cursor::new(&mut buffer), spec)
            .map_err(|e| DtmfError::encode_failed(format!("Failed to create WAV writer: {}", e)))?;

        for &sample in samples {
            writer
                .write_sample(float_to_pcm16(sample))
                .map_err(|e| DtmfError::encode_failed(format!("Failed to write sample: {}", e)))?;
        }

        writer
            .finalize()
            .map_err(|e| DtmfError::encode_failed(format!("Failed to finalize WAV: {}", e)))?;
    }

    Ok(buffer)
}

/// Header fields of a 44-byte RIFF/WAVE header, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavHeader {
    pub riff_size: u32,
    pub format_tag: u16,
    pub channels: u16,
    pub sample_rate: u32,
    pub byte_rate: u32,
    pub block_align: u16,
    pub bits_per_sample: u16,
    pub data_len: u32,
}

/// Reads the fixed 44-byte header at the start of `bytes`.
///
/// Returns None if the chunk ids are not RIFF/WAVE/fmt /data in the
/// canonical positions.
pub fn read_header(bytes: &[u8]) -> Option<WavHeader> {
    if bytes.len() < HEADER_LEN {
        return None;
    }

    let mut cursor = Cursor::new(bytes);
    let mut tag = [0u8; 4];

    cursor.read_exact(&mut tag).ok()?;
    if &tag != b"RIFF" {
        return None;
    }
    let riff_size = cursor.read_u32::<LittleEndian>().ok()?;
    cursor.read_exact(&mut tag).ok()?;
    if &tag != b"WAVE" {
        return None;
    }
    cursor.read_exact(&mut tag).ok()?;
    if &tag != b"fmt " {
        return None;
    }
    let _fmt_len = cursor.read_u32::<LittleEndian>().ok()?;
    let format_tag = cursor.read_u16::<LittleEndian>().ok()?;
    let channels = cursor.read_u16::<LittleEndian>().ok()?;
    let sample_rate = cursor.read_u32::<LittleEndian>().ok()?;
    let byte_rate = cursor.read_u32::<LittleEndian>().ok()?;
    let block_align = cursor.read_u16::<LittleEndian>().ok()?;
    let bits_per_sample = cursor.read_u16::<LittleEndian>().ok()?;
    cursor.read_exact(&mut tag).ok()?;
    if &tag != b"data" {
        return None;
    }
    let data_len = cursor.read_u32::<LittleEndian>().ok()?;

    Some(WavHeader {
        riff_size,
        format_tag,
        channels,
        sample_rate,
        byte_rate,
        block_align,
        bits_per_sample,
        data_len,
    })
}

/// Calculates the duration of audio in seconds from sample count.
pub fn samples_to_duration(sample_count: usize, sample_rate: u32) -> f32 {
    sample_count as f32 / sample_rate as f32
}
